use parley_core::ParticipantId;
use thiserror::Error;

use crate::session::SessionState;

#[derive(Debug, Error)]
pub enum SessionError {
    /// A remote `signal` or `candidate` payload the transport cannot use.
    #[error("malformed signal: {0}")]
    MalformedSignal(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error(transparent)]
    WebRtc(#[from] webrtc::Error),

    #[error("failed to encode signal: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("illegal transition {from} -> {to} for {peer_id}")]
    IllegalTransition {
        peer_id: ParticipantId,
        from: SessionState,
        to: SessionState,
    },

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("signaling channel closed")]
    SignalingClosed,

    #[error("call engine stopped")]
    EngineStopped,
}
