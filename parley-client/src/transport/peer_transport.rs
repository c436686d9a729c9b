use async_trait::async_trait;
use parley_core::ParticipantId;
use serde_json::Value;

use crate::error::SessionError;
use crate::session::Role;
use crate::transport::TransportEvents;

/// One remote connection's negotiation layer (a WebRTC peer connection, or a
/// stand-in). Payloads are the opaque `signal`/`candidate` blobs relayed by
/// the signaling server.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Produces a local offer and installs it as the local description.
    async fn create_offer(&self) -> Result<Value, SessionError>;

    /// Applies a remote offer and returns the local answer.
    async fn accept_offer(&self, offer: Value) -> Result<Value, SessionError>;

    async fn apply_answer(&self, answer: Value) -> Result<(), SessionError>;

    async fn add_ice_candidate(&self, candidate: Value) -> Result<(), SessionError>;

    /// Releases the connection. Must tolerate repeated calls.
    async fn close(&self);
}

/// Creates transports seeded with the local media.
#[async_trait]
pub trait TransportFactory: Send + Sync + 'static {
    /// Handle to remote media surfaced to the UI.
    type Stream: Clone + Send + Sync + 'static;

    async fn open(
        &self,
        peer_id: &ParticipantId,
        role: Role,
        events: TransportEvents<Self::Stream>,
    ) -> Result<Box<dyn PeerTransport>, SessionError>;
}
