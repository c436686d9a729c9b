use parley_core::{ConnectionId, ParticipantId, SignalMessage};
use tokio::sync::{mpsc, oneshot};

/// Commands the signaling layer feeds into the [`MessageRouter`].
///
/// [`MessageRouter`]: crate::MessageRouter
#[derive(Debug)]
pub enum RouterCommand {
    /// A transport opened. `outbound` is its bounded send queue.
    Connect {
        conn_id: ConnectionId,
        outbound: mpsc::Sender<String>,
    },

    /// A decoded frame, with the original text kept for verbatim forwarding.
    Inbound {
        conn_id: ConnectionId,
        message: SignalMessage,
        raw: String,
    },

    /// The transport closed.
    Disconnect { conn_id: ConnectionId },

    /// Current registry contents.
    Participants {
        reply: oneshot::Sender<Vec<ParticipantId>>,
    },
}
