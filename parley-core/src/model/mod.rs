mod participant;
mod signaling;

pub use participant::{ConnectionId, ParticipantId};
pub use signaling::SignalMessage;
