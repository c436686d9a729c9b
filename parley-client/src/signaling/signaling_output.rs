use async_trait::async_trait;
use parley_core::ParticipantId;
use serde_json::Value;

/// Outgoing half of the signaling channel as the engine sees it. The
/// implementation stamps `from` with the local participant id.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send_offer(&self, to: ParticipantId, signal: Value);

    async fn send_answer(&self, to: ParticipantId, signal: Value);

    async fn send_ice(&self, to: ParticipantId, candidate: Value);
}
