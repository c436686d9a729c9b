use parley_core::ParticipantId;
use serde_json::Value;
use tracing::{debug, warn};

use crate::engine::{CallEngine, MAX_BUFFERED_PEERS};
use crate::session::{MAX_PENDING_CANDIDATES, PeerSession};
use crate::transport::TransportFactory;

impl<F: TransportFactory> CallEngine<F> {
    pub(super) async fn handle_ice(&mut self, peer_id: ParticipantId, candidate: Value) {
        let Some(session) = self.sessions.get_mut(&peer_id) else {
            if !self.early_candidates.contains_key(&peer_id)
                && self.early_candidates.len() >= MAX_BUFFERED_PEERS
            {
                warn!("Too many peers with early ICE candidates; dropping one from {}", peer_id);
                return;
            }
            let buffered = self.early_candidates.entry(peer_id.clone()).or_default();
            if buffered.len() >= MAX_PENDING_CANDIDATES {
                warn!("Too many early ICE candidates from {}; dropping", peer_id);
                return;
            }
            debug!("Buffering ICE candidate from {} until its session exists", peer_id);
            buffered.push(candidate);
            return;
        };

        if session.state().awaits_remote_description() {
            if !session.buffer_candidate(candidate) {
                warn!("Pending ICE candidate buffer full for {}; dropping", peer_id);
            }
            return;
        }

        if let Err(e) = session.transport().add_ice_candidate(candidate).await {
            warn!("Failed to add ICE candidate for {}: {}", peer_id, e);
        }
    }

    /// Applies candidates held back until the remote description was set.
    pub(super) async fn flush_pending_candidates(session: &mut PeerSession<F::Stream>) {
        for candidate in session.take_pending_candidates() {
            if let Err(e) = session.transport().add_ice_candidate(candidate).await {
                warn!(
                    "Failed to add buffered ICE candidate for {}: {}",
                    session.peer_id(),
                    e
                );
            }
        }
    }
}
