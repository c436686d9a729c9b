use parley_core::ParticipantId;
use tracing::warn;

use crate::engine::{CallEngine, EngineEvent};
use crate::error::SessionError;
use crate::session::PeerSession;
use crate::transport::TransportFactory;

impl<F: TransportFactory> CallEngine<F> {
    /// Destroys `peer_id`'s session in whatever state it is in, along with any
    /// candidates buffered for it. A no-op when there is none.
    pub(super) async fn teardown(&mut self, peer_id: &ParticipantId) {
        self.early_candidates.remove(peer_id);
        let Some(mut session) = self.sessions.remove(peer_id) else {
            return;
        };
        session.close().await;
        self.emit(EngineEvent::PeerClosed {
            peer_id: peer_id.clone(),
        });
    }

    pub(super) async fn teardown_all(&mut self) {
        let peers: Vec<ParticipantId> = self.sessions.keys().cloned().collect();
        for peer_id in peers {
            self.teardown(&peer_id).await;
        }
        self.early_candidates.clear();
    }

    /// Negotiation failed: close without retrying and tell the UI.
    pub(super) async fn abandon(&mut self, mut session: PeerSession<F::Stream>, err: SessionError) {
        let peer_id = session.peer_id().clone();
        warn!(
            "Negotiation with {} ({:?}) failed: {}",
            peer_id,
            session.role(),
            err
        );
        self.early_candidates.remove(&peer_id);
        session.close().await;
        self.emit(EngineEvent::PeerClosed { peer_id });
    }
}
