use parley_core::ParticipantId;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::engine::CallEngine;
use crate::session::SessionState;
use crate::transport::TransportFactory;

impl<F: TransportFactory> CallEngine<F> {
    pub(super) async fn handle_answer(&mut self, peer_id: ParticipantId, signal: Value) {
        let Some(mut session) = self.sessions.remove(&peer_id) else {
            debug!("Answer from {} without a session; dropped", peer_id);
            return;
        };

        if session.state() != SessionState::OfferSent {
            warn!(
                "Ignoring answer from {}: session is {}",
                peer_id,
                session.state()
            );
            self.sessions.insert(peer_id, session);
            return;
        }

        info!("Received answer from {}", peer_id);

        if let Err(e) = session.transition(SessionState::AnswerPending) {
            self.abandon(session, e).await;
            return;
        }

        let applied = session.transport().apply_answer(signal).await;
        if let Err(e) = applied.and_then(|()| session.transition(SessionState::Connected)) {
            self.abandon(session, e).await;
            return;
        }

        Self::flush_pending_candidates(&mut session).await;
        self.sessions.insert(peer_id, session);
    }
}
