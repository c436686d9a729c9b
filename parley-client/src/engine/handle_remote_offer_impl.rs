use parley_core::ParticipantId;
use serde_json::Value;
use tracing::{info, warn};

use crate::engine::CallEngine;
use crate::session::{Role, SessionState};
use crate::transport::TransportFactory;

impl<F: TransportFactory> CallEngine<F> {
    pub(super) async fn handle_remote_offer(&mut self, peer_id: ParticipantId, signal: Value) {
        if let Some(existing) = self.sessions.get(&peer_id) {
            warn!(
                "Ignoring offer from {}: session already {}",
                peer_id,
                existing.state()
            );
            return;
        }

        info!("Received offer from {}", peer_id);

        let Some(mut session) = self.open_session(&peer_id, Role::Responder).await else {
            return;
        };

        if let Err(e) = session.transition(SessionState::OfferReceived) {
            self.abandon(session, e).await;
            return;
        }

        let negotiated = session.transport().accept_offer(signal).await;
        let answer = match negotiated {
            Ok(answer) => answer,
            Err(e) => {
                self.abandon(session, e).await;
                return;
            }
        };

        self.signaling.send_answer(peer_id.clone(), answer).await;
        if let Err(e) = session.transition(SessionState::AnswerSent) {
            warn!("{}", e);
        }

        // The remote description is in place now.
        Self::flush_pending_candidates(&mut session).await;
        self.sessions.insert(peer_id, session);
    }
}
