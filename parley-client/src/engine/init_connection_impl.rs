use parley_core::ParticipantId;
use tracing::{info, warn};

use crate::engine::CallEngine;
use crate::session::{PeerSession, Role, SessionState};
use crate::transport::{TransportEvents, TransportFactory};

impl<F: TransportFactory> CallEngine<F> {
    /// Starts a session as the initiator: we were here first, so we offer.
    pub(super) async fn init_connection(&mut self, peer_id: ParticipantId) {
        if self.sessions.contains_key(&peer_id) {
            info!("Peer {} re-joined; replacing its session", peer_id);
            self.teardown(&peer_id).await;
        }
        // Nothing can legitimately precede our own offer.
        self.early_candidates.remove(&peer_id);

        let Some(mut session) = self.open_session(&peer_id, Role::Initiator).await else {
            return;
        };

        let negotiated = session.transport().create_offer().await;
        let offer = match negotiated {
            Ok(offer) => offer,
            Err(e) => {
                self.abandon(session, e).await;
                return;
            }
        };

        self.signaling.send_offer(peer_id.clone(), offer).await;

        if let Err(e) = session.transition(SessionState::OfferSent) {
            warn!("{}", e);
        }
        self.sessions.insert(peer_id, session);
    }

    /// Creates the transport and session. A responder session pulls in the
    /// candidates that raced ahead of the offer. Nothing is recorded if the
    /// transport cannot open.
    pub(super) async fn open_session(
        &mut self,
        peer_id: &ParticipantId,
        role: Role,
    ) -> Option<PeerSession<F::Stream>> {
        let generation = self.next_generation();
        let events = TransportEvents::new(peer_id.clone(), generation, self.transport_tx.clone());

        let transport = match self.factory.open(peer_id, role, events).await {
            Ok(transport) => transport,
            Err(e) => {
                warn!("Failed to open transport for {}: {}", peer_id, e);
                return None;
            }
        };

        let mut session = PeerSession::new(peer_id.clone(), generation, role, transport);
        let early = self.early_candidates.remove(peer_id).unwrap_or_default();
        if role == Role::Responder {
            for candidate in early {
                session.buffer_candidate(candidate);
            }
        }
        Some(session)
    }
}
