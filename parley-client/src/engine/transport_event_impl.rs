use tracing::debug;

use crate::engine::{CallEngine, EngineEvent};
use crate::error::SessionError;
use crate::transport::{TransportEvent, TransportFactory};

impl<F: TransportFactory> CallEngine<F> {
    pub(super) async fn handle_transport_event(&mut self, event: TransportEvent<F::Stream>) {
        let current = self
            .sessions
            .get(event.peer_id())
            .map(|session| session.generation());
        if current != Some(event.generation()) {
            debug!("Stale transport event for {}; dropped", event.peer_id());
            return;
        }

        match event {
            TransportEvent::CandidateGenerated {
                peer_id, candidate, ..
            } => {
                self.signaling.send_ice(peer_id, candidate).await;
            }

            TransportEvent::StreamReceived {
                peer_id, stream, ..
            } => {
                if let Some(session) = self.sessions.get_mut(&peer_id) {
                    session.attach_stream(stream.clone());
                }
                self.emit(EngineEvent::PeerStream { peer_id, stream });
            }

            TransportEvent::Failed {
                peer_id, reason, ..
            } => {
                if let Some(session) = self.sessions.remove(&peer_id) {
                    self.abandon(session, SessionError::Transport(reason)).await;
                }
            }
        }
    }
}
