use parley_core::SignalMessage;
use tracing::{debug, info};

use crate::engine::CallEngine;
use crate::transport::TransportFactory;

impl<F: TransportFactory> CallEngine<F> {
    pub(super) async fn handle_signal(&mut self, msg: SignalMessage) {
        if let Some(to) = msg.recipient() {
            if to != &self.local_id {
                debug!("Ignoring {} addressed to {}", msg.kind(), to);
                return;
            }
        }

        match msg {
            SignalMessage::Joined { from } => {
                if from == self.local_id {
                    debug!("Own join acknowledged");
                    return;
                }
                info!("Peer {} joined; initiating", from);
                self.init_connection(from).await;
            }

            SignalMessage::Left { from } => {
                info!("Peer {} left", from);
                self.teardown(&from).await;
            }

            SignalMessage::Offer { from, signal, .. } => {
                self.handle_remote_offer(from, signal).await;
            }

            SignalMessage::Answer { from, signal, .. } => {
                self.handle_answer(from, signal).await;
            }

            SignalMessage::IceCandidate {
                from, candidate, ..
            } => {
                self.handle_ice(from, candidate).await;
            }

            SignalMessage::Join { .. } => {}
        }
    }
}
