use crate::registry::Registry;
use crate::router::{DuplicateJoin, RouterCommand, RouterConfig};
use parley_core::{ConnectionId, ParticipantId, SignalMessage};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Owns the registry and every open transport. All mutation happens on the
/// task running [`MessageRouter::run`].
pub struct MessageRouter {
    config: RouterConfig,
    registry: Registry,
    connections: HashMap<ConnectionId, mpsc::Sender<String>>,
    command_rx: mpsc::Receiver<RouterCommand>,
}

impl MessageRouter {
    pub fn new(config: RouterConfig, command_rx: mpsc::Receiver<RouterCommand>) -> Self {
        Self {
            config,
            registry: Registry::new(),
            connections: HashMap::new(),
            command_rx,
        }
    }

    pub async fn run(mut self) {
        info!("Message router started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        info!("Command channel closed. Message router finished");
    }

    fn handle_command(&mut self, cmd: RouterCommand) {
        match cmd {
            RouterCommand::Connect { conn_id, outbound } => {
                debug!("Connection {} opened", conn_id);
                self.connections.insert(conn_id, outbound);
            }

            RouterCommand::Inbound {
                conn_id,
                message,
                raw,
            } => {
                if !self.connections.contains_key(&conn_id) {
                    debug!("Dropping {} from closed connection {}", message.kind(), conn_id);
                    return;
                }
                self.route(conn_id, message, raw);
            }

            RouterCommand::Disconnect { conn_id } => {
                self.close_connections(vec![conn_id]);
            }

            RouterCommand::Participants { reply } => {
                let _ = reply.send(self.registry.participants());
            }
        }
    }

    fn route(&mut self, conn_id: ConnectionId, message: SignalMessage, raw: String) {
        match message {
            SignalMessage::Join { from } => self.handle_join(conn_id, from),

            SignalMessage::Offer { ref to, .. }
            | SignalMessage::Answer { ref to, .. }
            | SignalMessage::IceCandidate { ref to, .. } => {
                let Some(target) = self.registry.lookup(to) else {
                    debug!("No recipient {} for {}; dropped", to, message.kind());
                    return;
                };
                if !self.send_to(target, raw) {
                    self.close_connections(vec![target]);
                }
            }

            SignalMessage::Joined { .. } | SignalMessage::Left { .. } => {
                debug!("Ignoring client-sent {} on {}", message.kind(), conn_id);
            }
        }
    }

    fn handle_join(&mut self, conn_id: ConnectionId, from: ParticipantId) {
        if self.config.duplicate_join == DuplicateJoin::Reject {
            if let Some(holder) = self.registry.lookup(&from) {
                if holder != conn_id {
                    warn!("Rejecting duplicate join for {} on {}", from, conn_id);
                    return;
                }
            }
        }

        let registration = self.registry.register(from.clone(), conn_id);
        info!("Participant {} joined on {}", from, conn_id);

        let mut failed = Vec::new();

        if let Some(displaced) = registration.displaced {
            info!("Closing connection {} displaced by new join of {}", displaced, from);
            self.connections.remove(&displaced);
        }

        if let Some(previous) = registration.renamed_from {
            failed.extend(self.broadcast(&SignalMessage::Left { from: previous }, None));
        }

        let skip = (!self.config.notify_sender_on_join).then_some(conn_id);
        failed.extend(self.broadcast(&SignalMessage::Joined { from }, skip));

        self.close_connections(failed);
    }

    /// Tears down connections and announces freed identifiers. Sends that fail
    /// while announcing are queued here rather than recursing.
    fn close_connections(&mut self, mut doomed: Vec<ConnectionId>) {
        while let Some(conn_id) = doomed.pop() {
            if self.connections.remove(&conn_id).is_none() {
                continue;
            }

            let Some(id) = self.registry.remove(&conn_id) else {
                debug!("Connection {} closed before joining", conn_id);
                continue;
            };

            info!("Participant {} left", id);
            doomed.extend(self.broadcast(&SignalMessage::Left { from: id }, None));
        }
    }

    /// Fans `message` out to every open connection. Returns the connections
    /// whose send failed.
    fn broadcast(&self, message: &SignalMessage, skip: Option<ConnectionId>) -> Vec<ConnectionId> {
        let json = match message.to_json() {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize {}: {}", message.kind(), e);
                return Vec::new();
            }
        };

        let mut failed = Vec::new();
        for conn_id in self.connections.keys().copied() {
            if Some(conn_id) == skip {
                continue;
            }
            if !self.send_to(conn_id, json.clone()) {
                failed.push(conn_id);
            }
        }
        failed
    }

    /// Never waits: a full or closed queue counts as a failed transport.
    fn send_to(&self, conn_id: ConnectionId, text: String) -> bool {
        let Some(outbound) = self.connections.get(&conn_id) else {
            return false;
        };

        match outbound.try_send(text) {
            Ok(()) => true,
            Err(e) => {
                warn!("Send to connection {} failed: {}", conn_id, e);
                false
            }
        }
    }
}
