use parley_core::{ParticipantId, SignalMessage};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::error::SessionError;
use crate::session::{PeerSession, SessionState};
use crate::signaling::SignalingOutput;
use crate::transport::{TransportEvent, TransportFactory};

mod handle_answer_impl;
mod handle_ice_impl;
mod handle_remote_offer_impl;
mod handle_signal_impl;
mod init_connection_impl;
mod teardown_impl;
mod transport_event_impl;

/// Upper bound on distinct peers holding candidates before their session exists.
pub const MAX_BUFFERED_PEERS: usize = 16;

/// What the UI layer observes.
#[derive(Debug, Clone)]
pub enum EngineEvent<S> {
    /// Remote media for `peer_id`; render it.
    PeerStream { peer_id: ParticipantId, stream: S },
    /// `peer_id`'s session is gone; drop its media.
    PeerClosed { peer_id: ParticipantId },
}

#[derive(Debug)]
pub enum EngineCommand {
    /// Local hangup of one peer.
    Hangup(ParticipantId),
    SessionState {
        peer_id: ParticipantId,
        reply: oneshot::Sender<Option<SessionState>>,
    },
    Peers {
        reply: oneshot::Sender<Vec<ParticipantId>>,
    },
    /// Tear down every session and stop.
    Shutdown,
}

/// Control handle for a running [`CallEngine`].
#[derive(Clone)]
pub struct EngineHandle {
    command_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub async fn hangup(&self, peer_id: ParticipantId) -> Result<(), SessionError> {
        self.send(EngineCommand::Hangup(peer_id)).await
    }

    pub async fn session_state(
        &self,
        peer_id: ParticipantId,
    ) -> Result<Option<SessionState>, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::SessionState { peer_id, reply })
            .await?;
        rx.await.map_err(|_| SessionError::EngineStopped)
    }

    /// Peers with a live session, sorted.
    pub async fn peers(&self) -> Result<Vec<ParticipantId>, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::Peers { reply }).await?;
        rx.await.map_err(|_| SessionError::EngineStopped)
    }

    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.send(EngineCommand::Shutdown).await
    }

    async fn send(&self, cmd: EngineCommand) -> Result<(), SessionError> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| SessionError::EngineStopped)
    }
}

/// Client-side peer-session state machine. Owns one [`PeerSession`] per remote
/// participant and is the only writer of all of them.
pub struct CallEngine<F: TransportFactory> {
    local_id: ParticipantId,
    factory: F,
    sessions: HashMap<ParticipantId, PeerSession<F::Stream>>,
    /// Remote candidates that arrived before their session existed.
    early_candidates: HashMap<ParticipantId, Vec<Value>>,
    next_generation: u64,
    signaling: Arc<dyn SignalingOutput>,
    signal_rx: mpsc::Receiver<SignalMessage>,
    command_rx: mpsc::Receiver<EngineCommand>,
    transport_tx: mpsc::UnboundedSender<TransportEvent<F::Stream>>,
    transport_rx: mpsc::UnboundedReceiver<TransportEvent<F::Stream>>,
    events_tx: mpsc::UnboundedSender<EngineEvent<F::Stream>>,
}

impl<F: TransportFactory> CallEngine<F> {
    /// `signal_rx` carries every message the signaling server relays to
    /// `local_id`.
    pub fn new(
        local_id: ParticipantId,
        factory: F,
        signaling: Arc<dyn SignalingOutput>,
        signal_rx: mpsc::Receiver<SignalMessage>,
    ) -> (
        Self,
        EngineHandle,
        mpsc::UnboundedReceiver<EngineEvent<F::Stream>>,
    ) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (transport_tx, transport_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let engine = Self {
            local_id,
            factory,
            sessions: HashMap::new(),
            early_candidates: HashMap::new(),
            next_generation: 0,
            signaling,
            signal_rx,
            command_rx,
            transport_tx,
            transport_rx,
            events_tx,
        };

        (engine, EngineHandle { command_tx }, events_rx)
    }

    pub async fn run(mut self) {
        info!("Call engine for {} started", self.local_id);

        loop {
            tokio::select! {
                msg = self.signal_rx.recv() => {
                    match msg {
                        Some(m) => self.handle_signal(m).await,
                        None => {
                            info!("Signaling channel closed. Shutting down engine.");
                            break;
                        }
                    }
                }

                Some(evt) = self.transport_rx.recv() => {
                    self.handle_transport_event(evt).await;
                }

                Some(cmd) = self.command_rx.recv() => {
                    if !self.handle_command(cmd).await {
                        break;
                    }
                }
            }
        }

        self.teardown_all().await;
        info!("Call engine for {} finished", self.local_id);
    }

    /// Returns false when the engine should stop.
    async fn handle_command(&mut self, cmd: EngineCommand) -> bool {
        match cmd {
            EngineCommand::Hangup(peer_id) => {
                self.teardown(&peer_id).await;
            }
            EngineCommand::SessionState { peer_id, reply } => {
                let _ = reply.send(self.sessions.get(&peer_id).map(PeerSession::state));
            }
            EngineCommand::Peers { reply } => {
                let mut peers: Vec<ParticipantId> = self.sessions.keys().cloned().collect();
                peers.sort();
                let _ = reply.send(peers);
            }
            EngineCommand::Shutdown => return false,
        }
        true
    }

    fn next_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    fn emit(&self, event: EngineEvent<F::Stream>) {
        if self.events_tx.send(event).is_err() {
            debug!("UI event receiver dropped");
        }
    }
}
