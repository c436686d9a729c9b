use crate::error::SignalingError;
use crate::router::{MessageRouter, RouterCommand, RouterConfig};
use parley_core::{ConnectionId, ParticipantId, SignalMessage};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

/// Frames queued per connection before sends to it start failing.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 64;

const ROUTER_QUEUE_CAPACITY: usize = 1024;

/// An opened connection as seen by the transport layer.
pub struct Connection {
    pub id: ConnectionId,
    /// Text frames the router wants written to this transport. Ends when
    /// the router drops the connection.
    pub outbound: mpsc::Receiver<String>,
}

/// Cloneable front door to the message router, shared by every transport.
#[derive(Clone)]
pub struct SignalingService {
    router_tx: mpsc::Sender<RouterCommand>,
}

impl SignalingService {
    pub fn new(router_tx: mpsc::Sender<RouterCommand>) -> Self {
        Self { router_tx }
    }

    /// Starts a [`MessageRouter`] on the current runtime and returns a
    /// service bound to it.
    pub fn spawn(config: RouterConfig) -> Self {
        let (tx, rx) = mpsc::channel(ROUTER_QUEUE_CAPACITY);
        tokio::spawn(MessageRouter::new(config, rx).run());
        info!("Signaling service started with {:?}", config);
        Self::new(tx)
    }

    pub async fn connect(&self) -> Result<Connection, SignalingError> {
        let id = ConnectionId::new();
        let (outbound_tx, outbound) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);

        self.send(RouterCommand::Connect {
            conn_id: id,
            outbound: outbound_tx,
        })
        .await?;

        Ok(Connection { id, outbound })
    }

    pub async fn submit(
        &self,
        conn_id: ConnectionId,
        message: SignalMessage,
        raw: String,
    ) -> Result<(), SignalingError> {
        self.send(RouterCommand::Inbound {
            conn_id,
            message,
            raw,
        })
        .await
    }

    pub async fn disconnect(&self, conn_id: ConnectionId) -> Result<(), SignalingError> {
        self.send(RouterCommand::Disconnect { conn_id }).await
    }

    pub async fn participants(&self) -> Result<Vec<ParticipantId>, SignalingError> {
        let (reply, rx) = oneshot::channel();
        self.send(RouterCommand::Participants { reply }).await?;
        rx.await.map_err(|_| SignalingError::RouterClosed)
    }

    async fn send(&self, cmd: RouterCommand) -> Result<(), SignalingError> {
        self.router_tx
            .send(cmd)
            .await
            .map_err(|_| SignalingError::RouterClosed)
    }
}
