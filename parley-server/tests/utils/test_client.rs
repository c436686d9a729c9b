use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use parley_core::SignalMessage;
use parley_server::{RouterConfig, SignalingService, signaling_routes};

use super::signal_helpers::SIGNAL_TIMEOUT_MS;

/// Serves the signaling routes on an ephemeral local port.
pub async fn spawn_server(config: RouterConfig) -> Result<(SocketAddr, SignalingService)> {
    let service = SignalingService::spawn(config);
    let app = signaling_routes(service.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("[TestServer] serve failed: {}", e);
        }
    });

    Ok((addr, service))
}

/// A real WebSocket client talking JSON frames.
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let (ws, _) = connect_async(format!("ws://{}/", addr))
            .await
            .context("WebSocket handshake failed")?;
        Ok(Self { ws })
    }

    pub async fn send(&mut self, message: &SignalMessage) -> Result<()> {
        self.send_text(message.to_json()?).await
    }

    pub async fn send_text(&mut self, text: String) -> Result<()> {
        self.ws
            .send(Message::Text(text.into()))
            .await
            .context("Failed to send frame")
    }

    /// Next text frame, skipping control frames.
    pub async fn recv_text(&mut self) -> Result<String> {
        let timeout = std::time::Duration::from_millis(SIGNAL_TIMEOUT_MS);
        loop {
            let frame = tokio::time::timeout(timeout, self.ws.next())
                .await
                .context("Timeout waiting for frame")?
                .context("Socket closed")??;

            if let Message::Text(text) = frame {
                return Ok(text.to_string());
            }
        }
    }

    pub async fn recv(&mut self) -> Result<SignalMessage> {
        let text = self.recv_text().await?;
        SignalMessage::parse(&text)?.context("Unknown message type")
    }

    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await.context("Failed to close socket")
    }
}
