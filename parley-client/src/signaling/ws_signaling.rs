use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use parley_core::{ParticipantId, SignalMessage};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::SessionError;
use crate::signaling::SignalingOutput;

const INBOUND_QUEUE_CAPACITY: usize = 256;

/// WebSocket connection to the signaling server, joined as `local_id`.
#[derive(Clone)]
pub struct WsSignaling {
    local_id: ParticipantId,
    tx: mpsc::UnboundedSender<SignalMessage>,
}

impl WsSignaling {
    /// Connects, announces `join`, and returns the sending half plus a
    /// receiver of every message the server relays to us. The receiver ends
    /// when the socket closes.
    pub async fn connect(
        url: &str,
        local_id: ParticipantId,
    ) -> Result<(Self, mpsc::Receiver<SignalMessage>), SessionError> {
        let (ws, _) = connect_async(url).await?;
        info!("Connected to signaling server {} as {}", url, local_id);

        let (mut sink, mut stream) = ws.split();
        let (tx, mut outbound_rx) = mpsc::unbounded_channel::<SignalMessage>();
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE_CAPACITY);

        tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let json = match msg.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize signal message: {}", e);
                        continue;
                    }
                };
                if sink.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            let _ = sink.close().await;
        });

        tokio::spawn(async move {
            while let Some(Ok(frame)) = stream.next().await {
                match frame {
                    Message::Text(text) => match SignalMessage::parse(&text) {
                        Ok(Some(msg)) => {
                            if inbound_tx.send(msg).await.is_err() {
                                break;
                            }
                        }
                        Ok(None) => debug!("Ignoring unknown signaling message"),
                        Err(e) => warn!("Invalid SignalMessage from server: {}", e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            info!("Signaling socket closed");
        });

        let signaling = Self { local_id, tx };
        signaling.send(SignalMessage::Join {
            from: signaling.local_id.clone(),
        })?;

        Ok((signaling, inbound_rx))
    }

    pub fn local_id(&self) -> &ParticipantId {
        &self.local_id
    }

    pub fn send(&self, msg: SignalMessage) -> Result<(), SessionError> {
        self.tx.send(msg).map_err(|_| SessionError::SignalingClosed)
    }

    fn send_or_log(&self, msg: SignalMessage) {
        let kind = msg.kind();
        if let Err(e) = self.send(msg) {
            warn!("Dropping outgoing {}: {}", kind, e);
        }
    }
}

#[async_trait]
impl SignalingOutput for WsSignaling {
    async fn send_offer(&self, to: ParticipantId, signal: Value) {
        self.send_or_log(SignalMessage::Offer {
            from: self.local_id.clone(),
            to,
            signal,
        });
    }

    async fn send_answer(&self, to: ParticipantId, signal: Value) {
        self.send_or_log(SignalMessage::Answer {
            from: self.local_id.clone(),
            to,
            signal,
        });
    }

    async fn send_ice(&self, to: ParticipantId, candidate: Value) {
        self.send_or_log(SignalMessage::IceCandidate {
            from: self.local_id.clone(),
            to,
            candidate,
        });
    }
}
