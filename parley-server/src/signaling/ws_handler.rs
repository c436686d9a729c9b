use crate::SignalingService;
use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use parley_core::SignalMessage;
use tracing::{debug, error, info, warn};

/// Routes serving the signaling WebSocket on `/` and `/ws`.
pub fn signaling_routes(service: SignalingService) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .with_state(service)
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let connection = match service.connect().await {
        Ok(connection) => connection,
        Err(e) => {
            error!("Cannot register WebSocket connection: {}", e);
            return;
        }
    };
    let conn_id = connection.id;
    let mut outbound = connection.outbound;
    info!("New WebSocket connection: {}", conn_id);

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match SignalMessage::parse(text.as_str()) {
                        Ok(Some(message)) => {
                            let raw = text.as_str().to_owned();
                            if let Err(e) = service.submit(conn_id, message, raw).await {
                                error!("Router died: {}", e);
                                break;
                            }
                        }
                        Ok(None) => debug!("Ignoring unknown message type from {}", conn_id),
                        Err(e) => warn!("Invalid SignalMessage from {}: {}", conn_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    let _ = service.disconnect(conn_id).await;
    info!("WebSocket disconnected: {}", conn_id);
}
