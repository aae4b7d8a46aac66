use crate::peer::PeerId;
use crate::relay::RelayService;
use axum::extract::State;
use axum::extract::WebSocketUpgrade;
use axum::extract::ws::{Message, WebSocket};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<RelayService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, PeerId::new(), service))
}

async fn handle_socket(socket: WebSocket, peer_id: PeerId, service: RelayService) {
    info!("New WebSocket connection: {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_peer(peer_id, tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(next) = receiver.next().await {
                let msg = match next {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!("WebSocket error from {}: {}", peer_id, e);
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => {
                        service.forward(&peer_id, text);
                    }
                    Message::Close(_) => break,
                    other => debug!("Ignoring non-text frame from {}: {:?}", peer_id, other),
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_peer(&peer_id);
    info!("WebSocket disconnected: {}", peer_id);
}
