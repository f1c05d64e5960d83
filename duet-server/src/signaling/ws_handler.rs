use crate::SignalingService;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use duet_core::{ConnectionId, FrameError, decode_frame};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    let conn = ConnectionId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, conn, service))
}

async fn handle_socket(socket: WebSocket, conn: ConnectionId, service: SignalingService) {
    info!("New client connected: {}", conn);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_connection(conn, tx);

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
            while let Some(frame) = receiver.next().await {
                let msg = match frame {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!("Websocket error on {}: {}", conn, e);
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => match decode_frame(&text) {
                        Ok(signal) if signal.accepted_by_server() => {
                            if let Err(e) = service.dispatch(conn, signal).await {
                                error!("Session controller died: {}", e);
                                break;
                            }
                        }
                        Ok(signal) => {
                            warn!("Unexpected '{}' from client {}", signal.kind(), conn)
                        }
                        Err(FrameError::UnknownKind(kind)) => {
                            info!("Unknown message kind '{}' from {}", kind, conn)
                        }
                        Err(e) => warn!("Invalid frame from {}: {}", conn, e),
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

    service.remove_connection(conn).await;
    info!("Client disconnected: {}", conn);
}
