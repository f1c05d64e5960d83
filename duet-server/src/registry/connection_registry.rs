use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use duet_core::{ConnectionId, SignalMessage, encode_frame};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Live websocket connections, keyed by their server-assigned id.
///
/// Each entry is the sending half of the socket's outbound queue; the
/// per-socket writer task drains it in order.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<DashMap<ConnectionId, mpsc::UnboundedSender<Message>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, conn: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.connections.insert(conn, tx);
    }

    pub fn unregister(&self, conn: &ConnectionId) {
        self.connections.remove(conn);
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[async_trait]
impl SignalingOutput for ConnectionRegistry {
    fn is_open(&self, conn: &ConnectionId) -> bool {
        self.connections
            .get(conn)
            .is_some_and(|tx| !tx.is_closed())
    }

    async fn send_signal(&self, conn: &ConnectionId, msg: SignalMessage) {
        let Some(tx) = self.connections.get(conn) else {
            debug!("Dropping '{}' for closed connection {}", msg.kind(), conn);
            return;
        };

        match encode_frame(&msg) {
            Ok(json) => {
                if tx.send(Message::Text(json.into())).is_err() {
                    debug!("Outbound queue of {} already closed", conn);
                }
            }
            Err(e) => error!("Failed to serialize signal message: {}", e),
        }
    }
}
