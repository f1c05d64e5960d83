use async_trait::async_trait;
use dashmap::DashSet;
use duet_core::{ConnectionId, SignalMessage};
use duet_server::SignalingOutput;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub conn: ConnectionId,
    pub msg: SignalMessage,
}

/// Mock SignalingOutput that records every frame the controller sends.
#[derive(Clone)]
pub struct MockSignalingOutput {
    /// Connections currently considered live.
    open: Arc<DashSet<ConnectionId>>,
    /// Channel to stream deliveries as they happen.
    tx: mpsc::UnboundedSender<Delivery>,
    /// All deliveries (for verification).
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl MockSignalingOutput {
    /// Create a new MockSignalingOutput and its receiver channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let output = Self {
            open: Arc::new(DashSet::new()),
            tx,
            deliveries: Arc::new(Mutex::new(Vec::new())),
        };
        (output, rx)
    }

    /// Register a fresh live connection.
    pub fn open_connection(&self) -> ConnectionId {
        let conn = ConnectionId::new();
        self.open.insert(conn);
        conn
    }

    /// Mark a connection closed without telling the controller.
    pub fn close(&self, conn: &ConnectionId) {
        self.open.remove(conn);
    }

    /// Everything delivered to one connection, in order.
    pub async fn deliveries_for(&self, conn: &ConnectionId) -> Vec<SignalMessage> {
        self.deliveries
            .lock()
            .await
            .iter()
            .filter(|d| &d.conn == conn)
            .map(|d| d.msg.clone())
            .collect()
    }

    pub async fn total_deliveries(&self) -> usize {
        self.deliveries.lock().await.len()
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    fn is_open(&self, conn: &ConnectionId) -> bool {
        self.open.contains(conn)
    }

    async fn send_signal(&self, conn: &ConnectionId, msg: SignalMessage) {
        tracing::debug!("[MockSignaling] '{}' to {}", msg.kind(), conn);

        let delivery = Delivery {
            conn: *conn,
            msg,
        };

        self.deliveries.lock().await.push(delivery.clone());
        let _ = self.tx.send(delivery);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signaling_captures_deliveries() {
        let (output, mut rx) = MockSignalingOutput::new();
        let conn = output.open_connection();

        output.send_signal(&conn, SignalMessage::PeerSkipped).await;

        let delivery = rx.recv().await.unwrap();
        assert_eq!(delivery.conn, conn);
        assert_eq!(
            output.deliveries_for(&conn).await,
            vec![SignalMessage::PeerSkipped]
        );
    }

    #[tokio::test]
    async fn test_mock_signaling_tracks_liveness() {
        let (output, _rx) = MockSignalingOutput::new();
        let conn = output.open_connection();
        assert!(output.is_open(&conn));

        output.close(&conn);
        assert!(!output.is_open(&conn));
    }
}
