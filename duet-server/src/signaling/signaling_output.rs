use async_trait::async_trait;
use duet_core::{ConnectionId, SignalMessage};

/// Outbound side of the signaling channel, as seen by the matchmaker, the
/// relay and the session controller.
///
/// Sending to a connection that is already gone must be a no-op.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Whether the connection is still registered as live.
    fn is_open(&self, conn: &ConnectionId) -> bool;

    /// Deliver one frame to a connection.
    async fn send_signal(&self, conn: &ConnectionId, msg: SignalMessage);
}
