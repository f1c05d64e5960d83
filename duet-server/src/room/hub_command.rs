use duet_core::{ConnectionId, SignalMessage};
use serde::Serialize;
use tokio::sync::oneshot;

/// Commands fed to the session controller by the per-connection tasks.
#[derive(Debug)]
pub enum HubCommand {
    /// A decoded frame from a client.
    Signal {
        conn: ConnectionId,
        msg: SignalMessage,
    },

    /// The websocket closed or failed.
    Disconnected { conn: ConnectionId },

    /// Report pool and room counts.
    Snapshot { reply: oneshot::Sender<HubSnapshot> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HubSnapshot {
    pub waiting: usize,
    pub rooms: usize,
}
