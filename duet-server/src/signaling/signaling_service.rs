use crate::config::ServerConfig;
use crate::registry::ConnectionRegistry;
use crate::room::{HubCommand, HubSnapshot, SessionController};
use axum::extract::ws::Message;
use duet_core::{ConnectionId, SignalMessage};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::error;

/// Handle shared by every websocket task: the connection registry plus the
/// command channel of the session controller.
#[derive(Clone)]
pub struct SignalingService {
    registry: ConnectionRegistry,
    hub_tx: mpsc::Sender<HubCommand>,
}

impl SignalingService {
    pub fn new(registry: ConnectionRegistry, hub_tx: mpsc::Sender<HubCommand>) -> Self {
        Self { registry, hub_tx }
    }

    /// Build the registry, start the session controller on the current
    /// runtime and return the handle to pass to the router.
    pub fn spawn(config: &ServerConfig) -> Self {
        let registry = ConnectionRegistry::new();
        let (hub_tx, hub_rx) = mpsc::channel(config.command_buffer.max(1));

        let controller =
            SessionController::new(hub_rx, Arc::new(registry.clone()), config.room_history);
        tokio::spawn(controller.run());

        Self::new(registry, hub_tx)
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn add_connection(&self, conn: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.registry.register(conn, tx);
    }

    /// Unregister the socket first so the controller already sees it closed
    /// while tearing its room down.
    pub async fn remove_connection(&self, conn: ConnectionId) {
        self.registry.unregister(&conn);
        if self
            .hub_tx
            .send(HubCommand::Disconnected { conn })
            .await
            .is_err()
        {
            error!("Session controller is gone, cannot release {}", conn);
        }
    }

    /// Hand a decoded frame to the controller. Fails only when the
    /// controller has stopped.
    pub async fn dispatch(
        &self,
        conn: ConnectionId,
        msg: SignalMessage,
    ) -> Result<(), mpsc::error::SendError<HubCommand>> {
        self.hub_tx.send(HubCommand::Signal { conn, msg }).await
    }

    pub async fn snapshot(&self) -> Option<HubSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.hub_tx.send(HubCommand::Snapshot { reply }).await.ok()?;
        rx.await.ok()
    }
}
