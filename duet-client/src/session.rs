use crate::engine::{ContextFactory, StampedEvent};
use crate::negotiation::{CallStatus, NegotiationMachine, SignalSink};
use crate::ClientError;
use duet_core::SignalMessage;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Leave the current peer and look for another one.
    Skip,
    /// End the session.
    HangUp,
}

/// Control side of a running [`ClientSession`].
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    status: watch::Receiver<CallStatus>,
}

impl SessionHandle {
    pub fn skip(&self) -> Result<(), ClientError> {
        self.command(SessionCommand::Skip)
    }

    pub fn hang_up(&self) -> Result<(), ClientError> {
        self.command(SessionCommand::HangUp)
    }

    pub fn status(&self) -> CallStatus {
        *self.status.borrow()
    }

    pub fn watch_status(&self) -> watch::Receiver<CallStatus> {
        self.status.clone()
    }

    fn command(&self, cmd: SessionCommand) -> Result<(), ClientError> {
        self.commands
            .send(cmd)
            .map_err(|_| ClientError::ChannelClosed)
    }
}

/// Drives one [`NegotiationMachine`] from three sources: frames from the
/// signaling server, events from the native contexts and user commands.
pub struct ClientSession {
    machine: NegotiationMachine,
    inbound_rx: mpsc::UnboundedReceiver<SignalMessage>,
    events_rx: mpsc::UnboundedReceiver<StampedEvent>,
    commands_rx: mpsc::UnboundedReceiver<SessionCommand>,
}

impl ClientSession {
    pub fn new(
        factory: Arc<dyn ContextFactory>,
        sink: Arc<dyn SignalSink>,
        inbound_rx: mpsc::UnboundedReceiver<SignalMessage>,
    ) -> (Self, SessionHandle) {
        let (machine, events_rx) = NegotiationMachine::new(factory, sink);
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();

        let handle = SessionHandle {
            commands: commands_tx,
            status: machine.subscribe(),
        };

        let session = Self {
            machine,
            inbound_rx,
            events_rx,
            commands_rx,
        };

        (session, handle)
    }

    pub async fn run(mut self) {
        info!("Client session started");
        self.machine.start();

        loop {
            tokio::select! {
                msg = self.inbound_rx.recv() => match msg {
                    Some(msg) => self.machine.handle_signal(msg).await,
                    None => {
                        info!("Signaling channel closed");
                        break;
                    }
                },

                Some(event) = self.events_rx.recv() => self.machine.handle_event(event).await,

                Some(cmd) = self.commands_rx.recv() => match cmd {
                    SessionCommand::Skip => self.machine.skip().await,
                    SessionCommand::HangUp => {
                        debug!("Hang up requested");
                        break;
                    }
                },
            }
        }

        self.machine.shutdown().await;
        info!("Client session finished");
    }
}
