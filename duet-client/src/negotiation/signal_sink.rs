use crate::ClientError;
use duet_core::SignalMessage;
use tokio::sync::mpsc;

/// Outbound side of the signaling channel, as seen by the negotiation
/// logic. Sending never blocks.
pub trait SignalSink: Send + Sync {
    fn send_signal(&self, msg: SignalMessage) -> Result<(), ClientError>;
}

impl SignalSink for mpsc::UnboundedSender<SignalMessage> {
    fn send_signal(&self, msg: SignalMessage) -> Result<(), ClientError> {
        self.send(msg).map_err(|_| ClientError::ChannelClosed)
    }
}
