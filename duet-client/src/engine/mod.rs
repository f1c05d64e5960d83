mod webrtc_context;

pub use webrtc_context::*;

use crate::ClientError;
use async_trait::async_trait;
use duet_core::{ConnectionRole, IceCandidate, SdpKind};
use tokio::sync::mpsc;

/// The two native negotiation contexts a client runs per room.
///
/// The Offerer sends local media and creates the offer as soon as the room
/// is formed. The Answerer receives the peer's media in reply to its offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Offerer,
    Answerer,
}

impl ContextKind {
    /// Tag carried by candidates this context gathers.
    pub fn outgoing_role(self) -> ConnectionRole {
        match self {
            ContextKind::Offerer => ConnectionRole::Sender,
            ContextKind::Answerer => ConnectionRole::Receiver,
        }
    }

    /// Local context an incoming candidate tagged `role` is meant for.
    pub fn target_of(role: ConnectionRole) -> Self {
        match role {
            ConnectionRole::Sender => ContextKind::Answerer,
            ConnectionRole::Receiver => ContextKind::Offerer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTrack {
    pub id: String,
    pub stream_id: String,
    /// `audio` or `video`.
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Something a native context reported on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextEvent {
    LocalCandidate(IceCandidate),
    RemoteTrack(RemoteTrack),
    StateChanged(PeerState),
}

/// A context event tagged with the kind and epoch of the context that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct StampedEvent {
    pub epoch: u64,
    pub kind: ContextKind,
    pub event: ContextEvent,
}

/// Handed to a context at creation; native callbacks report through it.
#[derive(Debug, Clone)]
pub struct ContextEventSender {
    epoch: u64,
    kind: ContextKind,
    tx: mpsc::UnboundedSender<StampedEvent>,
}

impl ContextEventSender {
    pub fn new(epoch: u64, kind: ContextKind, tx: mpsc::UnboundedSender<StampedEvent>) -> Self {
        Self { epoch, kind, tx }
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns false once the session is gone.
    pub fn emit(&self, event: ContextEvent) -> bool {
        self.tx
            .send(StampedEvent {
                epoch: self.epoch,
                kind: self.kind,
                event,
            })
            .is_ok()
    }
}

/// One native WebRTC peer connection, seen from the negotiation logic.
#[async_trait]
pub trait PeerContext: Send + Sync {
    /// Attach the locally captured tracks. Only called on the Offerer.
    async fn attach_local_media(&self) -> Result<(), ClientError>;

    /// Create an offer, install it as the local description and return its SDP.
    async fn create_offer(&self) -> Result<String, ClientError>;

    /// Create an answer, install it as the local description and return its SDP.
    async fn create_answer(&self) -> Result<String, ClientError>;

    async fn set_remote_description(&self, kind: SdpKind, sdp: String) -> Result<(), ClientError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), ClientError>;

    async fn close(&self) -> Result<(), ClientError>;
}

#[async_trait]
pub trait ContextFactory: Send + Sync {
    async fn create(
        &self,
        kind: ContextKind,
        events: ContextEventSender,
    ) -> Result<Box<dyn PeerContext>, ClientError>;
}
