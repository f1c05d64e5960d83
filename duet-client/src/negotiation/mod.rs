mod handle_answer_impl;
mod handle_candidate_impl;
mod handle_matched_impl;
mod handle_offer_impl;
mod lifecycle_impl;
mod pending;
mod signal_sink;

pub use pending::*;
pub use signal_sink::*;

use crate::engine::{
    ContextEvent, ContextFactory, ContextKind, PeerContext, PeerState, RemoteTrack, StampedEvent,
};
use duet_core::{RoomId, SignalMessage};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// What the user should be shown about the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Idle,
    /// Waiting for the server to find a peer.
    Searching,
    /// Paired; media not flowing yet.
    Negotiating { room_id: RoomId },
    Connected { room_id: RoomId },
}

impl CallStatus {
    pub fn room_id(&self) -> Option<RoomId> {
        match self {
            CallStatus::Negotiating { room_id } | CallStatus::Connected { room_id } => {
                Some(*room_id)
            }
            CallStatus::Idle | CallStatus::Searching => None,
        }
    }
}

struct ActiveContext {
    peer: Box<dyn PeerContext>,
    /// Epoch the context was opened in; its events carry the same value.
    epoch: u64,
    remote_described: bool,
}

impl ActiveContext {
    fn new(peer: Box<dyn PeerContext>, epoch: u64) -> Self {
        Self {
            peer,
            epoch,
            remote_described: false,
        }
    }
}

/// Client side of one call: the Offerer/Answerer pair, buffered remote
/// candidates and the current room.
///
/// Every method takes `&mut self` and runs to completion before the next
/// input is looked at, so a candidate can never race the remote description
/// of its context.
pub struct NegotiationMachine {
    factory: Arc<dyn ContextFactory>,
    sink: Arc<dyn SignalSink>,
    events_tx: mpsc::UnboundedSender<StampedEvent>,
    status_tx: watch::Sender<CallStatus>,
    /// Bumped on every teardown and every opened context. An event is only
    /// accepted when it carries the epoch of the live context of its kind.
    epoch: u64,
    offerer: Option<ActiveContext>,
    answerer: Option<ActiveContext>,
    pending: PendingCandidates,
    remote_tracks: Vec<RemoteTrack>,
}

impl NegotiationMachine {
    /// Returns the machine and the receiver its contexts report into.
    pub fn new(
        factory: Arc<dyn ContextFactory>,
        sink: Arc<dyn SignalSink>,
    ) -> (Self, mpsc::UnboundedReceiver<StampedEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (status_tx, _) = watch::channel(CallStatus::Idle);

        let machine = Self {
            factory,
            sink,
            events_tx,
            status_tx,
            epoch: 0,
            offerer: None,
            answerer: None,
            pending: PendingCandidates::new(),
            remote_tracks: Vec::new(),
        };

        (machine, events_rx)
    }

    pub fn status(&self) -> CallStatus {
        *self.status_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CallStatus> {
        self.status_tx.subscribe()
    }

    pub fn room_id(&self) -> Option<RoomId> {
        self.status().room_id()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn has_context(&self, kind: ContextKind) -> bool {
        self.context(kind).is_some()
    }

    pub fn pending(&self) -> &PendingCandidates {
        &self.pending
    }

    /// Tracks received from the current peer.
    pub fn remote_tracks(&self) -> &[RemoteTrack] {
        &self.remote_tracks
    }

    /// Ask the server for a first partner.
    pub fn start(&mut self) {
        self.request_match(None);
    }

    pub async fn handle_signal(&mut self, msg: SignalMessage) {
        debug!("Received '{}'", msg.kind());

        match msg {
            SignalMessage::Matched { room_id } => self.handle_matched(room_id).await,

            SignalMessage::Offer { room_id, sdp } => self.handle_offer(room_id, sdp).await,

            SignalMessage::Answer { room_id, sdp } => self.handle_answer(room_id, sdp).await,

            SignalMessage::Candidate {
                room_id,
                candidate,
                connection_type,
            } => {
                self.handle_candidate(room_id, candidate, connection_type)
                    .await
            }

            SignalMessage::PeerDisconnected => self.handle_peer_lost("disconnected").await,

            SignalMessage::PeerSkipped => self.handle_peer_lost("skipped").await,

            other => warn!("Ignoring client-only message '{}'", other.kind()),
        }
    }

    pub async fn handle_event(&mut self, stamped: StampedEvent) {
        let live = self
            .context(stamped.kind)
            .is_some_and(|ctx| ctx.epoch == stamped.epoch);
        if !live {
            debug!(
                "Dropping {:?} event from closed context (epoch {})",
                stamped.kind, stamped.epoch
            );
            return;
        }

        match stamped.event {
            ContextEvent::LocalCandidate(candidate) => {
                let Some(room_id) = self.room_id() else {
                    debug!("Local candidate outside of a room, dropped");
                    return;
                };

                self.send(SignalMessage::Candidate {
                    room_id,
                    candidate,
                    connection_type: stamped.kind.outgoing_role(),
                });
            }

            ContextEvent::RemoteTrack(track) => {
                if stamped.kind == ContextKind::Answerer {
                    info!("Receiving remote {} track {}", track.kind, track.id);
                    self.remote_tracks.push(track);
                } else {
                    debug!("Ignoring track {} on the offering context", track.id);
                }
            }

            ContextEvent::StateChanged(state) => {
                info!("{:?} context is now {:?}", stamped.kind, state);

                match (state, self.status()) {
                    (PeerState::Connected, CallStatus::Negotiating { room_id }) => {
                        self.set_status(CallStatus::Connected { room_id });
                    }
                    (PeerState::Failed, _) => {
                        warn!("{:?} context failed", stamped.kind);
                    }
                    _ => {}
                }
            }
        }
    }

    /// Leave the current peer and look for another one.
    pub async fn skip(&mut self) {
        let Some(room_id) = self.room_id() else {
            debug!("Nothing to skip, not in a room");
            return;
        };

        info!("Skipping peer in room {}", room_id);
        self.send(SignalMessage::SkipPeer { room_id });

        let ended = self.teardown().await;
        self.request_match(ended);
    }

    /// Close everything and stop matchmaking.
    pub async fn shutdown(&mut self) {
        if let Some(room_id) = self.teardown().await {
            info!("Left room {}", room_id);
        }
    }

    fn request_match(&mut self, last_room_id: Option<RoomId>) {
        self.send(SignalMessage::MatchRequest { last_room_id });
        self.set_status(CallStatus::Searching);
    }

    fn context(&self, kind: ContextKind) -> Option<&ActiveContext> {
        match kind {
            ContextKind::Offerer => self.offerer.as_ref(),
            ContextKind::Answerer => self.answerer.as_ref(),
        }
    }

    fn context_mut(&mut self, kind: ContextKind) -> &mut Option<ActiveContext> {
        match kind {
            ContextKind::Offerer => &mut self.offerer,
            ContextKind::Answerer => &mut self.answerer,
        }
    }

    /// True when `room_id` is the room this client is in. Anything else is
    /// late traffic from a room already left.
    fn is_current_room(&self, room_id: &RoomId) -> bool {
        if self.room_id().as_ref() == Some(room_id) {
            return true;
        }
        debug!("Dropping message for stale room {}", room_id);
        false
    }

    fn set_status(&self, status: CallStatus) {
        self.status_tx.send_replace(status);
    }

    fn send(&self, msg: SignalMessage) {
        let kind = msg.kind();
        if let Err(e) = self.sink.send_signal(msg) {
            warn!("Cannot send '{}': {}", kind, e);
        }
    }
}
