use crate::engine::{ContextEventSender, ContextKind};
use crate::negotiation::{ActiveContext, CallStatus, NegotiationMachine};
use duet_core::RoomId;
use tracing::{debug, error, info, warn};

impl NegotiationMachine {
    /// Create a fresh context of `kind`, closing the one it replaces.
    pub(super) async fn open_context(&mut self, kind: ContextKind) -> bool {
        self.close_context(kind).await;

        self.epoch += 1;
        let epoch = self.epoch;
        let events = ContextEventSender::new(epoch, kind, self.events_tx.clone());
        match self.factory.create(kind, events).await {
            Ok(peer) => {
                *self.context_mut(kind) = Some(ActiveContext::new(peer, epoch));
                true
            }
            Err(e) => {
                error!("Cannot create {:?} context: {}", kind, e);
                false
            }
        }
    }

    pub(super) async fn close_context(&mut self, kind: ContextKind) {
        let Some(ctx) = self.context_mut(kind).take() else {
            return;
        };

        if kind == ContextKind::Answerer {
            self.remote_tracks.clear();
        }

        if let Err(e) = ctx.peer.close().await {
            warn!("Error while closing {:?} context: {}", kind, e);
        }
    }

    /// Close both contexts and forget everything tied to the current room.
    /// Returns the room that ended, if any.
    pub(super) async fn teardown(&mut self) -> Option<RoomId> {
        let ended = self.room_id();

        self.epoch += 1;
        self.close_context(ContextKind::Offerer).await;
        self.close_context(ContextKind::Answerer).await;
        self.pending.clear();
        self.set_status(CallStatus::Idle);

        ended
    }

    pub(super) async fn handle_peer_lost(&mut self, reason: &str) {
        let Some(room_id) = self.room_id() else {
            debug!("Peer {} notice outside of a room, ignored", reason);
            return;
        };

        info!("Peer {} from room {}, looking for a new match", reason, room_id);

        let ended = self.teardown().await;
        self.request_match(ended);
    }
}
