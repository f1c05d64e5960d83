use crate::engine::ContextKind;
use crate::negotiation::NegotiationMachine;
use duet_core::{ConnectionRole, IceCandidate, RoomId};
use tracing::{debug, warn};

impl NegotiationMachine {
    /// Apply a remote candidate now, or buffer it until its target context
    /// has a remote description.
    pub(super) async fn handle_candidate(
        &mut self,
        room_id: RoomId,
        candidate: IceCandidate,
        role: ConnectionRole,
    ) {
        if !self.is_current_room(&room_id) {
            return;
        }

        let target = ContextKind::target_of(role);
        let ready = self
            .context(target)
            .is_some_and(|ctx| ctx.remote_described);

        if !ready {
            debug!("Buffering candidate for {:?}", target);
            self.pending.push(target, candidate);
            return;
        }

        if let Some(ctx) = self.context(target) {
            if let Err(e) = ctx.peer.add_ice_candidate(candidate).await {
                warn!("Rejected remote candidate for {:?}: {}", target, e);
            }
        }
    }

    pub(super) async fn drain_pending(&mut self, target: ContextKind) {
        let queued = self.pending.take_for(target);
        if queued.is_empty() {
            return;
        }

        let Some(ctx) = self.context(target) else {
            return;
        };

        debug!("Applying {} buffered candidates to {:?}", queued.len(), target);
        for candidate in queued {
            if let Err(e) = ctx.peer.add_ice_candidate(candidate).await {
                warn!("Rejected buffered candidate for {:?}: {}", target, e);
            }
        }
    }
}
