use crate::engine::ContextKind;
use crate::negotiation::NegotiationMachine;
use duet_core::{RoomId, SdpKind};
use tracing::warn;

impl NegotiationMachine {
    pub(super) async fn handle_answer(&mut self, room_id: RoomId, sdp: String) {
        if !self.is_current_room(&room_id) {
            return;
        }

        let Some(offerer) = self.offerer.as_mut() else {
            warn!("Answer for room {} without an offering context", room_id);
            return;
        };

        if let Err(e) = offerer
            .peer
            .set_remote_description(SdpKind::Answer, sdp)
            .await
        {
            warn!("Rejected answer in room {}: {}", room_id, e);
            return;
        }
        offerer.remote_described = true;

        self.drain_pending(ContextKind::Offerer).await;
    }
}
