use crate::engine::ContextKind;
use crate::negotiation::{CallStatus, NegotiationMachine};
use duet_core::{RoomId, SignalMessage};
use tracing::{error, info, warn};

impl NegotiationMachine {
    pub(super) async fn handle_matched(&mut self, room_id: RoomId) {
        if let Some(current) = self.room_id() {
            warn!("Matched into {} while still in {}, leaving it", room_id, current);
            self.teardown().await;
        }

        info!("Matched into room {}", room_id);
        self.set_status(CallStatus::Negotiating { room_id });

        if !self.open_context(ContextKind::Offerer).await {
            return;
        }
        let Some(offerer) = self.offerer.as_ref() else {
            return;
        };

        if let Err(e) = offerer.peer.attach_local_media().await {
            error!("Cannot attach local media: {}", e);
            return;
        }

        match offerer.peer.create_offer().await {
            Ok(sdp) => self.send(SignalMessage::Offer { room_id, sdp }),
            Err(e) => error!("Cannot create offer for room {}: {}", room_id, e),
        }
    }
}
