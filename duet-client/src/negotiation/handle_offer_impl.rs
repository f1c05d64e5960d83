use crate::engine::ContextKind;
use crate::negotiation::NegotiationMachine;
use duet_core::{RoomId, SdpKind, SignalMessage};
use tracing::{info, warn};

impl NegotiationMachine {
    /// Answer the peer's offer with a fresh Answerer, then flush the
    /// candidates that were waiting for it.
    pub(super) async fn handle_offer(&mut self, room_id: RoomId, sdp: String) {
        if !self.is_current_room(&room_id) {
            return;
        }

        if self.answerer.is_some() {
            info!("New offer in room {}, replacing the answering context", room_id);
        }

        if !self.open_context(ContextKind::Answerer).await {
            return;
        }
        let Some(answerer) = self.answerer.as_mut() else {
            return;
        };

        if let Err(e) = answerer
            .peer
            .set_remote_description(SdpKind::Offer, sdp)
            .await
        {
            warn!("Rejected offer in room {}: {}", room_id, e);
            return;
        }
        answerer.remote_described = true;

        match answerer.peer.create_answer().await {
            Ok(sdp) => self.send(SignalMessage::Answer { room_id, sdp }),
            Err(e) => warn!("Cannot create answer for room {}: {}", room_id, e),
        }

        self.drain_pending(ContextKind::Answerer).await;
    }
}
