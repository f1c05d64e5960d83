use crate::room::RoomStore;
use crate::signaling::SignalingOutput;
use duet_core::{ConnectionId, SignalMessage};
use tracing::debug;

/// Forwards negotiation payloads to the other member of the sender's room.
pub struct Relay;

impl Relay {
    /// Messages for unknown rooms, or rooms the sender is not part of, are
    /// dropped without telling the sender.
    pub async fn forward(
        rooms: &RoomStore,
        output: &dyn SignalingOutput,
        conn: &ConnectionId,
        msg: SignalMessage,
    ) {
        let Some(room_id) = msg.room_id() else {
            return;
        };

        let Some(peer) = rooms.get(&room_id).and_then(|room| room.peer_of(conn)) else {
            debug!(
                "Dropping '{}' from {}: room {} unknown or not joined",
                msg.kind(),
                conn,
                room_id
            );
            return;
        };

        if !output.is_open(&peer) {
            debug!("Dropping '{}' for closed peer {}", msg.kind(), peer);
            return;
        }

        output.send_signal(&peer, msg).await;
    }
}
