use crate::matchmaking::WaitingPool;
use crate::room::RoomStore;
use crate::signaling::SignalingOutput;
use duet_core::{ConnectionId, SignalMessage};
use tracing::{debug, error, info, warn};

/// Pairs waiting connections into rooms, first come first served.
#[derive(Debug, Default)]
pub struct Matchmaker {
    pool: WaitingPool,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waiting(&self) -> usize {
        self.pool.len()
    }

    /// Drop a connection from the pool. Returns whether it was waiting.
    pub fn cancel(&mut self, conn: &ConnectionId) -> bool {
        self.pool.remove(conn)
    }

    /// Pair `conn` with the earliest waiting connection, or enqueue it.
    ///
    /// Both members get `matched` only when both are still open. A closed
    /// candidate is dropped and selection moves on; a closed requester sends
    /// the candidate back to the head of the pool.
    pub async fn request_match(
        &mut self,
        rooms: &mut RoomStore,
        output: &dyn SignalingOutput,
        conn: ConnectionId,
        avoid: Option<ConnectionId>,
    ) {
        self.pool.remove(&conn);

        loop {
            let Some(peer) = self.pool.take_next(&conn, avoid.as_ref()) else {
                self.pool.push(conn);
                info!("{} is waiting for a match ({} in pool)", conn, self.pool.len());
                return;
            };

            let room_id = match rooms.create(conn, peer) {
                Ok(room_id) => room_id,
                Err(e) => {
                    error!("Refusing to pair {} with {}: {}", conn, peer, e);
                    self.pool.push_front(peer);
                    return;
                }
            };

            let conn_open = output.is_open(&conn);
            let peer_open = output.is_open(&peer);

            if conn_open && peer_open {
                info!("Matched {} with {} in room {}", conn, peer, room_id);
                output
                    .send_signal(&conn, SignalMessage::Matched { room_id })
                    .await;
                output
                    .send_signal(&peer, SignalMessage::Matched { room_id })
                    .await;
                return;
            }

            rooms.discard(&room_id);

            if !conn_open {
                debug!("{} closed before pairing, returning {} to the pool", conn, peer);
                if peer_open {
                    self.pool.push_front(peer);
                }
                return;
            }

            warn!("Waiting peer {} is gone, trying the next one", peer);
        }
    }
}
