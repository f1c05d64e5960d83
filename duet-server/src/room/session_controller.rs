use crate::matchmaking::Matchmaker;
use crate::room::{HubCommand, HubSnapshot, Relay, RoomStore};
use crate::signaling::SignalingOutput;
use duet_core::{ConnectionId, RoomId, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the waiting pool and the room store.
///
/// Every connection task talks to the controller through one channel, so all
/// matchmaking and room mutations happen on this single task.
pub struct SessionController {
    matchmaker: Matchmaker,
    rooms: RoomStore,
    command_rx: mpsc::Receiver<HubCommand>,
    output: Arc<dyn SignalingOutput>,
}

impl SessionController {
    pub fn new(
        command_rx: mpsc::Receiver<HubCommand>,
        output: Arc<dyn SignalingOutput>,
        room_history: usize,
    ) -> Self {
        Self {
            matchmaker: Matchmaker::new(),
            rooms: RoomStore::new(room_history),
            command_rx,
            output,
        }
    }

    pub async fn run(mut self) {
        info!("Session controller started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Session controller finished");
    }

    async fn handle_command(&mut self, cmd: HubCommand) {
        match cmd {
            HubCommand::Signal { conn, msg } => self.handle_signal(conn, msg).await,

            HubCommand::Disconnected { conn } => self.handle_disconnect(conn).await,

            HubCommand::Snapshot { reply } => {
                let _ = reply.send(HubSnapshot {
                    waiting: self.matchmaker.waiting(),
                    rooms: self.rooms.len(),
                });
            }
        }
    }

    async fn handle_signal(&mut self, conn: ConnectionId, msg: SignalMessage) {
        debug!("'{}' from {}", msg.kind(), conn);

        match msg {
            SignalMessage::MatchRequest { last_room_id } => {
                if let Some(room) = self.rooms.room_of(&conn) {
                    warn!(
                        "Ignoring match_request from {}: still in room {}",
                        conn, room.id
                    );
                    return;
                }

                let avoid = last_room_id.and_then(|room_id| self.rooms.previous_peer(&room_id, &conn));

                self.matchmaker
                    .request_match(&mut self.rooms, self.output.as_ref(), conn, avoid)
                    .await;
            }

            SignalMessage::Offer { .. }
            | SignalMessage::Answer { .. }
            | SignalMessage::Candidate { .. } => {
                Relay::forward(&self.rooms, self.output.as_ref(), &conn, msg).await;
            }

            SignalMessage::SkipPeer { room_id } => self.handle_skip(conn, room_id).await,

            other => warn!("Ignoring server-only message '{}' from {}", other.kind(), conn),
        }
    }

    /// The initiator gets no reply; the other member is told and left idle.
    async fn handle_skip(&mut self, conn: ConnectionId, room_id: RoomId) {
        let in_room = self
            .rooms
            .room_of(&conn)
            .is_some_and(|room| room.id == room_id);

        if !in_room {
            debug!("Stale skip_peer from {} for room {}", conn, room_id);
            return;
        }

        let Some(room) = self.rooms.remove(&room_id) else {
            return;
        };

        info!("{} skipped its peer in room {}", conn, room_id);

        if let Some(peer) = room.peer_of(&conn) {
            if self.output.is_open(&peer) {
                self.output
                    .send_signal(&peer, SignalMessage::PeerSkipped)
                    .await;
            }
        }
    }

    async fn handle_disconnect(&mut self, conn: ConnectionId) {
        if self.matchmaker.cancel(&conn) {
            info!("{} left the waiting pool", conn);
        }

        let Some(room) = self.rooms.remove_by_connection(&conn) else {
            return;
        };

        info!("{} disconnected, closing room {}", conn, room.id);

        if let Some(peer) = room.peer_of(&conn) {
            if self.output.is_open(&peer) {
                self.output
                    .send_signal(&peer, SignalMessage::PeerDisconnected)
                    .await;
            }
        }
    }
}
