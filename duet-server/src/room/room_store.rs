use crate::room::Room;
use duet_core::{ConnectionId, RoomId};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("a connection cannot be paired with itself ({0})")]
    SelfPairing(ConnectionId),

    #[error("connection {0} is already in room {1}")]
    AlreadyInRoom(ConnectionId, RoomId),
}

/// Active rooms, with a reverse index so disconnect and skip handling never
/// scan every room.
#[derive(Debug)]
pub struct RoomStore {
    rooms: HashMap<RoomId, Room>,
    by_connection: HashMap<ConnectionId, RoomId>,
    ended: VecDeque<Room>,
    history_limit: usize,
}

impl RoomStore {
    pub fn new(history_limit: usize) -> Self {
        Self {
            rooms: HashMap::new(),
            by_connection: HashMap::new(),
            ended: VecDeque::new(),
            history_limit,
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn create(&mut self, a: ConnectionId, b: ConnectionId) -> Result<RoomId, RoomError> {
        if a == b {
            return Err(RoomError::SelfPairing(a));
        }
        for conn in [a, b] {
            if let Some(room_id) = self.by_connection.get(&conn) {
                return Err(RoomError::AlreadyInRoom(conn, *room_id));
            }
        }

        let id = RoomId::new();
        self.rooms.insert(id, Room::new(id, a, b));
        self.by_connection.insert(a, id);
        self.by_connection.insert(b, id);
        Ok(id)
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn room_of(&self, conn: &ConnectionId) -> Option<&Room> {
        self.by_connection
            .get(conn)
            .and_then(|room_id| self.rooms.get(room_id))
    }

    /// Destroy a room and remember it as ended.
    pub fn remove(&mut self, room_id: &RoomId) -> Option<Room> {
        let room = self.rooms.remove(room_id)?;
        for member in room.members() {
            self.by_connection.remove(&member);
        }
        self.remember(room.clone());
        Some(room)
    }

    /// Destroy a room without keeping it in the history (pairing was never
    /// announced to the members).
    pub fn discard(&mut self, room_id: &RoomId) -> Option<Room> {
        let room = self.rooms.remove(room_id)?;
        for member in room.members() {
            self.by_connection.remove(&member);
        }
        Some(room)
    }

    pub fn remove_by_connection(&mut self, conn: &ConnectionId) -> Option<Room> {
        let room_id = *self.by_connection.get(conn)?;
        self.remove(&room_id)
    }

    /// The partner `conn` had in a room that has already ended.
    pub fn previous_peer(&self, room_id: &RoomId, conn: &ConnectionId) -> Option<ConnectionId> {
        self.ended
            .iter()
            .rev()
            .find(|room| room.id == *room_id)
            .and_then(|room| room.peer_of(conn))
    }

    fn remember(&mut self, room: Room) {
        if self.history_limit == 0 {
            return;
        }
        while self.ended.len() >= self.history_limit {
            self.ended.pop_front();
        }
        self.ended.push_back(room);
    }
}
