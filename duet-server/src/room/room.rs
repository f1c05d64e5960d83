use duet_core::{ConnectionId, RoomId};

/// Two distinct connections paired for one negotiation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    members: [ConnectionId; 2],
}

impl Room {
    pub(crate) fn new(id: RoomId, a: ConnectionId, b: ConnectionId) -> Self {
        Self { id, members: [a, b] }
    }

    pub fn members(&self) -> [ConnectionId; 2] {
        self.members
    }

    pub fn contains(&self, conn: &ConnectionId) -> bool {
        self.members.contains(conn)
    }

    /// The other member, or `None` if `conn` is not in this room.
    pub fn peer_of(&self, conn: &ConnectionId) -> Option<ConnectionId> {
        match self.members {
            [a, b] if a == *conn => Some(b),
            [a, b] if b == *conn => Some(a),
            _ => None,
        }
    }
}
