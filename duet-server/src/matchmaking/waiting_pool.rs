use duet_core::ConnectionId;
use std::collections::VecDeque;

/// Connections waiting for a partner, oldest first. No duplicates.
#[derive(Debug, Default)]
pub struct WaitingPool {
    queue: VecDeque<ConnectionId>,
}

impl WaitingPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, conn: &ConnectionId) -> bool {
        self.queue.contains(conn)
    }

    /// Append at the back. Re-inserting a waiting connection moves it there.
    pub fn push(&mut self, conn: ConnectionId) {
        self.remove(&conn);
        self.queue.push_back(conn);
    }

    /// Put a connection back at the head, keeping its seniority.
    pub fn push_front(&mut self, conn: ConnectionId) {
        self.remove(&conn);
        self.queue.push_front(conn);
    }

    pub fn remove(&mut self, conn: &ConnectionId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|c| c != conn);
        self.queue.len() != before
    }

    /// Take the earliest waiting connection other than `requester`,
    /// preferring anyone but `avoid`. The avoided connection is only handed
    /// out when nobody else is waiting.
    pub fn take_next(
        &mut self,
        requester: &ConnectionId,
        avoid: Option<&ConnectionId>,
    ) -> Option<ConnectionId> {
        let index = self
            .queue
            .iter()
            .position(|c| c != requester && Some(c) != avoid)
            .or_else(|| self.queue.iter().position(|c| c != requester))?;
        self.queue.remove(index)
    }
}
