//! Reverse index: which rooms each connection has joined.

use std::collections::HashSet;

use dashmap::DashMap;

use studioflow_core::types::{ConnectionId, ProjectId};

/// Tracks connection-to-room mappings.
#[derive(Debug, Default)]
pub struct SubscriptionTracker {
    conn_to_rooms: DashMap<ConnectionId, HashSet<ProjectId>>,
}

impl SubscriptionTracker {
    /// Creates a new subscription tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a membership.
    pub fn add(&self, conn_id: ConnectionId, room: ProjectId) {
        self.conn_to_rooms.entry(conn_id).or_default().insert(room);
    }

    /// Removes a membership, dropping the entry once it is empty.
    pub fn remove(&self, conn_id: ConnectionId, room: ProjectId) {
        if let Some(mut rooms) = self.conn_to_rooms.get_mut(&conn_id) {
            rooms.remove(&room);
        }
        self.conn_to_rooms.remove_if(&conn_id, |_, rooms| rooms.is_empty());
    }

    /// Number of rooms a connection has joined.
    pub fn count(&self, conn_id: ConnectionId) -> usize {
        self.conn_to_rooms
            .get(&conn_id)
            .map(|entry| entry.value().len())
            .unwrap_or(0)
    }

    /// Whether the connection has joined `room`.
    pub fn contains(&self, conn_id: ConnectionId, room: ProjectId) -> bool {
        self.conn_to_rooms
            .get(&conn_id)
            .is_some_and(|entry| entry.value().contains(&room))
    }

    /// Removes and returns every room of a connection.
    pub fn remove_all(&self, conn_id: ConnectionId) -> HashSet<ProjectId> {
        self.conn_to_rooms
            .remove(&conn_id)
            .map(|(_, rooms)| rooms)
            .unwrap_or_default()
    }

    /// Number of connections with at least one room.
    pub fn tracked_connections(&self) -> usize {
        self.conn_to_rooms.len()
    }
}
