//! Room registry: project rooms and their joined connections.

use dashmap::DashMap;

use studioflow_core::types::{ConnectionId, ProjectId};

use super::room::Room;
use super::subscription::SubscriptionTracker;

/// Registry of every non-empty project room.
///
/// Empty rooms are removed as soon as their last connection leaves.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<ProjectId, Room>,
    subscriptions: SubscriptionTracker,
}

impl RoomRegistry {
    /// Creates a new room registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins a connection to a room. Returns `false` if already joined.
    pub fn join(&self, project_id: ProjectId, conn_id: ConnectionId) -> bool {
        let added = self
            .rooms
            .entry(project_id)
            .or_insert_with(|| Room::new(project_id))
            .join(conn_id);
        self.subscriptions.add(conn_id, project_id);
        added
    }

    /// Removes a connection from a room. Returns `false` if it was not
    /// joined.
    pub fn leave(&self, project_id: ProjectId, conn_id: ConnectionId) -> bool {
        let removed = self
            .rooms
            .get_mut(&project_id)
            .map(|mut room| room.leave(conn_id))
            .unwrap_or(false);
        self.rooms.remove_if(&project_id, |_, room| room.is_empty());
        self.subscriptions.remove(conn_id, project_id);
        removed
    }

    /// Removes a connection from every room it joined.
    pub fn leave_all(&self, conn_id: ConnectionId) {
        for project_id in self.subscriptions.remove_all(conn_id) {
            if let Some(mut room) = self.rooms.get_mut(&project_id) {
                room.leave(conn_id);
            }
            self.rooms.remove_if(&project_id, |_, room| room.is_empty());
        }
    }

    /// Connections currently joined to a room.
    pub fn members(&self, project_id: ProjectId) -> Vec<ConnectionId> {
        self.rooms
            .get(&project_id)
            .map(|room| room.members())
            .unwrap_or_default()
    }

    /// Whether `conn_id` has joined the room.
    pub fn is_member(&self, project_id: ProjectId, conn_id: ConnectionId) -> bool {
        self.subscriptions.contains(conn_id, project_id)
    }

    /// Number of rooms a connection has joined.
    pub fn room_count(&self, conn_id: ConnectionId) -> usize {
        self.subscriptions.count(conn_id)
    }

    /// Number of non-empty rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
