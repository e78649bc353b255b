//! Single project room with its joined connections.

use std::collections::HashSet;

use studioflow_core::types::{ConnectionId, ProjectId};

/// The connections currently joined to one project.
#[derive(Debug, Clone)]
pub struct Room {
    /// Project this room belongs to.
    pub project_id: ProjectId,
    /// Joined connection IDs.
    members: HashSet<ConnectionId>,
}

impl Room {
    /// Creates a new empty room.
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            members: HashSet::new(),
        }
    }

    /// Adds a connection. Returns `false` if it was already joined.
    pub fn join(&mut self, conn_id: ConnectionId) -> bool {
        self.members.insert(conn_id)
    }

    /// Removes a connection.
    pub fn leave(&mut self, conn_id: ConnectionId) -> bool {
        self.members.remove(&conn_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Snapshot of the joined connections.
    pub fn members(&self) -> Vec<ConnectionId> {
        self.members.iter().copied().collect()
    }
}
