//! Connection pool: every live connection, indexed by user and by ID.

use std::sync::Arc;

use dashmap::DashMap;

use studioflow_core::types::{ConnectionId, UserId};

use super::handle::ConnectionHandle;

/// Thread-safe pool of all live connections.
///
/// A user entry exists only while the user has at least one connection.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// User ID → connections, oldest first.
    by_user: DashMap<UserId, Vec<Arc<ConnectionHandle>>>,
    /// Connection ID → handle.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle.clone());
        self.by_user.entry(handle.user_id).or_default().push(handle);
    }

    /// Removes a connection. Absent IDs are a no-op.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        if let Some(mut connections) = self.by_user.get_mut(&handle.user_id) {
            connections.retain(|c| c.id != *conn_id);
        }
        self.by_user
            .remove_if(&handle.user_id, |_, connections| connections.is_empty());
        Some(handle)
    }

    /// All connections of a user.
    pub fn user_connections(&self, user_id: &UserId) -> Vec<Arc<ConnectionHandle>> {
        self.by_user
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// A specific connection.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// Whether the user has at least one connection.
    pub fn has_user(&self, user_id: &UserId) -> bool {
        self.by_user.contains_key(user_id)
    }

    /// Total number of live connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of distinct connected users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Snapshot of every connection.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
