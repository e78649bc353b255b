//! Connection manager: connection lifecycle, room membership, and
//! message routing.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use studioflow_core::config::RealtimeConfig;
use studioflow_core::error::{AppError, ErrorKind};
use studioflow_core::types::{ConnectionId, ProjectId, UserId};
use studioflow_database::Stores;
use studioflow_service::permission::is_project_participant;

use crate::channel::registry::RoomRegistry;
use crate::message::types::{InboundMessage, OutboundMessage};

use super::authenticator::AuthenticatedConnection;
use super::handle::ConnectionHandle;
use super::pool::ConnectionPool;

/// Manages all live connections and their room memberships.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Connection pool.
    pool: ConnectionPool,
    /// Project rooms.
    rooms: Arc<RoomRegistry>,
    /// Used to authorize room joins and record durable membership.
    stores: Stores,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(config: RealtimeConfig, rooms: Arc<RoomRegistry>, stores: Stores) -> Self {
        Self {
            pool: ConnectionPool::new(),
            rooms,
            stores,
            config,
        }
    }

    /// Registers an authenticated connection.
    ///
    /// Returns the handle and the receiver the socket writer drains. When
    /// the user is at the connection limit the oldest connection is closed.
    pub fn register(
        &self,
        identity: &AuthenticatedConnection,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(identity.user_id, identity.role, tx));

        let existing = self.pool.user_connections(&identity.user_id);
        if existing.len() >= self.config.max_connections_per_user {
            warn!(
                user_id = %identity.user_id,
                count = existing.len(),
                max = self.config.max_connections_per_user,
                "User at max connections, oldest will be replaced"
            );
            if let Some(oldest) = existing.first() {
                self.unregister(&oldest.id);
            }
        }

        self.pool.add(handle.clone());
        handle.send(OutboundMessage::Connected {
            connection_id: handle.id,
            user_id: handle.user_id,
        });

        info!(
            conn_id = %handle.id,
            user_id = %identity.user_id,
            "WebSocket connection registered"
        );

        (handle, rx)
    }

    /// Removes a connection and every room membership it holds.
    /// Unknown IDs are ignored.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.close();
            self.rooms.leave_all(*conn_id);
            info!(
                conn_id = %conn_id,
                user_id = %handle.user_id,
                "WebSocket connection unregistered"
            );
        }
    }

    /// Adds a connection to a project room.
    ///
    /// Only participants of the project may join. The join is also
    /// recorded durably so room notifications reach the user later.
    pub async fn join_room(
        &self,
        conn_id: &ConnectionId,
        project_id: ProjectId,
    ) -> Result<(), AppError> {
        let handle = self
            .pool
            .get(conn_id)
            .ok_or_else(|| AppError::not_found("Connection is closed"))?;

        if self.rooms.is_member(project_id, handle.id) {
            return Ok(());
        }
        if self.rooms.room_count(handle.id) >= self.config.max_rooms_per_connection {
            return Err(AppError::validation(format!(
                "Maximum rooms ({}) reached",
                self.config.max_rooms_per_connection
            )));
        }

        let project = self
            .stores
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;
        let deliverables = self.stores.deliverables.list_by_project(project_id).await?;
        if !is_project_participant(handle.user_id, handle.role, &project, &deliverables) {
            return Err(AppError::forbidden("You are not part of this project"));
        }

        self.stores
            .rooms
            .record_member(project_id, handle.user_id)
            .await?;
        self.rooms.join(project_id, handle.id);

        debug!(conn_id = %handle.id, project_id = %project_id, "Joined project room");
        Ok(())
    }

    /// Removes a connection from a project room. Durable membership is kept.
    pub fn leave_room(&self, conn_id: &ConnectionId, project_id: ProjectId) -> bool {
        self.rooms.leave(project_id, *conn_id)
    }

    /// Processes one inbound text frame and replies on the same connection.
    pub async fn handle_inbound(&self, conn_id: &ConnectionId, raw_message: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return;
        };
        handle.touch();

        let msg: InboundMessage = match serde_json::from_str(raw_message) {
            Ok(m) => m,
            Err(e) => {
                handle.send(OutboundMessage::error(
                    "INVALID_MESSAGE",
                    format!("Failed to parse message: {e}"),
                ));
                return;
            }
        };

        let reply = match msg {
            InboundMessage::JoinProject { project_id } => {
                match self.join_room(conn_id, project_id).await {
                    Ok(()) => OutboundMessage::Joined { project_id },
                    Err(e) => OutboundMessage::error(error_code(&e), e.message),
                }
            }
            InboundMessage::LeaveProject { project_id } => {
                self.leave_room(conn_id, project_id);
                OutboundMessage::Left { project_id }
            }
            InboundMessage::Ping => OutboundMessage::Pong {
                timestamp: chrono::Utc::now().timestamp_millis(),
            },
        };
        handle.send(reply);
    }

    /// Returns `true` if the user has at least one live connection.
    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.pool.has_user(user_id)
    }

    /// Sends a message to every connection of a user. Returns how many
    /// connections accepted it.
    pub fn send_to_user(&self, user_id: &UserId, message: &OutboundMessage) -> usize {
        self.pool
            .user_connections(user_id)
            .iter()
            .filter(|conn| conn.send(message.clone()))
            .count()
    }

    /// Sends a message to every connection currently in a project room.
    pub fn broadcast_to_room(&self, project_id: ProjectId, message: &OutboundMessage) -> usize {
        self.rooms
            .members(project_id)
            .iter()
            .filter_map(|conn_id| self.pool.get(conn_id))
            .filter(|conn| conn.send(message.clone()))
            .count()
    }

    /// Looks up a live connection.
    pub fn connection(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.pool.get(conn_id)
    }

    /// Closes all connections.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for conn in &all {
            self.unregister(&conn.id);
        }
        info!(count = all.len(), "All connections closed");
    }

    /// Drops connections that have been silent for longer than `timeout`
    /// or whose socket has already gone away. Returns how many were removed.
    pub fn prune_stale(&self, timeout: chrono::Duration) -> usize {
        let cutoff = chrono::Utc::now() - timeout;
        let stale: Vec<_> = self
            .pool
            .all_connections()
            .into_iter()
            .filter(|conn| !conn.is_alive() || conn.last_seen() < cutoff)
            .collect();
        for conn in &stale {
            warn!(
                conn_id = %conn.id,
                last_seen = %conn.last_seen(),
                "Connection heartbeat timeout"
            );
            self.unregister(&conn.id);
        }
        stale.len()
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Returns the number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// Returns the realtime configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }
}

fn error_code(error: &AppError) -> &'static str {
    match error.kind {
        ErrorKind::NotFound => "NOT_FOUND",
        ErrorKind::Forbidden => "FORBIDDEN",
        ErrorKind::Validation => "LIMIT_REACHED",
        _ => "INTERNAL_ERROR",
    }
}
