//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use studioflow_core::types::{ConnectionId, UserId};
use studioflow_entity::user::UserRole;

use crate::message::types::OutboundMessage;

/// A handle to a single live connection.
///
/// Holds the sender for pushing messages to the socket writer plus the
/// identity established at admission.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// User who owns this connection.
    pub user_id: UserId,
    /// Role at admission time.
    pub role: UserRole,
    /// When the connection was admitted.
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<OutboundMessage>,
    /// Milliseconds since epoch of the last inbound frame.
    last_seen_ms: AtomicI64,
    /// Cancelled when the registry drops the connection.
    closed: CancellationToken,
}

impl ConnectionHandle {
    /// Creates a new connection handle.
    pub fn new(user_id: UserId, role: UserRole, sender: mpsc::Sender<OutboundMessage>) -> Self {
        let now = Utc::now();
        Self {
            id: ConnectionId::new(),
            user_id,
            role,
            connected_at: now,
            sender,
            last_seen_ms: AtomicI64::new(now.timestamp_millis()),
            closed: CancellationToken::new(),
        }
    }

    /// Queues a message without waiting. A full buffer or a closed socket
    /// drops the message and returns `false`.
    pub fn send(&self, msg: OutboundMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(msg)) => {
                tracing::warn!(
                    conn_id = %self.id,
                    event = msg.event_name(),
                    "Connection send buffer full, dropping message"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.close();
                false
            }
        }
    }

    /// Whether the connection is still open.
    pub fn is_alive(&self) -> bool {
        !self.closed.is_cancelled()
    }

    /// Marks the connection closed. The socket task observes this via
    /// [`ConnectionHandle::closed`].
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Resolves once the connection has been closed.
    pub async fn closed(&self) {
        self.closed.cancelled().await
    }

    /// Records inbound activity.
    pub fn touch(&self) {
        self.last_seen_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    /// Time of the last inbound frame.
    pub fn last_seen(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_seen_ms.load(Ordering::Relaxed))
            .unwrap_or(self.connected_at)
    }

    #[cfg(test)]
    pub(crate) fn set_last_seen(&self, at: DateTime<Utc>) {
        self.last_seen_ms
            .store(at.timestamp_millis(), Ordering::Relaxed);
    }
}
