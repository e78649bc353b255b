//! Inbound and outbound WebSocket message type definitions.

use serde::{Deserialize, Serialize};

use studioflow_core::types::{ConnectionId, ProjectId, UserId};
use studioflow_entity::notification::Notification;

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Join a project room.
    JoinProject { project_id: ProjectId },
    /// Leave a project room.
    LeaveProject { project_id: ProjectId },
    /// Application-level keepalive.
    Ping,
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    /// Sent once after the connection is admitted.
    #[serde(rename = "connected")]
    Connected {
        connection_id: ConnectionId,
        user_id: UserId,
    },
    /// A persisted notification for this user.
    #[serde(rename = "notification:new")]
    NotificationNew { notification: Notification },
    /// Project details or primary talent changed.
    #[serde(rename = "project:updated")]
    ProjectUpdated {
        project_id: ProjectId,
        title: String,
        talent_id: Option<UserId>,
    },
    /// Project status changed.
    #[serde(rename = "project:status")]
    ProjectStatus {
        project_id: ProjectId,
        title: String,
        status: String,
    },
    /// Room join confirmed.
    #[serde(rename = "joined")]
    Joined { project_id: ProjectId },
    /// Room leave confirmed.
    #[serde(rename = "left")]
    Left { project_id: ProjectId },
    /// Reply to [`InboundMessage::Ping`].
    #[serde(rename = "pong")]
    Pong { timestamp: i64 },
    /// Request could not be handled.
    #[serde(rename = "error")]
    Error { code: String, message: String },
}

impl OutboundMessage {
    /// Builds an error message.
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Returns the wire name of this message.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::NotificationNew { .. } => "notification:new",
            Self::ProjectUpdated { .. } => "project:updated",
            Self::ProjectStatus { .. } => "project:status",
            Self::Joined { .. } => "joined",
            Self::Left { .. } => "left",
            Self::Pong { .. } => "pong",
            Self::Error { .. } => "error",
        }
    }
}
