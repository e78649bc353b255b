//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use studioflow_core::types::{NotificationId, UserId};

use super::kind::NotificationKind;

/// A persisted notification addressed to one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient.
    pub user_id: UserId,
    /// Event the notification was created for.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// In-app path the notification points at.
    pub link: Option<String>,
    /// Whether the recipient has read it.
    pub read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Data for a notification row about to be written.
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// The recipient.
    pub user_id: UserId,
    /// Event tag.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// In-app path.
    pub link: Option<String>,
}

impl NewNotification {
    /// Materialize into a full row with a fresh id and timestamp.
    pub fn into_notification(self) -> Notification {
        Notification {
            id: NotificationId::new(),
            user_id: self.user_id,
            kind: self.kind,
            title: self.title,
            message: self.message,
            link: self.link,
            read: false,
            created_at: Utc::now(),
        }
    }
}
