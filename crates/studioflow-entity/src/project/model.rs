//! Project entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use studioflow_core::types::{ProjectId, UserId};

use super::status::ProjectStatus;

/// A commissioned production owned by a client.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// Project title.
    pub title: String,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Owning client. Immutable after creation.
    pub client_id: UserId,
    /// Primary talent, if one has been matched.
    pub talent_id: Option<UserId>,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Structured brief (opaque JSON).
    pub brief: serde_json::Value,
    /// Target delivery date.
    pub deadline: Option<DateTime<Utc>>,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Returns `true` if `user` is the owning client.
    pub fn is_client(&self, user: UserId) -> bool {
        self.client_id == user
    }

    /// Returns `true` if `user` is the primary talent.
    pub fn is_primary_talent(&self, user: UserId) -> bool {
        self.talent_id == Some(user)
    }
}
