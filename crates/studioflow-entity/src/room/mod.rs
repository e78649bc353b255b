//! Project room membership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use studioflow_core::types::{ProjectId, UserId};

/// Records that a user has joined a project's live room at least once.
///
/// Rows are never removed on leave; room-targeted notifications reach
/// every user that ever joined.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRoomMember {
    /// The project whose room was joined.
    pub project_id: ProjectId,
    /// The user who joined.
    pub user_id: UserId,
    /// First time the user joined.
    pub first_joined_at: DateTime<Utc>,
}
