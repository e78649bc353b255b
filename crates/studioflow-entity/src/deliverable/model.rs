//! Deliverable entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use studioflow_core::types::{DeliverableId, ProjectId, UserId};

use super::status::{AcceptanceStatus, DeliverableStatus};

/// A single commissioned asset inside a project.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deliverable {
    /// Unique deliverable identifier.
    pub id: DeliverableId,
    /// Parent project.
    pub project_id: ProjectId,
    /// Deliverable title.
    pub title: String,
    /// Free-form asset type (e.g. `VIDEO`, `SHORT`, `THUMBNAIL`).
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    /// Due date for this asset.
    pub deadline: Option<DateTime<Utc>>,
    /// Production status.
    pub status: DeliverableStatus,
    /// Completion percentage, 0 through 100.
    pub progress: i32,
    /// Talent currently assigned, if any.
    pub assigned_talent_id: Option<UserId>,
    /// Talent's response to the assignment.
    ///
    /// `REJECTED` survives the talent being cleared as a history marker.
    pub acceptance_status: Option<AcceptanceStatus>,
    /// Last version number issued for this deliverable.
    pub version_counter: i32,
    /// When the deliverable was created.
    pub created_at: DateTime<Utc>,
    /// When the deliverable was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Deliverable {
    /// Returns `true` if `user` is the assigned talent.
    pub fn is_assigned_to(&self, user: UserId) -> bool {
        self.assigned_talent_id == Some(user)
    }
}
