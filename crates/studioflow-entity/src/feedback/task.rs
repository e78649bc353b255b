//! Revision task entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use studioflow_core::types::{FeedbackId, RevisionTaskId};

/// An actionable item derived from a feedback entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RevisionTask {
    /// Unique task identifier.
    pub id: RevisionTaskId,
    /// Feedback the task was derived from.
    pub feedback_id: FeedbackId,
    /// What needs to change.
    pub description: String,
    /// Whether the talent has ticked it off.
    pub completed: bool,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
}
