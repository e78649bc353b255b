//! Feedback entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use studioflow_core::types::{FeedbackId, UserId, VersionId};

use super::task::RevisionTask;

/// A comment on a version. Append-only: each submission is a new row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    /// Unique feedback identifier.
    pub id: FeedbackId,
    /// Version the feedback refers to.
    pub version_id: VersionId,
    /// Author of the comment.
    pub author_id: UserId,
    /// Comment as written (or transcribed).
    pub raw_text: String,
    /// Optional cleaned-up rendition of the comment.
    pub structured_text: Option<String>,
    /// How the comment was captured.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: FeedbackType,
    /// When the comment was left.
    pub created_at: DateTime<Utc>,
}

/// Capture medium of a feedback entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "feedback_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackType {
    /// Typed comment.
    #[default]
    Text,
    /// Voice note.
    Audio,
}

impl FromStr for FeedbackType {
    type Err = studioflow_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TEXT" => Ok(Self::Text),
            "AUDIO" => Ok(Self::Audio),
            _ => Err(studioflow_core::AppError::validation(format!(
                "Invalid feedback type: '{s}'"
            ))),
        }
    }
}

/// A feedback entry together with the tasks derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackWithTasks {
    /// The feedback row.
    #[serde(flatten)]
    pub feedback: Feedback,
    /// Its revision tasks, oldest first.
    pub tasks: Vec<RevisionTask>,
}
