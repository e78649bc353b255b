//! Project status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// Being written up by the client.
    Draft,
    /// Looking for talent.
    Matching,
    /// Production underway.
    InProgress,
    /// Deliverables under client review.
    Review,
    /// Finished.
    Completed,
}

impl ProjectStatus {
    /// Return the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Matching => "MATCHING",
            Self::InProgress => "IN_PROGRESS",
            Self::Review => "REVIEW",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = studioflow_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "MATCHING" => Ok(Self::Matching),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "REVIEW" => Ok(Self::Review),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(studioflow_core::AppError::invalid_transition(format!(
                "Invalid project status: '{s}'"
            ))),
        }
    }
}
