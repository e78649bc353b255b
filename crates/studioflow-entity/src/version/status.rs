//! Version status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review status of an uploaded version.
///
/// Every status is reachable from every other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "version_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionStatus {
    /// Upload is still being transcoded.
    Processing,
    /// Ready for the client to review.
    NeedsReview,
    /// Client asked for changes.
    ChangesRequested,
    /// Client approved.
    Approved,
}

impl VersionStatus {
    /// Status assigned to freshly uploaded versions.
    pub const INITIAL: Self = Self::NeedsReview;

    /// Return the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "PROCESSING",
            Self::NeedsReview => "NEEDS_REVIEW",
            Self::ChangesRequested => "CHANGES_REQUESTED",
            Self::Approved => "APPROVED",
        }
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VersionStatus {
    type Err = studioflow_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROCESSING" => Ok(Self::Processing),
            "NEEDS_REVIEW" => Ok(Self::NeedsReview),
            "CHANGES_REQUESTED" => Ok(Self::ChangesRequested),
            "APPROVED" => Ok(Self::Approved),
            _ => Err(studioflow_core::AppError::invalid_transition(format!(
                "Invalid version status: '{s}'. Expected one of: PROCESSING, NEEDS_REVIEW, CHANGES_REQUESTED, APPROVED"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "CHANGES_REQUESTED".parse::<VersionStatus>().unwrap(),
            VersionStatus::ChangesRequested
        );
        assert!("approved".parse::<VersionStatus>().is_err());
    }
}
