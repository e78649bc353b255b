//! Notification type tag.

use serde::{Deserialize, Serialize};
use std::fmt;

use studioflow_core::events::WorkflowEvent;

/// Names the workflow event a notification was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    TalentAssigned,
    AssignmentAccepted,
    AssignmentRejected,
    VersionUploaded,
    VersionApproved,
    VersionChangesRequested,
    FeedbackReceived,
    ProjectUpdated,
    ProjectStatusChanged,
}

impl NotificationKind {
    /// Return the tag as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TalentAssigned => "TALENT_ASSIGNED",
            Self::AssignmentAccepted => "ASSIGNMENT_ACCEPTED",
            Self::AssignmentRejected => "ASSIGNMENT_REJECTED",
            Self::VersionUploaded => "VERSION_UPLOADED",
            Self::VersionApproved => "VERSION_APPROVED",
            Self::VersionChangesRequested => "VERSION_CHANGES_REQUESTED",
            Self::FeedbackReceived => "FEEDBACK_RECEIVED",
            Self::ProjectUpdated => "PROJECT_UPDATED",
            Self::ProjectStatusChanged => "PROJECT_STATUS_CHANGED",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&WorkflowEvent> for NotificationKind {
    fn from(event: &WorkflowEvent) -> Self {
        match event {
            WorkflowEvent::TalentAssigned { .. } => Self::TalentAssigned,
            WorkflowEvent::AssignmentAccepted { .. } => Self::AssignmentAccepted,
            WorkflowEvent::AssignmentRejected { .. } => Self::AssignmentRejected,
            WorkflowEvent::VersionUploaded { .. } => Self::VersionUploaded,
            WorkflowEvent::VersionApproved { .. } => Self::VersionApproved,
            WorkflowEvent::VersionChangesRequested { .. } => Self::VersionChangesRequested,
            WorkflowEvent::FeedbackReceived { .. } => Self::FeedbackReceived,
            WorkflowEvent::ProjectUpdated { .. } => Self::ProjectUpdated,
            WorkflowEvent::ProjectStatusChanged { .. } => Self::ProjectStatusChanged,
        }
    }
}
