//! Workflow events raised by committed state transitions.

use serde::{Deserialize, Serialize};

use crate::types::{DeliverableId, FeedbackId, ProjectId, UserId, VersionId};

use super::EventTarget;

/// One variant per notification-raising transition.
///
/// Each variant carries every field the dispatcher needs to resolve its
/// recipients and format its message, so dispatch never has to re-read
/// the entity that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowEvent {
    /// A talent was assigned to a deliverable.
    TalentAssigned {
        project_id: ProjectId,
        deliverable_id: DeliverableId,
        deliverable_title: String,
        talent_id: UserId,
    },
    /// The assigned talent accepted the assignment.
    AssignmentAccepted {
        project_id: ProjectId,
        deliverable_id: DeliverableId,
        deliverable_title: String,
        client_id: UserId,
        talent_id: UserId,
    },
    /// The assigned talent declined the assignment.
    AssignmentRejected {
        project_id: ProjectId,
        deliverable_id: DeliverableId,
        deliverable_title: String,
        client_id: UserId,
        talent_id: UserId,
        reason: Option<String>,
    },
    /// A new version was uploaded for review.
    VersionUploaded {
        project_id: ProjectId,
        deliverable_id: DeliverableId,
        deliverable_title: String,
        version_id: VersionId,
        version_number: i32,
        client_id: UserId,
    },
    /// A version was approved.
    VersionApproved {
        project_id: ProjectId,
        deliverable_id: DeliverableId,
        deliverable_title: String,
        version_id: VersionId,
        version_number: i32,
        talent_id: UserId,
    },
    /// Changes were requested on a version.
    VersionChangesRequested {
        project_id: ProjectId,
        deliverable_id: DeliverableId,
        deliverable_title: String,
        version_id: VersionId,
        version_number: i32,
        talent_id: UserId,
    },
    /// Feedback was left on a version.
    FeedbackReceived {
        project_id: ProjectId,
        deliverable_id: DeliverableId,
        deliverable_title: String,
        version_id: VersionId,
        version_number: i32,
        feedback_id: FeedbackId,
        author_id: UserId,
        talent_id: UserId,
    },
    /// Project details or the primary talent changed.
    ProjectUpdated {
        project_id: ProjectId,
        project_title: String,
        talent_id: Option<UserId>,
    },
    /// Project status changed.
    ProjectStatusChanged {
        project_id: ProjectId,
        project_title: String,
        status: String,
        talent_id: Option<UserId>,
    },
}

impl WorkflowEvent {
    /// Returns the notification type tag persisted for this event.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::TalentAssigned { .. } => "TALENT_ASSIGNED",
            Self::AssignmentAccepted { .. } => "ASSIGNMENT_ACCEPTED",
            Self::AssignmentRejected { .. } => "ASSIGNMENT_REJECTED",
            Self::VersionUploaded { .. } => "VERSION_UPLOADED",
            Self::VersionApproved { .. } => "VERSION_APPROVED",
            Self::VersionChangesRequested { .. } => "VERSION_CHANGES_REQUESTED",
            Self::FeedbackReceived { .. } => "FEEDBACK_RECEIVED",
            Self::ProjectUpdated { .. } => "PROJECT_UPDATED",
            Self::ProjectStatusChanged { .. } => "PROJECT_STATUS_CHANGED",
        }
    }

    /// Returns the project this event belongs to.
    pub fn project_id(&self) -> ProjectId {
        match self {
            Self::TalentAssigned { project_id, .. }
            | Self::AssignmentAccepted { project_id, .. }
            | Self::AssignmentRejected { project_id, .. }
            | Self::VersionUploaded { project_id, .. }
            | Self::VersionApproved { project_id, .. }
            | Self::VersionChangesRequested { project_id, .. }
            | Self::FeedbackReceived { project_id, .. }
            | Self::ProjectUpdated { project_id, .. }
            | Self::ProjectStatusChanged { project_id, .. } => *project_id,
        }
    }

    /// Returns the deliverable this event belongs to, if any.
    pub fn deliverable_id(&self) -> Option<DeliverableId> {
        match self {
            Self::TalentAssigned { deliverable_id, .. }
            | Self::AssignmentAccepted { deliverable_id, .. }
            | Self::AssignmentRejected { deliverable_id, .. }
            | Self::VersionUploaded { deliverable_id, .. }
            | Self::VersionApproved { deliverable_id, .. }
            | Self::VersionChangesRequested { deliverable_id, .. }
            | Self::FeedbackReceived { deliverable_id, .. } => Some(*deliverable_id),
            Self::ProjectUpdated { .. } | Self::ProjectStatusChanged { .. } => None,
        }
    }

    /// Resolves the notification target for this event.
    pub fn target(&self) -> EventTarget {
        match self {
            Self::TalentAssigned { talent_id, .. } => EventTarget::User(*talent_id),
            Self::AssignmentAccepted { client_id, .. }
            | Self::AssignmentRejected { client_id, .. }
            | Self::VersionUploaded { client_id, .. } => EventTarget::User(*client_id),
            Self::VersionApproved { talent_id, .. }
            | Self::VersionChangesRequested { talent_id, .. }
            | Self::FeedbackReceived { talent_id, .. } => EventTarget::User(*talent_id),
            Self::ProjectUpdated {
                project_id,
                talent_id,
                ..
            }
            | Self::ProjectStatusChanged {
                project_id,
                talent_id,
                ..
            } => EventTarget::Room {
                project_id: *project_id,
                also: *talent_id,
            },
        }
    }

    /// Key under which events must be observed in commit order.
    ///
    /// Deliverable-scoped events order per deliverable; project-scoped
    /// events order per project.
    pub fn ordering_key(&self) -> uuid::Uuid {
        match self.deliverable_id() {
            Some(id) => id.into_uuid(),
            None => self.project_id().into_uuid(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_targets_talent() {
        let talent = UserId::new();
        let event = WorkflowEvent::FeedbackReceived {
            project_id: ProjectId::new(),
            deliverable_id: DeliverableId::new(),
            deliverable_title: "Intro".into(),
            version_id: VersionId::new(),
            version_number: 2,
            feedback_id: FeedbackId::new(),
            author_id: UserId::new(),
            talent_id: talent,
        };
        assert_eq!(event.target(), EventTarget::User(talent));
        assert_eq!(event.type_tag(), "FEEDBACK_RECEIVED");
    }

    #[test]
    fn test_project_events_target_room_and_order_by_project() {
        let project = ProjectId::new();
        let talent = UserId::new();
        let event = WorkflowEvent::ProjectStatusChanged {
            project_id: project,
            project_title: "Launch".into(),
            status: "REVIEW".into(),
            talent_id: Some(talent),
        };
        assert_eq!(
            event.target(),
            EventTarget::Room {
                project_id: project,
                also: Some(talent)
            }
        );
        assert_eq!(event.ordering_key(), project.into_uuid());
    }

    #[test]
    fn test_serialized_tag() {
        let event = WorkflowEvent::ProjectUpdated {
            project_id: ProjectId::new(),
            project_title: "Launch".into(),
            talent_id: None,
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "PROJECT_UPDATED");
    }
}
