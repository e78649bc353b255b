//! Notification text for each workflow event.

use studioflow_core::events::WorkflowEvent;

/// Rendered title, body, and in-app link of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub message: String,
    pub link: String,
}

/// In-app path of a project's workspace.
pub fn workspace_link(project_id: impl std::fmt::Display) -> String {
    format!("/workspace/{project_id}")
}

/// Formats the notification for `event`.
pub fn format(event: &WorkflowEvent) -> NotificationContent {
    let link = workspace_link(event.project_id());
    let (title, message) = match event {
        WorkflowEvent::TalentAssigned {
            deliverable_title, ..
        } => (
            "New deliverable assigned".to_string(),
            format!("You have been assigned to \"{deliverable_title}\""),
        ),
        WorkflowEvent::AssignmentAccepted {
            deliverable_title, ..
        } => (
            "Assignment accepted".to_string(),
            format!("The talent accepted to work on \"{deliverable_title}\""),
        ),
        WorkflowEvent::AssignmentRejected {
            deliverable_title,
            reason,
            ..
        } => {
            let mut message = format!("The talent declined to work on \"{deliverable_title}\"");
            if let Some(reason) = reason {
                message.push_str(". Reason: ");
                message.push_str(reason);
            }
            ("Assignment declined".to_string(), message)
        }
        WorkflowEvent::VersionUploaded {
            deliverable_title,
            version_number,
            ..
        } => (
            "New version available".to_string(),
            format!("Version {version_number} of \"{deliverable_title}\" is ready for review"),
        ),
        WorkflowEvent::VersionApproved {
            deliverable_title,
            version_number,
            ..
        } => (
            "Version approved".to_string(),
            format!("Version {version_number} of \"{deliverable_title}\" was approved"),
        ),
        WorkflowEvent::VersionChangesRequested {
            deliverable_title,
            version_number,
            ..
        } => (
            "Changes requested".to_string(),
            format!("Changes were requested on version {version_number} of \"{deliverable_title}\""),
        ),
        WorkflowEvent::FeedbackReceived {
            deliverable_title,
            version_number,
            ..
        } => (
            "New feedback".to_string(),
            format!("New feedback on version {version_number} of \"{deliverable_title}\""),
        ),
        WorkflowEvent::ProjectUpdated { project_title, .. } => (
            "Project updated".to_string(),
            format!("\"{project_title}\" was updated"),
        ),
        WorkflowEvent::ProjectStatusChanged {
            project_title,
            status,
            ..
        } => (
            "Project status changed".to_string(),
            format!("\"{project_title}\" is now {status}"),
        ),
    };

    NotificationContent {
        title,
        message,
        link,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studioflow_core::types::{DeliverableId, ProjectId, UserId};

    #[test]
    fn test_rejection_reason_is_appended() {
        let project_id = ProjectId::new();
        let event = WorkflowEvent::AssignmentRejected {
            project_id,
            deliverable_id: DeliverableId::new(),
            deliverable_title: "Teaser".into(),
            client_id: UserId::new(),
            talent_id: UserId::new(),
            reason: Some("Booked that week".into()),
        };
        let content = format(&event);
        assert_eq!(content.title, "Assignment declined");
        assert!(content.message.ends_with(". Reason: Booked that week"));
        assert_eq!(content.link, format!("/workspace/{project_id}"));
    }
}
