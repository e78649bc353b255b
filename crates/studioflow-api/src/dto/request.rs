//! Request DTOs with validation.
//!
//! Project creation and phase creation deserialize straight into the
//! service type. Everything else is checked here first and converted.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use studioflow_core::types::UserId;
use studioflow_entity::feedback::FeedbackType;
use studioflow_entity::workflow::PhaseAssignee;
use studioflow_service::deliverable::UpdateDeliverableRequest;
use studioflow_service::workflow::{
    AddFeedbackRequest, AddVersionRequest, UpdatePhaseRequest, UpdateVersionRequest,
};

/// Assign (or clear) the talent on a deliverable.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignTalentRequest {
    /// `null` unassigns.
    #[serde(default)]
    pub talent_id: Option<UserId>,
}

/// Decline an assignment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RejectAssignmentRequest {
    /// Optional reason shown to the client.
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Set a status by its wire name.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StatusRequest {
    #[validate(length(min = 1, max = 32))]
    pub status: String,
}

/// Progress report on a deliverable.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProgressRequest {
    /// Percentage complete.
    #[validate(range(min = 0, max = 100))]
    pub progress: i32,
    /// Optional status change reported alongside.
    #[serde(default)]
    pub status: Option<String>,
}

/// Add a revision task to existing feedback.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddRevisionTaskRequest {
    #[validate(length(min = 1, max = 500))]
    pub description: String,
}

/// Title of a workflow task, for creation and renames.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WorkflowTaskRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
}

/// Upload a new version.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddVersionBody {
    #[validate(url, length(max = 2048))]
    pub video_url: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl From<AddVersionBody> for AddVersionRequest {
    fn from(body: AddVersionBody) -> Self {
        Self {
            video_url: body.video_url,
            description: body.description,
        }
    }
}

/// Correct a version's URL or notes.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateVersionBody {
    #[serde(default)]
    #[validate(url, length(max = 2048))]
    pub video_url: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl From<UpdateVersionBody> for UpdateVersionRequest {
    fn from(body: UpdateVersionBody) -> Self {
        Self {
            video_url: body.video_url,
            description: body.description,
        }
    }
}

/// Leave feedback on a version.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddFeedbackBody {
    #[validate(length(min = 1, max = 10000))]
    pub raw_text: String,
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub structured_text: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: FeedbackType,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub tasks: Vec<String>,
}

impl From<AddFeedbackBody> for AddFeedbackRequest {
    fn from(body: AddFeedbackBody) -> Self {
        Self {
            raw_text: body.raw_text,
            structured_text: body.structured_text,
            kind: body.kind,
            tasks: body.tasks,
        }
    }
}

/// Edit a deliverable's title, type, or deadline.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDeliverableBody {
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    #[validate(length(min = 1, max = 64))]
    pub kind: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl From<UpdateDeliverableBody> for UpdateDeliverableRequest {
    fn from(body: UpdateDeliverableBody) -> Self {
        Self {
            title: body.title,
            kind: body.kind,
            deadline: body.deadline,
        }
    }
}

/// Edit a workflow phase.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePhaseBody {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub order_index: Option<i32>,
    #[serde(default)]
    pub assigned_to: Option<PhaseAssignee>,
}

impl From<UpdatePhaseBody> for UpdatePhaseRequest {
    fn from(body: UpdatePhaseBody) -> Self {
        Self {
            name: body.name,
            order_index: body.order_index,
            assigned_to: body.assigned_to,
        }
    }
}

/// Reassign the project-level talent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReassignTalentRequest {
    #[serde(default)]
    pub talent_id: Option<UserId>,
}
