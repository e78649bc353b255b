//! Feedback threads and revision tasks.

use serde::Deserialize;
use tracing::info;

use studioflow_core::error::AppError;
use studioflow_core::events::WorkflowEvent;
use studioflow_core::types::{FeedbackId, RevisionTaskId, VersionId};
use studioflow_database::store::NewFeedback;
use studioflow_entity::feedback::{FeedbackType, FeedbackWithTasks, RevisionTask};

use crate::context::RequestContext;

use super::service::WorkflowService;

/// Request to leave feedback on a version.
#[derive(Debug, Clone, Deserialize)]
pub struct AddFeedbackRequest {
    pub raw_text: String,
    #[serde(default)]
    pub structured_text: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: FeedbackType,
    /// Descriptions of the revision tasks to create alongside.
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl WorkflowService {
    /// Appends feedback with its revision tasks and moves the version to
    /// `CHANGES_REQUESTED`.
    ///
    /// The assigned talent is notified unless they wrote the feedback.
    pub async fn add_feedback(
        &self,
        ctx: &RequestContext,
        version_id: VersionId,
        req: AddFeedbackRequest,
    ) -> Result<FeedbackWithTasks, AppError> {
        if req.raw_text.trim().is_empty() {
            return Err(AppError::validation("Feedback text cannot be empty"));
        }
        let tasks: Vec<String> = req
            .tasks
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let version = self.load_version(version_id).await?;
        let _order = self.locks.lock(version.deliverable_id.into_uuid()).await;

        let (deliverable, project) = self.load_scope(version.deliverable_id).await?;
        self.require_deliverable_access(ctx, &project, &deliverable)
            .await?;

        let created = self
            .stores
            .feedback
            .create_feedback(NewFeedback {
                version_id,
                author_id: ctx.user_id,
                raw_text: req.raw_text,
                structured_text: req.structured_text,
                kind: req.kind,
                tasks,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            version_id = %version_id,
            feedback_id = %created.feedback.id,
            tasks = created.tasks.len(),
            "Feedback added"
        );

        let event = deliverable
            .assigned_talent_id
            .filter(|talent| *talent != ctx.user_id)
            .map(|talent_id| WorkflowEvent::FeedbackReceived {
                project_id: project.id,
                deliverable_id: deliverable.id,
                deliverable_title: deliverable.title.clone(),
                version_id,
                version_number: version.version_number,
                feedback_id: created.feedback.id,
                author_id: ctx.user_id,
                talent_id,
            });
        self.publish(ctx, event.into_iter().collect()).await;

        Ok(created)
    }

    /// Lists the feedback thread of a version, oldest first.
    pub async fn list_feedback(
        &self,
        ctx: &RequestContext,
        version_id: VersionId,
    ) -> Result<Vec<FeedbackWithTasks>, AppError> {
        let version = self.load_version(version_id).await?;
        let (deliverable, project) = self.load_scope(version.deliverable_id).await?;
        self.require_deliverable_access(ctx, &project, &deliverable)
            .await?;
        self.stores.feedback.list_by_version(version_id).await
    }

    /// Removes a feedback entry. Moderation action for admins and the
    /// author only.
    pub async fn delete_feedback(
        &self,
        ctx: &RequestContext,
        feedback_id: FeedbackId,
    ) -> Result<(), AppError> {
        let entry = self
            .stores
            .feedback
            .find_by_id(feedback_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Feedback {feedback_id} not found")))?;

        if !ctx.is_admin() && entry.feedback.author_id != ctx.user_id {
            return Err(AppError::forbidden(
                "Only the author or an admin can delete feedback",
            ));
        }

        if !self.stores.feedback.delete(feedback_id).await? {
            return Err(AppError::not_found(format!("Feedback {feedback_id} not found")));
        }

        info!(user_id = %ctx.user_id, feedback_id = %feedback_id, "Feedback deleted");
        Ok(())
    }

    /// Adds a revision task to existing feedback.
    pub async fn add_revision_task(
        &self,
        ctx: &RequestContext,
        feedback_id: FeedbackId,
        description: &str,
    ) -> Result<RevisionTask, AppError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::validation("Task description cannot be empty"));
        }

        let (_, deliverable, project) = self.load_feedback_scope(feedback_id).await?;
        self.require_deliverable_access(ctx, &project, &deliverable)
            .await?;

        let task = self
            .stores
            .feedback
            .add_task(feedback_id, description.to_string())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Feedback {feedback_id} not found")))?;

        info!(user_id = %ctx.user_id, task_id = %task.id, "Revision task added");
        Ok(task)
    }

    /// Flips a revision task's `completed` flag. Emits nothing.
    pub async fn toggle_revision_task(
        &self,
        ctx: &RequestContext,
        task_id: RevisionTaskId,
    ) -> Result<RevisionTask, AppError> {
        let task = self.load_revision_task(task_id).await?;
        let (_, deliverable, project) = self.load_feedback_scope(task.feedback_id).await?;
        self.require_deliverable_access(ctx, &project, &deliverable)
            .await?;

        self.stores
            .feedback
            .toggle_task(task_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Revision task {task_id} not found")))
    }

    /// Deletes a revision task. Allowed for the feedback's author and
    /// admins.
    pub async fn delete_revision_task(
        &self,
        ctx: &RequestContext,
        task_id: RevisionTaskId,
    ) -> Result<(), AppError> {
        let task = self.load_revision_task(task_id).await?;
        let (entry, _, _) = self.load_feedback_scope(task.feedback_id).await?;
        if !ctx.is_admin() && entry.feedback.author_id != ctx.user_id {
            return Err(AppError::forbidden(
                "Only the feedback author or an admin can delete its tasks",
            ));
        }

        if !self.stores.feedback.delete_task(task_id).await? {
            return Err(AppError::not_found(format!("Revision task {task_id} not found")));
        }
        info!(user_id = %ctx.user_id, task_id = %task_id, "Revision task deleted");
        Ok(())
    }

    async fn load_revision_task(&self, task_id: RevisionTaskId) -> Result<RevisionTask, AppError> {
        self.stores
            .feedback
            .find_task(task_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Revision task {task_id} not found")))
    }
}
