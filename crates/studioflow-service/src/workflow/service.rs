//! Shared state and lookups for the workflow state machine.

use std::sync::Arc;

use studioflow_core::error::AppError;
use studioflow_core::events::{DomainEvent, WorkflowEvent};
use studioflow_core::traits::EventSink;
use studioflow_core::types::{DeliverableId, FeedbackId, ProjectId, VersionId, WorkflowPhaseId};
use studioflow_database::Stores;
use studioflow_entity::deliverable::Deliverable;
use studioflow_entity::feedback::FeedbackWithTasks;
use studioflow_entity::project::Project;
use studioflow_entity::version::Version;
use studioflow_entity::workflow::WorkflowPhase;

use crate::context::RequestContext;
use crate::ordering::KeyedLocks;

/// Applies workflow transitions and raises their domain events.
#[derive(Debug, Clone)]
pub struct WorkflowService {
    /// Store handles.
    pub(crate) stores: Stores,
    /// Receives events after commit.
    pub(crate) sink: Arc<dyn EventSink>,
    /// Serializes commit-and-publish per deliverable.
    pub(crate) locks: Arc<KeyedLocks>,
}

impl WorkflowService {
    /// Creates a new workflow service.
    pub fn new(stores: Stores, sink: Arc<dyn EventSink>, locks: Arc<KeyedLocks>) -> Self {
        Self {
            stores,
            sink,
            locks,
        }
    }

    pub(crate) async fn load_deliverable(&self, id: DeliverableId) -> Result<Deliverable, AppError> {
        self.stores
            .deliverables
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Deliverable {id} not found")))
    }

    pub(crate) async fn load_project(&self, id: ProjectId) -> Result<Project, AppError> {
        self.stores
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))
    }

    pub(crate) async fn load_version(&self, id: VersionId) -> Result<Version, AppError> {
        self.stores
            .versions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Version {id} not found")))
    }

    /// Loads a deliverable with its project.
    pub(crate) async fn load_scope(
        &self,
        id: DeliverableId,
    ) -> Result<(Deliverable, Project), AppError> {
        let deliverable = self.load_deliverable(id).await?;
        let project = self.load_project(deliverable.project_id).await?;
        Ok((deliverable, project))
    }

    /// Loads a feedback entry with the deliverable and project above it.
    pub(crate) async fn load_feedback_scope(
        &self,
        id: FeedbackId,
    ) -> Result<(FeedbackWithTasks, Deliverable, Project), AppError> {
        let entry = self
            .stores
            .feedback
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Feedback {id} not found")))?;
        let version = self.load_version(entry.feedback.version_id).await?;
        let (deliverable, project) = self.load_scope(version.deliverable_id).await?;
        Ok((entry, deliverable, project))
    }

    /// Loads a workflow phase with the deliverable and project above it.
    pub(crate) async fn load_phase_scope(
        &self,
        id: WorkflowPhaseId,
    ) -> Result<(WorkflowPhase, Deliverable, Project), AppError> {
        let phase = self
            .stores
            .workflow
            .find_phase(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workflow phase {id} not found")))?;
        let (deliverable, project) = self.load_scope(phase.deliverable_id).await?;
        Ok((phase, deliverable, project))
    }

    /// Fails with `Forbidden` unless the actor participates in the
    /// deliverable's project and may see the deliverable.
    pub(crate) async fn require_deliverable_access(
        &self,
        ctx: &RequestContext,
        project: &Project,
        deliverable: &Deliverable,
    ) -> Result<(), AppError> {
        let siblings = self.stores.deliverables.list_by_project(project.id).await?;
        crate::permission::require_participant(ctx, project, &siblings)?;
        if !crate::visibility::can_view_deliverable(project, deliverable, Some(ctx)) {
            return Err(AppError::forbidden(
                "This deliverable is assigned to someone else",
            ));
        }
        Ok(())
    }

    /// Hands committed events to the sink. Must be called while the
    /// ordering lock for the events' key is held.
    pub(crate) async fn publish(&self, ctx: &RequestContext, payloads: Vec<WorkflowEvent>) {
        if payloads.is_empty() {
            return;
        }
        let events = payloads
            .into_iter()
            .map(|payload| DomainEvent::new(Some(ctx.user_id), payload))
            .collect();
        self.sink.publish(events).await;
    }
}
