//! Workflow phases and their tasks.

use serde::Deserialize;
use tracing::info;

use studioflow_core::error::AppError;
use studioflow_core::types::{DeliverableId, WorkflowPhaseId, WorkflowTaskId};
use studioflow_database::store::{NewWorkflowPhase, PhaseChanges};
use studioflow_entity::workflow::{PhaseAssignee, WorkflowPhase, WorkflowPhaseWithTasks, WorkflowTask};

use crate::context::RequestContext;
use crate::{permission, visibility};

use super::service::WorkflowService;

/// Request to create a workflow phase.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhaseRequest {
    pub name: String,
    pub order_index: i32,
    pub assigned_to: PhaseAssignee,
    /// Initial task titles, in order.
    #[serde(default)]
    pub tasks: Vec<String>,
}

/// Request to edit a workflow phase. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePhaseRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub order_index: Option<i32>,
    #[serde(default)]
    pub assigned_to: Option<PhaseAssignee>,
}

impl WorkflowService {
    /// Adds a phase (with initial tasks) to a deliverable.
    pub async fn create_workflow_phase(
        &self,
        ctx: &RequestContext,
        deliverable_id: DeliverableId,
        req: CreatePhaseRequest,
    ) -> Result<WorkflowPhaseWithTasks, AppError> {
        let name = req.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Phase name cannot be empty"));
        }
        if req.order_index < 0 {
            return Err(AppError::validation("order_index must not be negative"));
        }

        let (_, project) = self.load_scope(deliverable_id).await?;
        permission::require_manage_project(ctx, &project)?;

        let phase = self
            .stores
            .workflow
            .create_phase(NewWorkflowPhase {
                deliverable_id,
                name,
                order_index: req.order_index,
                assigned_to: req.assigned_to,
                tasks: req
                    .tasks
                    .into_iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect(),
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            deliverable_id = %deliverable_id,
            phase_id = %phase.phase.id,
            "Workflow phase created"
        );
        Ok(phase)
    }

    /// Appends a task to a phase.
    pub async fn add_workflow_task(
        &self,
        ctx: &RequestContext,
        phase_id: WorkflowPhaseId,
        title: &str,
    ) -> Result<WorkflowTask, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Task title cannot be empty"));
        }

        let (_, deliverable, project) = self.load_phase_scope(phase_id).await?;
        self.require_deliverable_access(ctx, &project, &deliverable)
            .await?;

        self.stores
            .workflow
            .add_task(phase_id, title.to_string())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workflow phase {phase_id} not found")))
    }

    /// Renames a workflow task.
    pub async fn update_workflow_task(
        &self,
        ctx: &RequestContext,
        task_id: WorkflowTaskId,
        title: &str,
    ) -> Result<WorkflowTask, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Task title cannot be empty"));
        }
        self.require_task_access(ctx, task_id).await?;

        self.stores
            .workflow
            .rename_task(task_id, title.to_string())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workflow task {task_id} not found")))
    }

    /// Flips a workflow task's `completed` flag. Emits nothing.
    pub async fn toggle_workflow_task(
        &self,
        ctx: &RequestContext,
        task_id: WorkflowTaskId,
    ) -> Result<WorkflowTask, AppError> {
        self.require_task_access(ctx, task_id).await?;

        self.stores
            .workflow
            .toggle_task(task_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workflow task {task_id} not found")))
    }

    /// Lists a deliverable's phases as the actor is allowed to see them.
    pub async fn list_workflow_phases(
        &self,
        ctx: &RequestContext,
        deliverable_id: DeliverableId,
    ) -> Result<Vec<WorkflowPhaseWithTasks>, AppError> {
        let (deliverable, project) = self.load_scope(deliverable_id).await?;
        self.require_deliverable_access(ctx, &project, &deliverable)
            .await?;
        let phases = self.stores.workflow.list_phases(deliverable_id).await?;
        Ok(visibility::visible_workflow_phases(
            &deliverable,
            phases,
            Some(ctx),
        ))
    }

    /// Edits a phase's name, position, or intended owner. Only the
    /// project's client or an admin may.
    pub async fn update_workflow_phase(
        &self,
        ctx: &RequestContext,
        phase_id: WorkflowPhaseId,
        req: UpdatePhaseRequest,
    ) -> Result<WorkflowPhase, AppError> {
        let name = match req.name {
            Some(n) if n.trim().is_empty() => {
                return Err(AppError::validation("Phase name cannot be empty"));
            }
            Some(n) => Some(n.trim().to_string()),
            None => None,
        };
        if req.order_index.is_some_and(|i| i < 0) {
            return Err(AppError::validation("order_index must not be negative"));
        }

        let (_, _, project) = self.load_phase_scope(phase_id).await?;
        permission::require_manage_project(ctx, &project)?;

        let updated = self
            .stores
            .workflow
            .update_phase(
                phase_id,
                PhaseChanges {
                    name,
                    order_index: req.order_index,
                    assigned_to: req.assigned_to,
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workflow phase {phase_id} not found")))?;

        info!(user_id = %ctx.user_id, phase_id = %phase_id, "Workflow phase updated");
        Ok(updated)
    }

    /// Deletes a phase and its tasks.
    pub async fn delete_workflow_phase(
        &self,
        ctx: &RequestContext,
        phase_id: WorkflowPhaseId,
    ) -> Result<(), AppError> {
        let (_, _, project) = self.load_phase_scope(phase_id).await?;
        permission::require_manage_project(ctx, &project)?;

        if !self.stores.workflow.delete_phase(phase_id).await? {
            return Err(AppError::not_found(format!("Workflow phase {phase_id} not found")));
        }
        info!(user_id = %ctx.user_id, phase_id = %phase_id, "Workflow phase deleted");
        Ok(())
    }

    /// Deletes a workflow task. Only the project's client or an admin may.
    pub async fn delete_workflow_task(
        &self,
        ctx: &RequestContext,
        task_id: WorkflowTaskId,
    ) -> Result<(), AppError> {
        let task = self.load_workflow_task(task_id).await?;
        let (_, _, project) = self.load_phase_scope(task.phase_id).await?;
        permission::require_manage_project(ctx, &project)?;

        if !self.stores.workflow.delete_task(task_id).await? {
            return Err(AppError::not_found(format!("Workflow task {task_id} not found")));
        }
        info!(user_id = %ctx.user_id, task_id = %task_id, "Workflow task deleted");
        Ok(())
    }

    async fn load_workflow_task(&self, task_id: WorkflowTaskId) -> Result<WorkflowTask, AppError> {
        self.stores
            .workflow
            .find_task(task_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workflow task {task_id} not found")))
    }

    /// Resolves the task's deliverable and checks the actor may work on it.
    async fn require_task_access(
        &self,
        ctx: &RequestContext,
        task_id: WorkflowTaskId,
    ) -> Result<(), AppError> {
        let task = self.load_workflow_task(task_id).await?;
        let (_, deliverable, project) = self.load_phase_scope(task.phase_id).await?;
        self.require_deliverable_access(ctx, &project, &deliverable)
            .await
    }
}
