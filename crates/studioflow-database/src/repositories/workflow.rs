//! Workflow phase repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use studioflow_core::result::AppResult;
use studioflow_core::types::{DeliverableId, WorkflowPhaseId, WorkflowTaskId};
use studioflow_entity::workflow::{WorkflowPhase, WorkflowPhaseWithTasks, WorkflowTask};

use super::db_error;
use crate::store::{NewWorkflowPhase, PhaseChanges, WorkflowStore};

/// Repository for workflow phases and their checklist tasks.
#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    pool: PgPool,
}

impl WorkflowRepository {
    /// Create a new workflow repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkflowStore for WorkflowRepository {
    async fn create_phase(&self, phase: NewWorkflowPhase) -> AppResult<WorkflowPhaseWithTasks> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin phase transaction"))?;

        let row = sqlx::query_as::<_, WorkflowPhase>(
            "INSERT INTO workflow_phases (id, deliverable_id, name, order_index, assigned_to) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(WorkflowPhaseId::new())
        .bind(phase.deliverable_id)
        .bind(&phase.name)
        .bind(phase.order_index)
        .bind(phase.assigned_to)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to insert workflow phase"))?;

        let mut tasks = Vec::with_capacity(phase.tasks.len());
        for (index, title) in phase.tasks.iter().enumerate() {
            let task = sqlx::query_as::<_, WorkflowTask>(
                "INSERT INTO workflow_tasks (id, phase_id, title, order_index) VALUES ($1, $2, $3, $4) RETURNING *",
            )
            .bind(WorkflowTaskId::new())
            .bind(row.id)
            .bind(title)
            .bind(index as i32)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to insert workflow task"))?;
            tasks.push(task);
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit workflow phase"))?;

        Ok(WorkflowPhaseWithTasks { phase: row, tasks })
    }

    async fn find_phase(&self, id: WorkflowPhaseId) -> AppResult<Option<WorkflowPhase>> {
        sqlx::query_as::<_, WorkflowPhase>("SELECT * FROM workflow_phases WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find workflow phase"))
    }

    async fn update_phase(
        &self,
        id: WorkflowPhaseId,
        changes: PhaseChanges,
    ) -> AppResult<Option<WorkflowPhase>> {
        sqlx::query_as::<_, WorkflowPhase>(
            "UPDATE workflow_phases SET name = COALESCE($2, name), \
             order_index = COALESCE($3, order_index), assigned_to = COALESCE($4, assigned_to) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.order_index)
        .bind(changes.assigned_to)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update workflow phase"))
    }

    async fn delete_phase(&self, id: WorkflowPhaseId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workflow_phases WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete workflow phase"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_phases(
        &self,
        deliverable: DeliverableId,
    ) -> AppResult<Vec<WorkflowPhaseWithTasks>> {
        let phases = sqlx::query_as::<_, WorkflowPhase>(
            "SELECT * FROM workflow_phases WHERE deliverable_id = $1 ORDER BY order_index ASC",
        )
        .bind(deliverable)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list workflow phases"))?;

        let tasks = sqlx::query_as::<_, WorkflowTask>(
            "SELECT t.* FROM workflow_tasks t JOIN workflow_phases p ON p.id = t.phase_id \
             WHERE p.deliverable_id = $1 ORDER BY t.order_index ASC",
        )
        .bind(deliverable)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list workflow tasks"))?;

        let mut grouped: HashMap<WorkflowPhaseId, Vec<WorkflowTask>> = HashMap::new();
        for task in tasks {
            grouped.entry(task.phase_id).or_default().push(task);
        }

        Ok(phases
            .into_iter()
            .map(|phase| {
                let tasks = grouped.remove(&phase.id).unwrap_or_default();
                WorkflowPhaseWithTasks { phase, tasks }
            })
            .collect())
    }

    async fn add_task(
        &self,
        phase: WorkflowPhaseId,
        title: String,
    ) -> AppResult<Option<WorkflowTask>> {
        sqlx::query_as::<_, WorkflowTask>(
            "INSERT INTO workflow_tasks (id, phase_id, title, order_index) \
             SELECT $1, p.id, $3, COALESCE((SELECT MAX(order_index) + 1 FROM workflow_tasks WHERE phase_id = p.id), 0) \
             FROM workflow_phases p WHERE p.id = $2 RETURNING *",
        )
        .bind(WorkflowTaskId::new())
        .bind(phase)
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to add workflow task"))
    }

    async fn find_task(&self, id: WorkflowTaskId) -> AppResult<Option<WorkflowTask>> {
        sqlx::query_as::<_, WorkflowTask>("SELECT * FROM workflow_tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find workflow task"))
    }

    async fn rename_task(
        &self,
        id: WorkflowTaskId,
        title: String,
    ) -> AppResult<Option<WorkflowTask>> {
        sqlx::query_as::<_, WorkflowTask>(
            "UPDATE workflow_tasks SET title = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to rename workflow task"))
    }

    async fn toggle_task(&self, id: WorkflowTaskId) -> AppResult<Option<WorkflowTask>> {
        sqlx::query_as::<_, WorkflowTask>(
            "UPDATE workflow_tasks SET completed = NOT completed WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to toggle workflow task"))
    }

    async fn delete_task(&self, id: WorkflowTaskId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workflow_tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete workflow task"))?;
        Ok(result.rows_affected() > 0)
    }
}
