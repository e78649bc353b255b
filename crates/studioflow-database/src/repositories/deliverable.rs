//! Deliverable repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use studioflow_core::result::AppResult;
use studioflow_core::types::{DeliverableId, ProjectId, UserId};
use studioflow_entity::deliverable::{Deliverable, DeliverableStatus};

use super::db_error;
use crate::store::{DeliverableChanges, DeliverableStore, NewDeliverable};

/// Repository for deliverables and their assignment transitions.
///
/// Assignment changes are single conditional `UPDATE`s so a concurrent
/// reassignment cannot be overwritten by a stale accept or reject.
#[derive(Debug, Clone)]
pub struct DeliverableRepository {
    pool: PgPool,
}

impl DeliverableRepository {
    /// Create a new deliverable repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeliverableStore for DeliverableRepository {
    async fn create(&self, deliverable: NewDeliverable) -> AppResult<Deliverable> {
        sqlx::query_as::<_, Deliverable>(
            "INSERT INTO deliverables (id, project_id, title, type, deadline) VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(DeliverableId::new())
        .bind(deliverable.project_id)
        .bind(&deliverable.title)
        .bind(&deliverable.kind)
        .bind(deliverable.deadline)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create deliverable"))
    }

    async fn find_by_id(&self, id: DeliverableId) -> AppResult<Option<Deliverable>> {
        sqlx::query_as::<_, Deliverable>("SELECT * FROM deliverables WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find deliverable"))
    }

    async fn list_by_project(&self, project: ProjectId) -> AppResult<Vec<Deliverable>> {
        sqlx::query_as::<_, Deliverable>(
            "SELECT * FROM deliverables WHERE project_id = $1 ORDER BY created_at ASC",
        )
        .bind(project)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list deliverables"))
    }

    async fn update_progress(
        &self,
        id: DeliverableId,
        progress: i32,
        status: Option<DeliverableStatus>,
    ) -> AppResult<Option<Deliverable>> {
        sqlx::query_as::<_, Deliverable>(
            "UPDATE deliverables SET progress = $2, status = COALESCE($3, status), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(progress)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update deliverable progress"))
    }

    async fn update_details(
        &self,
        id: DeliverableId,
        changes: DeliverableChanges,
    ) -> AppResult<Option<Deliverable>> {
        sqlx::query_as::<_, Deliverable>(
            "UPDATE deliverables SET title = COALESCE($2, title), type = COALESCE($3, type), \
             deadline = COALESCE($4, deadline), updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.kind)
        .bind(changes.deadline)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update deliverable"))
    }

    async fn delete(&self, id: DeliverableId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM deliverables WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete deliverable"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn assign_talent(
        &self,
        id: DeliverableId,
        talent: Option<UserId>,
    ) -> AppResult<Option<Deliverable>> {
        sqlx::query_as::<_, Deliverable>(
            "UPDATE deliverables SET assigned_talent_id = $2, \
             acceptance_status = CASE WHEN $2::uuid IS NULL THEN NULL ELSE 'PENDING'::acceptance_status END, \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(talent)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to assign talent"))
    }

    async fn accept_assignment(
        &self,
        id: DeliverableId,
        talent: UserId,
    ) -> AppResult<Option<Deliverable>> {
        sqlx::query_as::<_, Deliverable>(
            "UPDATE deliverables SET acceptance_status = 'ACCEPTED', updated_at = NOW() \
             WHERE id = $1 AND assigned_talent_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(talent)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to accept assignment"))
    }

    async fn reject_assignment(
        &self,
        id: DeliverableId,
        talent: UserId,
    ) -> AppResult<Option<Deliverable>> {
        sqlx::query_as::<_, Deliverable>(
            "UPDATE deliverables SET acceptance_status = 'REJECTED', assigned_talent_id = NULL, \
             updated_at = NOW() WHERE id = $1 AND assigned_talent_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(talent)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to reject assignment"))
    }
}
