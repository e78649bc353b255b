//! Project repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use studioflow_core::result::AppResult;
use studioflow_core::types::{ProjectId, UserId};
use studioflow_entity::project::{Project, ProjectStatus};

use super::db_error;
use crate::store::{NewProject, ProjectChanges, ProjectStore};

/// Repository for project CRUD and status changes.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// Create a new project repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for ProjectRepository {
    async fn create(&self, project: NewProject) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (id, title, description, client_id, talent_id, status, brief, deadline) \
             VALUES ($1, $2, $3, $4, $5, 'DRAFT', $6, $7) RETURNING *",
        )
        .bind(ProjectId::new())
        .bind(&project.title)
        .bind(&project.description)
        .bind(project.client_id)
        .bind(project.talent_id)
        .bind(&project.brief)
        .bind(project.deadline)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create project"))
    }

    async fn find_by_id(&self, id: ProjectId) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find project"))
    }

    async fn list_all(&self) -> AppResult<Vec<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list projects"))
    }

    async fn list_by_client(&self, client: UserId) -> AppResult<Vec<Project>> {
        sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE client_id = $1 ORDER BY created_at DESC",
        )
        .bind(client)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list client projects"))
    }

    async fn list_for_talent(&self, talent: UserId) -> AppResult<Vec<Project>> {
        sqlx::query_as::<_, Project>(
            "SELECT p.* FROM projects p WHERE p.talent_id = $1 \
             OR EXISTS (SELECT 1 FROM deliverables d WHERE d.project_id = p.id AND d.assigned_talent_id = $1) \
             ORDER BY p.created_at DESC",
        )
        .bind(talent)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list talent projects"))
    }

    async fn update_details(
        &self,
        id: ProjectId,
        changes: ProjectChanges,
    ) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             brief = COALESCE($4, brief), deadline = COALESCE($5, deadline), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.brief)
        .bind(changes.deadline)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update project"))
    }

    async fn update_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
    ) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update project status"))
    }

    async fn set_talent(
        &self,
        id: ProjectId,
        talent: Option<UserId>,
    ) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET talent_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(talent)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to set project talent"))
    }

    async fn delete(&self, id: ProjectId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete project"))?;
        Ok(result.rows_affected() > 0)
    }
}
