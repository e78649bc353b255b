//! Version repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use studioflow_core::error::AppError;
use studioflow_core::result::AppResult;
use studioflow_core::types::{DeliverableId, VersionId};
use studioflow_entity::version::{Version, VersionStatus};

use super::db_error;
use crate::store::{NewVersion, VersionChanges, VersionStore};

/// Repository for deliverable versions.
#[derive(Debug, Clone)]
pub struct VersionRepository {
    pool: PgPool,
}

impl VersionRepository {
    /// Create a new version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionStore for VersionRepository {
    async fn create_version(&self, version: NewVersion) -> AppResult<Version> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin version transaction"))?;

        // The row lock taken by this UPDATE serializes concurrent uploads to
        // the same deliverable until the transaction ends.
        let number: Option<i32> = sqlx::query_scalar(
            "UPDATE deliverables SET version_counter = version_counter + 1, status = 'REVIEW', \
             updated_at = NOW() WHERE id = $1 RETURNING version_counter",
        )
        .bind(version.deliverable_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to issue version number"))?;

        let number = number.ok_or_else(|| {
            AppError::not_found(format!("Deliverable {} not found", version.deliverable_id))
        })?;

        let created = sqlx::query_as::<_, Version>(
            "INSERT INTO versions (id, deliverable_id, version_number, video_url, description, status, uploaded_by_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(VersionId::new())
        .bind(version.deliverable_id)
        .bind(number)
        .bind(&version.video_url)
        .bind(&version.description)
        .bind(version.status)
        .bind(version.uploaded_by_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to insert version"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit version"))?;

        Ok(created)
    }

    async fn find_by_id(&self, id: VersionId) -> AppResult<Option<Version>> {
        sqlx::query_as::<_, Version>("SELECT * FROM versions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find version"))
    }

    async fn list_by_deliverable(&self, deliverable: DeliverableId) -> AppResult<Vec<Version>> {
        sqlx::query_as::<_, Version>(
            "SELECT * FROM versions WHERE deliverable_id = $1 ORDER BY version_number ASC",
        )
        .bind(deliverable)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list versions"))
    }

    async fn set_status(
        &self,
        id: VersionId,
        status: VersionStatus,
    ) -> AppResult<Option<Version>> {
        sqlx::query_as::<_, Version>("UPDATE versions SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to update version status"))
    }

    async fn update_details(
        &self,
        id: VersionId,
        changes: VersionChanges,
    ) -> AppResult<Option<Version>> {
        sqlx::query_as::<_, Version>(
            "UPDATE versions SET video_url = COALESCE($2, video_url), \
             description = COALESCE($3, description) WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.video_url)
        .bind(changes.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update version"))
    }

    async fn delete(&self, id: VersionId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM versions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete version"))?;
        Ok(result.rows_affected() > 0)
    }
}
