//! Feedback repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use studioflow_core::error::AppError;
use studioflow_core::result::AppResult;
use studioflow_core::types::{FeedbackId, RevisionTaskId, VersionId};
use studioflow_entity::feedback::{Feedback, FeedbackWithTasks, RevisionTask};

use super::db_error;
use crate::store::{FeedbackStore, NewFeedback};

/// Repository for feedback entries and their revision tasks.
#[derive(Debug, Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    /// Create a new feedback repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn tasks_for(&self, feedback_ids: &[FeedbackId]) -> AppResult<Vec<RevisionTask>> {
        let ids: Vec<Uuid> = feedback_ids.iter().map(|id| id.into_uuid()).collect();
        sqlx::query_as::<_, RevisionTask>(
            "SELECT * FROM revision_tasks WHERE feedback_id = ANY($1) ORDER BY created_at ASC, id ASC",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load revision tasks"))
    }
}

#[async_trait]
impl FeedbackStore for FeedbackRepository {
    async fn create_feedback(&self, feedback: NewFeedback) -> AppResult<FeedbackWithTasks> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin feedback transaction"))?;

        let updated = sqlx::query(
            "UPDATE versions SET status = 'CHANGES_REQUESTED' WHERE id = $1",
        )
        .bind(feedback.version_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to update version status"))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Version {} not found",
                feedback.version_id
            )));
        }

        let row = sqlx::query_as::<_, Feedback>(
            "INSERT INTO feedback (id, version_id, author_id, raw_text, structured_text, type) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(FeedbackId::new())
        .bind(feedback.version_id)
        .bind(feedback.author_id)
        .bind(&feedback.raw_text)
        .bind(&feedback.structured_text)
        .bind(feedback.kind)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to insert feedback"))?;

        let mut tasks = Vec::with_capacity(feedback.tasks.len());
        for description in &feedback.tasks {
            let task = sqlx::query_as::<_, RevisionTask>(
                "INSERT INTO revision_tasks (id, feedback_id, description) VALUES ($1, $2, $3) RETURNING *",
            )
            .bind(RevisionTaskId::new())
            .bind(row.id)
            .bind(description)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to insert revision task"))?;
            tasks.push(task);
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit feedback"))?;

        Ok(FeedbackWithTasks {
            feedback: row,
            tasks,
        })
    }

    async fn find_by_id(&self, id: FeedbackId) -> AppResult<Option<FeedbackWithTasks>> {
        let row = sqlx::query_as::<_, Feedback>("SELECT * FROM feedback WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find feedback"))?;

        match row {
            Some(feedback) => {
                let tasks = self.tasks_for(&[feedback.id]).await?;
                Ok(Some(FeedbackWithTasks { feedback, tasks }))
            }
            None => Ok(None),
        }
    }

    async fn list_by_version(&self, version: VersionId) -> AppResult<Vec<FeedbackWithTasks>> {
        let rows = sqlx::query_as::<_, Feedback>(
            "SELECT * FROM feedback WHERE version_id = $1 ORDER BY created_at ASC",
        )
        .bind(version)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list feedback"))?;

        let ids: Vec<FeedbackId> = rows.iter().map(|f| f.id).collect();
        let mut grouped: HashMap<FeedbackId, Vec<RevisionTask>> = HashMap::new();
        for task in self.tasks_for(&ids).await? {
            grouped.entry(task.feedback_id).or_default().push(task);
        }

        Ok(rows
            .into_iter()
            .map(|feedback| {
                let tasks = grouped.remove(&feedback.id).unwrap_or_default();
                FeedbackWithTasks { feedback, tasks }
            })
            .collect())
    }

    async fn delete(&self, id: FeedbackId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete feedback"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_task(
        &self,
        feedback: FeedbackId,
        description: String,
    ) -> AppResult<Option<RevisionTask>> {
        sqlx::query_as::<_, RevisionTask>(
            "INSERT INTO revision_tasks (id, feedback_id, description) \
             SELECT $1, f.id, $3 FROM feedback f WHERE f.id = $2 RETURNING *",
        )
        .bind(RevisionTaskId::new())
        .bind(feedback)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to add revision task"))
    }

    async fn find_task(&self, id: RevisionTaskId) -> AppResult<Option<RevisionTask>> {
        sqlx::query_as::<_, RevisionTask>("SELECT * FROM revision_tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find revision task"))
    }

    async fn toggle_task(&self, id: RevisionTaskId) -> AppResult<Option<RevisionTask>> {
        sqlx::query_as::<_, RevisionTask>(
            "UPDATE revision_tasks SET completed = NOT completed WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to toggle revision task"))
    }

    async fn delete_task(&self, id: RevisionTaskId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM revision_tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete revision task"))?;
        Ok(result.rows_affected() > 0)
    }
}
