//! Notification repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use studioflow_core::result::AppResult;
use studioflow_core::types::{NotificationId, UserId};
use studioflow_entity::notification::{NewNotification, Notification};

use super::db_error;
use crate::store::NotificationStore;

/// Repository for persisted notifications.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create_many(&self, rows: Vec<NewNotification>) -> AppResult<Vec<Notification>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin notification transaction"))?;

        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            let notification = sqlx::query_as::<_, Notification>(
                "INSERT INTO notifications (id, user_id, type, title, message, link) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
            )
            .bind(NotificationId::new())
            .bind(row.user_id)
            .bind(row.kind)
            .bind(&row.title)
            .bind(&row.message)
            .bind(&row.link)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to create notification"))?;
            created.push(notification);
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit notifications"))?;
        Ok(created)
    }

    async fn list_for_user(&self, user: UserId, limit: i64) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list notifications"))
    }

    async fn count_unread(&self, user: UserId) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT read")
            .bind(user)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count unread notifications"))
    }

    async fn mark_read(&self, id: NotificationId, user: UserId) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user)
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to mark notification read"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user: UserId) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND NOT read")
                .bind(user)
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to mark all notifications read"))?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: NotificationId, user: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete notification"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_read_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE read AND created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to clean up notifications"))?;
        Ok(result.rows_affected())
    }
}
