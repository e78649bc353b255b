//! Project room membership repository.

use async_trait::async_trait;
use sqlx::PgPool;

use studioflow_core::result::AppResult;
use studioflow_core::types::{ProjectId, UserId};

use super::db_error;
use crate::store::RoomStore;

/// Repository for the durable "who ever joined this room" record.
#[derive(Debug, Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    /// Create a new room repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomStore for RoomRepository {
    async fn record_member(&self, project: ProjectId, user: UserId) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO project_room_members (project_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (project_id, user_id) DO NOTHING",
        )
        .bind(project)
        .bind(user)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to record room member"))?;
        Ok(())
    }

    async fn members(&self, project: ProjectId) -> AppResult<Vec<UserId>> {
        sqlx::query_scalar(
            "SELECT user_id FROM project_room_members WHERE project_id = $1 ORDER BY first_joined_at ASC",
        )
        .bind(project)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list room members"))
    }
}
