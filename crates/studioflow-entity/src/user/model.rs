//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use studioflow_core::types::UserId;

use super::role::UserRole;

/// A registered user. Read-only from the workflow's point of view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Email address used for notification mail.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role in the workflow.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
