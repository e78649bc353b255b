//! Request context carrying the authenticated actor.

use serde::{Deserialize, Serialize};

use studioflow_core::types::UserId;
use studioflow_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the entry point from a verified token and passed into every
/// service method so that each operation knows *who* is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's role at the time the token was issued.
    pub role: UserRole,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
