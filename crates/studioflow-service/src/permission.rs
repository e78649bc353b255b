//! Project-level access rules shared by the services and the realtime
//! room join.

use studioflow_core::error::AppError;
use studioflow_core::types::UserId;
use studioflow_database::store::UserStore;
use studioflow_entity::deliverable::Deliverable;
use studioflow_entity::project::Project;
use studioflow_entity::user::{User, UserRole};

use crate::context::RequestContext;

/// Admins and the owning client manage a project.
pub fn can_manage_project(ctx: &RequestContext, project: &Project) -> bool {
    ctx.is_admin() || project.is_client(ctx.user_id)
}

/// Fails with `Forbidden` unless the actor manages the project.
pub fn require_manage_project(ctx: &RequestContext, project: &Project) -> Result<(), AppError> {
    if can_manage_project(ctx, project) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Only the project's client or an admin can do this",
        ))
    }
}

/// A participant is an admin, the client, the primary talent, or a talent
/// assigned to one of the project's deliverables.
pub fn is_project_participant(
    user: UserId,
    role: UserRole,
    project: &Project,
    deliverables: &[Deliverable],
) -> bool {
    role.is_admin()
        || project.is_client(user)
        || project.is_primary_talent(user)
        || deliverables.iter().any(|d| d.is_assigned_to(user))
}

/// Fails with `Forbidden` unless the actor participates in the project.
pub fn require_participant(
    ctx: &RequestContext,
    project: &Project,
    deliverables: &[Deliverable],
) -> Result<(), AppError> {
    if is_project_participant(ctx.user_id, ctx.role, project, deliverables) {
        Ok(())
    } else {
        Err(AppError::forbidden("You are not part of this project"))
    }
}

/// Loads `user` and checks they hold `role`. An unknown user is
/// `NotFound`, a user with another role is `Validation`.
pub async fn require_user_with_role(
    users: &dyn UserStore,
    user: UserId,
    role: UserRole,
) -> Result<User, AppError> {
    let found = users
        .find_by_id(user)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {user} not found")))?;
    if found.role != role {
        return Err(AppError::validation(format!(
            "User {user} is a {} and cannot be used as {role}",
            found.role
        )));
    }
    Ok(found)
}
