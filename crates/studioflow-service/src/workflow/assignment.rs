//! Talent assignment transitions.

use tracing::info;

use studioflow_core::error::AppError;
use studioflow_core::events::WorkflowEvent;
use studioflow_core::types::{DeliverableId, UserId};
use studioflow_entity::deliverable::{AcceptanceStatus, Deliverable};
use studioflow_entity::user::UserRole;

use crate::context::RequestContext;
use crate::permission;

use super::service::WorkflowService;

impl WorkflowService {
    /// Assigns `talent` to the deliverable, or clears the assignment.
    ///
    /// A new assignee starts at `PENDING` and must be an existing talent.
    /// Only the project's client or an admin may assign.
    pub async fn assign_talent(
        &self,
        ctx: &RequestContext,
        deliverable_id: DeliverableId,
        talent: Option<UserId>,
    ) -> Result<Deliverable, AppError> {
        let _order = self.locks.lock(deliverable_id.into_uuid()).await;

        let (_, project) = self.load_scope(deliverable_id).await?;
        permission::require_manage_project(ctx, &project)?;
        if let Some(talent_id) = talent {
            permission::require_user_with_role(&*self.stores.users, talent_id, UserRole::Talent)
                .await?;
        }

        let updated = self
            .stores
            .deliverables
            .assign_talent(deliverable_id, talent)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Deliverable {deliverable_id} not found")))?;

        info!(
            user_id = %ctx.user_id,
            deliverable_id = %deliverable_id,
            talent_id = ?talent,
            "Talent assignment changed"
        );

        if let Some(talent_id) = talent {
            self.publish(
                ctx,
                vec![WorkflowEvent::TalentAssigned {
                    project_id: project.id,
                    deliverable_id,
                    deliverable_title: updated.title.clone(),
                    talent_id,
                }],
            )
            .await;
        }

        Ok(updated)
    }

    /// Accepts the actor's pending assignment. Accepting twice is a no-op.
    pub async fn accept_assignment(
        &self,
        ctx: &RequestContext,
        deliverable_id: DeliverableId,
    ) -> Result<Deliverable, AppError> {
        let _order = self.locks.lock(deliverable_id.into_uuid()).await;

        let (deliverable, project) = self.load_scope(deliverable_id).await?;
        if !deliverable.is_assigned_to(ctx.user_id) {
            return Err(AppError::forbidden("You are not assigned to this deliverable"));
        }
        if deliverable.acceptance_status == Some(AcceptanceStatus::Accepted) {
            return Ok(deliverable);
        }

        let updated = self
            .stores
            .deliverables
            .accept_assignment(deliverable_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::forbidden("You are not assigned to this deliverable"))?;

        info!(
            user_id = %ctx.user_id,
            deliverable_id = %deliverable_id,
            "Assignment accepted"
        );

        self.publish(
            ctx,
            vec![WorkflowEvent::AssignmentAccepted {
                project_id: project.id,
                deliverable_id,
                deliverable_title: updated.title.clone(),
                client_id: project.client_id,
                talent_id: ctx.user_id,
            }],
        )
        .await;

        Ok(updated)
    }

    /// Declines the actor's assignment, clearing the assignee and leaving
    /// `REJECTED` as a history marker.
    pub async fn reject_assignment(
        &self,
        ctx: &RequestContext,
        deliverable_id: DeliverableId,
        reason: Option<String>,
    ) -> Result<Deliverable, AppError> {
        let _order = self.locks.lock(deliverable_id.into_uuid()).await;

        let (deliverable, project) = self.load_scope(deliverable_id).await?;
        if !deliverable.is_assigned_to(ctx.user_id) {
            return Err(AppError::forbidden("You are not assigned to this deliverable"));
        }

        let updated = self
            .stores
            .deliverables
            .reject_assignment(deliverable_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::forbidden("You are not assigned to this deliverable"))?;

        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        info!(
            user_id = %ctx.user_id,
            deliverable_id = %deliverable_id,
            has_reason = reason.is_some(),
            "Assignment rejected"
        );

        self.publish(
            ctx,
            vec![WorkflowEvent::AssignmentRejected {
                project_id: project.id,
                deliverable_id,
                deliverable_title: updated.title.clone(),
                client_id: project.client_id,
                talent_id: ctx.user_id,
                reason,
            }],
        )
        .await;

        Ok(updated)
    }
}
