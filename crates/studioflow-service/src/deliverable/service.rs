//! Deliverable CRUD, progress updates, and filtered listing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use studioflow_core::error::AppError;
use studioflow_core::types::{DeliverableId, ProjectId};
use studioflow_database::Stores;
use studioflow_database::store::{DeliverableChanges, NewDeliverable};
use studioflow_entity::deliverable::{Deliverable, DeliverableStatus};
use studioflow_entity::project::Project;

use crate::context::RequestContext;
use crate::ordering::KeyedLocks;
use crate::{permission, visibility};

/// Manages deliverables within a project.
#[derive(Debug, Clone)]
pub struct DeliverableService {
    stores: Stores,
    locks: Arc<KeyedLocks>,
}

/// Request to create a deliverable.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeliverableRequest {
    pub title: String,
    /// Free-form type tag, e.g. `VIDEO` or `SHORT`.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

/// Request to edit a deliverable. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDeliverableRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

fn default_kind() -> String {
    "VIDEO".to_string()
}

impl DeliverableService {
    /// Creates a new deliverable service.
    pub fn new(stores: Stores, locks: Arc<KeyedLocks>) -> Self {
        Self { stores, locks }
    }

    /// Adds a deliverable to a project.
    pub async fn create_deliverable(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        req: CreateDeliverableRequest,
    ) -> Result<Deliverable, AppError> {
        let title = req.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("Deliverable title cannot be empty"));
        }
        let kind = req.kind.trim().to_uppercase();
        if kind.is_empty() {
            return Err(AppError::validation("Deliverable type cannot be empty"));
        }

        let project = self.load_project(project_id).await?;
        permission::require_manage_project(ctx, &project)?;

        let deliverable = self
            .stores
            .deliverables
            .create(NewDeliverable {
                project_id,
                title,
                kind,
                deadline: req.deadline,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            project_id = %project_id,
            deliverable_id = %deliverable.id,
            "Deliverable created"
        );
        Ok(deliverable)
    }

    /// Gets one deliverable, subject to visibility.
    pub async fn get_deliverable(
        &self,
        ctx: &RequestContext,
        deliverable_id: DeliverableId,
    ) -> Result<Deliverable, AppError> {
        let deliverable = self.load(deliverable_id).await?;
        let project = self.load_project(deliverable.project_id).await?;
        self.require_view(ctx, &project, &deliverable).await?;
        Ok(deliverable)
    }

    /// Lists the deliverables of a project the actor may see.
    pub async fn list_visible_deliverables(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> Result<Vec<Deliverable>, AppError> {
        let project = self.load_project(project_id).await?;
        let deliverables = self.stores.deliverables.list_by_project(project_id).await?;
        permission::require_participant(ctx, &project, &deliverables)?;
        Ok(visibility::visible_deliverables(
            &project,
            deliverables,
            Some(ctx),
        ))
    }

    /// Sets progress (0 to 100) and optionally the status.
    ///
    /// Allowed for the project's managers and the assigned talent.
    pub async fn update_progress(
        &self,
        ctx: &RequestContext,
        deliverable_id: DeliverableId,
        progress: i32,
        status: Option<&str>,
    ) -> Result<Deliverable, AppError> {
        if !(0..=100).contains(&progress) {
            return Err(AppError::validation("progress must be between 0 and 100"));
        }
        let status = status.map(str::parse::<DeliverableStatus>).transpose()?;

        let _order = self.locks.lock(deliverable_id.into_uuid()).await;

        let deliverable = self.load(deliverable_id).await?;
        let project = self.load_project(deliverable.project_id).await?;
        if !permission::can_manage_project(ctx, &project) && !deliverable.is_assigned_to(ctx.user_id)
        {
            return Err(AppError::forbidden(
                "Only the client, an admin, or the assigned talent can update progress",
            ));
        }

        let updated = self
            .stores
            .deliverables
            .update_progress(deliverable_id, progress, status)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Deliverable {deliverable_id} not found")))?;

        info!(
            user_id = %ctx.user_id,
            deliverable_id = %deliverable_id,
            progress,
            status = %updated.status,
            "Deliverable progress updated"
        );
        Ok(updated)
    }

    /// Edits title, type, or deadline. Only the project's client or an
    /// admin may.
    pub async fn update_deliverable(
        &self,
        ctx: &RequestContext,
        deliverable_id: DeliverableId,
        req: UpdateDeliverableRequest,
    ) -> Result<Deliverable, AppError> {
        let title = match req.title {
            Some(t) if t.trim().is_empty() => {
                return Err(AppError::validation("Deliverable title cannot be empty"));
            }
            Some(t) => Some(t.trim().to_string()),
            None => None,
        };
        let kind = match req.kind {
            Some(k) if k.trim().is_empty() => {
                return Err(AppError::validation("Deliverable type cannot be empty"));
            }
            Some(k) => Some(k.trim().to_uppercase()),
            None => None,
        };

        let _order = self.locks.lock(deliverable_id.into_uuid()).await;

        let deliverable = self.load(deliverable_id).await?;
        let project = self.load_project(deliverable.project_id).await?;
        permission::require_manage_project(ctx, &project)?;

        let updated = self
            .stores
            .deliverables
            .update_details(
                deliverable_id,
                DeliverableChanges {
                    title,
                    kind,
                    deadline: req.deadline,
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found(format!("Deliverable {deliverable_id} not found")))?;

        info!(user_id = %ctx.user_id, deliverable_id = %deliverable_id, "Deliverable updated");
        Ok(updated)
    }

    /// Deletes a deliverable with its versions and phases.
    pub async fn delete_deliverable(
        &self,
        ctx: &RequestContext,
        deliverable_id: DeliverableId,
    ) -> Result<(), AppError> {
        let deliverable = self.load(deliverable_id).await?;
        let project = self.load_project(deliverable.project_id).await?;
        permission::require_manage_project(ctx, &project)?;

        if !self.stores.deliverables.delete(deliverable_id).await? {
            return Err(AppError::not_found(format!("Deliverable {deliverable_id} not found")));
        }

        info!(user_id = %ctx.user_id, deliverable_id = %deliverable_id, "Deliverable deleted");
        Ok(())
    }

    async fn require_view(
        &self,
        ctx: &RequestContext,
        project: &Project,
        deliverable: &Deliverable,
    ) -> Result<(), AppError> {
        let siblings = self.stores.deliverables.list_by_project(project.id).await?;
        permission::require_participant(ctx, project, &siblings)?;
        if visibility::can_view_deliverable(project, deliverable, Some(ctx)) {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "This deliverable is assigned to someone else",
            ))
        }
    }

    async fn load(&self, id: DeliverableId) -> Result<Deliverable, AppError> {
        self.stores
            .deliverables
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Deliverable {id} not found")))
    }

    async fn load_project(&self, id: ProjectId) -> Result<Project, AppError> {
        self.stores
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))
    }
}
