//! Project CRUD, status changes, and primary-talent reassignment.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use studioflow_core::error::AppError;
use studioflow_core::events::{DomainEvent, WorkflowEvent};
use studioflow_core::traits::EventSink;
use studioflow_core::types::{ProjectId, UserId};
use studioflow_database::Stores;
use studioflow_database::store::{NewProject, ProjectChanges};
use studioflow_entity::project::{Project, ProjectStatus};
use studioflow_entity::user::UserRole;

use crate::context::RequestContext;
use crate::ordering::KeyedLocks;
use crate::permission;

/// Manages projects and raises the room-wide project events.
#[derive(Debug, Clone)]
pub struct ProjectService {
    stores: Stores,
    sink: Arc<dyn EventSink>,
    locks: Arc<KeyedLocks>,
}

/// Request to create a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Owning client. Only admins may create on behalf of someone else.
    #[serde(default)]
    pub client_id: Option<UserId>,
    #[serde(default)]
    pub talent_id: Option<UserId>,
    #[serde(default)]
    pub brief: Option<serde_json::Value>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

/// Request to edit project details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brief: Option<serde_json::Value>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl ProjectService {
    /// Creates a new project service.
    pub fn new(stores: Stores, sink: Arc<dyn EventSink>, locks: Arc<KeyedLocks>) -> Self {
        Self {
            stores,
            sink,
            locks,
        }
    }

    /// Creates a project owned by the actor (or, for admins, by
    /// `client_id`).
    pub async fn create_project(
        &self,
        ctx: &RequestContext,
        req: CreateProjectRequest,
    ) -> Result<Project, AppError> {
        let client_id = match ctx.role {
            UserRole::Admin => req.client_id.unwrap_or(ctx.user_id),
            UserRole::Client => {
                if req.client_id.is_some_and(|c| c != ctx.user_id) {
                    return Err(AppError::forbidden(
                        "Clients can only create their own projects",
                    ));
                }
                ctx.user_id
            }
            UserRole::Talent => {
                return Err(AppError::forbidden("Talent cannot create projects"));
            }
        };

        let title = req.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("Project title cannot be empty"));
        }
        if client_id != ctx.user_id {
            permission::require_user_with_role(&*self.stores.users, client_id, UserRole::Client)
                .await?;
        }
        if let Some(talent_id) = req.talent_id {
            permission::require_user_with_role(&*self.stores.users, talent_id, UserRole::Talent)
                .await?;
        }

        let project = self
            .stores
            .projects
            .create(NewProject {
                title,
                description: req.description,
                client_id,
                talent_id: req.talent_id,
                brief: req.brief.unwrap_or_else(|| serde_json::json!({})),
                deadline: req.deadline,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            project_id = %project.id,
            client_id = %project.client_id,
            "Project created"
        );
        Ok(project)
    }

    /// Gets a project the actor participates in.
    pub async fn get_project(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> Result<Project, AppError> {
        let project = self.load(project_id).await?;
        let deliverables = self.stores.deliverables.list_by_project(project_id).await?;
        permission::require_participant(ctx, &project, &deliverables)?;
        Ok(project)
    }

    /// Lists projects: all for admins, owned for clients, participating
    /// for talent.
    pub async fn list_projects(&self, ctx: &RequestContext) -> Result<Vec<Project>, AppError> {
        match ctx.role {
            UserRole::Admin => self.stores.projects.list_all().await,
            UserRole::Client => self.stores.projects.list_by_client(ctx.user_id).await,
            UserRole::Talent => self.stores.projects.list_for_talent(ctx.user_id).await,
        }
    }

    /// Edits title, description, brief, or deadline.
    pub async fn update_project(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        req: UpdateProjectRequest,
    ) -> Result<Project, AppError> {
        let title = match req.title {
            Some(t) if t.trim().is_empty() => {
                return Err(AppError::validation("Project title cannot be empty"));
            }
            Some(t) => Some(t.trim().to_string()),
            None => None,
        };

        let _order = self.locks.lock(project_id.into_uuid()).await;

        let project = self.load(project_id).await?;
        permission::require_manage_project(ctx, &project)?;

        let updated = self
            .stores
            .projects
            .update_details(
                project_id,
                ProjectChanges {
                    title,
                    description: req.description,
                    brief: req.brief,
                    deadline: req.deadline,
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {project_id} not found")))?;

        info!(user_id = %ctx.user_id, project_id = %project_id, "Project updated");

        self.publish(
            ctx,
            WorkflowEvent::ProjectUpdated {
                project_id,
                project_title: updated.title.clone(),
                talent_id: updated.talent_id,
            },
        )
        .await;

        Ok(updated)
    }

    /// Moves the project to `status`. Setting the current status again
    /// changes nothing and emits nothing.
    pub async fn update_project_status(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        status: &str,
    ) -> Result<Project, AppError> {
        let status: ProjectStatus = status.parse()?;

        let _order = self.locks.lock(project_id.into_uuid()).await;

        let project = self.load(project_id).await?;
        permission::require_manage_project(ctx, &project)?;
        if project.status == status {
            return Ok(project);
        }

        let updated = self
            .stores
            .projects
            .update_status(project_id, status)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {project_id} not found")))?;

        info!(
            user_id = %ctx.user_id,
            project_id = %project_id,
            from = %project.status,
            to = %status,
            "Project status changed"
        );

        self.publish(
            ctx,
            WorkflowEvent::ProjectStatusChanged {
                project_id,
                project_title: updated.title.clone(),
                status: status.as_str().to_string(),
                talent_id: updated.talent_id,
            },
        )
        .await;

        Ok(updated)
    }

    /// Replaces or clears the primary talent.
    pub async fn reassign_project_talent(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        talent: Option<UserId>,
    ) -> Result<Project, AppError> {
        let _order = self.locks.lock(project_id.into_uuid()).await;

        let project = self.load(project_id).await?;
        permission::require_manage_project(ctx, &project)?;
        if let Some(talent_id) = talent {
            permission::require_user_with_role(&*self.stores.users, talent_id, UserRole::Talent)
                .await?;
        }

        let updated = self
            .stores
            .projects
            .set_talent(project_id, talent)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {project_id} not found")))?;

        info!(
            user_id = %ctx.user_id,
            project_id = %project_id,
            talent_id = ?talent,
            "Project talent reassigned"
        );

        self.publish(
            ctx,
            WorkflowEvent::ProjectUpdated {
                project_id,
                project_title: updated.title.clone(),
                talent_id: updated.talent_id,
            },
        )
        .await;

        Ok(updated)
    }

    /// Deletes a project and everything beneath it.
    pub async fn delete_project(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> Result<(), AppError> {
        let project = self.load(project_id).await?;
        permission::require_manage_project(ctx, &project)?;

        if !self.stores.projects.delete(project_id).await? {
            return Err(AppError::not_found(format!("Project {project_id} not found")));
        }

        info!(user_id = %ctx.user_id, project_id = %project_id, "Project deleted");
        Ok(())
    }

    async fn load(&self, project_id: ProjectId) -> Result<Project, AppError> {
        self.stores
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {project_id} not found")))
    }

    async fn publish(&self, ctx: &RequestContext, payload: WorkflowEvent) {
        self.sink
            .publish(vec![DomainEvent::new(Some(ctx.user_id), payload)])
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use studioflow_core::error::ErrorKind;

    #[tokio::test]
    async fn test_talent_cannot_create_project() {
        let h = Harness::new().await;
        let err = h
            .projects
            .create_project(
                &h.talent_ctx(),
                CreateProjectRequest {
                    title: "Mine".into(),
                    description: None,
                    client_id: None,
                    talent_id: None,
                    brief: None,
                    deadline: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_status_change_emits_room_event() {
        let h = Harness::new().await;
        let project = h.project().await;

        let updated = h
            .projects
            .update_project_status(&h.client_ctx(), project.id, "IN_PROGRESS")
            .await
            .unwrap();
        assert_eq!(updated.status, ProjectStatus::InProgress);

        let events = h.sink.take();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload.type_tag(), "PROJECT_STATUS_CHANGED");
    }

    #[tokio::test]
    async fn test_same_status_is_silent() {
        let h = Harness::new().await;
        let project = h.project().await;
        h.projects
            .update_project_status(&h.client_ctx(), project.id, project.status.as_str())
            .await
            .unwrap();
        assert!(h.sink.take().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_status_is_invalid_transition() {
        let h = Harness::new().await;
        let project = h.project().await;
        let err = h
            .projects
            .update_project_status(&h.client_ctx(), project.id, "ARCHIVED")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTransition);
    }

    #[tokio::test]
    async fn test_only_client_or_admin_reassigns_talent() {
        let h = Harness::new().await;
        let project = h.project().await;

        let err = h
            .projects
            .reassign_project_talent(&h.talent_ctx(), project.id, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let admin = RequestContext::new(UserId::new(), UserRole::Admin);
        let updated = h
            .projects
            .reassign_project_talent(&admin, project.id, None)
            .await
            .unwrap();
        assert_eq!(updated.talent_id, None);
        assert_eq!(updated.client_id, project.client_id);
    }

    #[tokio::test]
    async fn test_outsider_cannot_read_project() {
        let h = Harness::new().await;
        let project = h.project().await;
        let outsider = RequestContext::new(UserId::new(), UserRole::Client);
        let err = h.projects.get_project(&outsider, project.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_talent_targets_must_be_existing_talent() {
        let h = Harness::new().await;
        let project = h.project().await;

        let err = h
            .projects
            .reassign_project_talent(&h.client_ctx(), project.id, Some(UserId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = h
            .projects
            .reassign_project_talent(&h.client_ctx(), project.id, Some(h.client))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(h.sink.take().is_empty());

        let err = h
            .projects
            .create_project(
                &h.client_ctx(),
                CreateProjectRequest {
                    title: "Teaser".into(),
                    description: None,
                    client_id: None,
                    talent_id: Some(UserId::new()),
                    brief: None,
                    deadline: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_sets_deadline_and_keeps_other_fields() {
        let h = Harness::new().await;
        let project = h.project().await;
        let due = chrono::Utc::now() + chrono::Duration::days(14);

        let updated = h
            .projects
            .update_project(
                &h.client_ctx(),
                project.id,
                UpdateProjectRequest {
                    deadline: Some(due),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.deadline, Some(due));
        assert_eq!(updated.title, project.title);
        assert_eq!(h.sink.take().len(), 1);
    }
}
