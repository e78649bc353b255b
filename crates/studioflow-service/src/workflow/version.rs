//! Version upload and review status.

use serde::Deserialize;
use tracing::info;

use studioflow_core::error::AppError;
use studioflow_core::events::WorkflowEvent;
use studioflow_core::types::{DeliverableId, VersionId};
use studioflow_database::store::{NewVersion, VersionChanges};
use studioflow_entity::project::Project;
use studioflow_entity::version::{Version, VersionStatus};

use crate::context::RequestContext;
use crate::permission;

use super::service::WorkflowService;

/// Request to upload a new version.
#[derive(Debug, Clone, Deserialize)]
pub struct AddVersionRequest {
    /// Blob-store URL of the uploaded cut.
    pub video_url: String,
    /// Optional note from the uploader.
    #[serde(default)]
    pub description: Option<String>,
}

/// Request to correct a version's URL or notes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVersionRequest {
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl WorkflowService {
    /// Uploads the next version of a deliverable.
    ///
    /// The number is issued by the store in the same transaction that
    /// inserts the row and moves the deliverable to `REVIEW`.
    pub async fn add_version(
        &self,
        ctx: &RequestContext,
        deliverable_id: DeliverableId,
        req: AddVersionRequest,
    ) -> Result<Version, AppError> {
        let video_url = req.video_url.trim().to_string();
        if video_url.is_empty() {
            return Err(AppError::validation("video_url cannot be empty"));
        }

        let _order = self.locks.lock(deliverable_id.into_uuid()).await;

        let (deliverable, project) = self.load_scope(deliverable_id).await?;
        self.require_deliverable_access(ctx, &project, &deliverable)
            .await?;

        let version = self
            .stores
            .versions
            .create_version(NewVersion {
                deliverable_id,
                uploaded_by_id: ctx.user_id,
                video_url,
                description: req.description,
                status: VersionStatus::INITIAL,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            deliverable_id = %deliverable_id,
            version_id = %version.id,
            version_number = version.version_number,
            "Version uploaded"
        );

        self.publish(
            ctx,
            vec![WorkflowEvent::VersionUploaded {
                project_id: project.id,
                deliverable_id,
                deliverable_title: deliverable.title,
                version_id: version.id,
                version_number: version.version_number,
                client_id: project.client_id,
            }],
        )
        .await;

        Ok(version)
    }

    /// Sets a version's review status. Any status is reachable from any
    /// other; only the value itself is validated.
    pub async fn set_version_status(
        &self,
        ctx: &RequestContext,
        version_id: VersionId,
        status: &str,
    ) -> Result<Version, AppError> {
        let status: VersionStatus = status.parse()?;

        let version = self.load_version(version_id).await?;
        let _order = self.locks.lock(version.deliverable_id.into_uuid()).await;

        let (deliverable, project) = self.load_scope(version.deliverable_id).await?;
        permission::require_manage_project(ctx, &project)?;

        let updated = self
            .stores
            .versions
            .set_status(version_id, status)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Version {version_id} not found")))?;

        info!(
            user_id = %ctx.user_id,
            version_id = %version_id,
            status = %status,
            "Version status changed"
        );

        let event = match (status, deliverable.assigned_talent_id) {
            (VersionStatus::Approved, Some(talent_id)) => Some(WorkflowEvent::VersionApproved {
                project_id: project.id,
                deliverable_id: deliverable.id,
                deliverable_title: deliverable.title,
                version_id: updated.id,
                version_number: updated.version_number,
                talent_id,
            }),
            (VersionStatus::ChangesRequested, Some(talent_id)) => {
                Some(WorkflowEvent::VersionChangesRequested {
                    project_id: project.id,
                    deliverable_id: deliverable.id,
                    deliverable_title: deliverable.title,
                    version_id: updated.id,
                    version_number: updated.version_number,
                    talent_id,
                })
            }
            _ => None,
        };
        self.publish(ctx, event.into_iter().collect()).await;

        Ok(updated)
    }

    /// Lists the versions of a deliverable the actor can see.
    pub async fn list_versions(
        &self,
        ctx: &RequestContext,
        deliverable_id: DeliverableId,
    ) -> Result<Vec<Version>, AppError> {
        let (deliverable, project) = self.load_scope(deliverable_id).await?;
        self.require_deliverable_access(ctx, &project, &deliverable)
            .await?;
        self.stores.versions.list_by_deliverable(deliverable_id).await
    }

    /// Edits a version's URL or notes. Allowed for the uploader and the
    /// project's managers. Number and status are untouched.
    pub async fn update_version(
        &self,
        ctx: &RequestContext,
        version_id: VersionId,
        req: UpdateVersionRequest,
    ) -> Result<Version, AppError> {
        let video_url = match req.video_url {
            Some(url) if url.trim().is_empty() => {
                return Err(AppError::validation("video_url cannot be empty"));
            }
            Some(url) => Some(url.trim().to_string()),
            None => None,
        };

        let version = self.load_version(version_id).await?;
        let (_, project) = self.load_scope(version.deliverable_id).await?;
        require_uploader_or_manager(ctx, &project, &version)?;

        let updated = self
            .stores
            .versions
            .update_details(
                version_id,
                VersionChanges {
                    video_url,
                    description: req.description,
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found(format!("Version {version_id} not found")))?;

        info!(user_id = %ctx.user_id, version_id = %version_id, "Version updated");
        Ok(updated)
    }

    /// Deletes a version with its feedback. The number it held is not
    /// reissued.
    pub async fn delete_version(
        &self,
        ctx: &RequestContext,
        version_id: VersionId,
    ) -> Result<(), AppError> {
        let version = self.load_version(version_id).await?;
        let _order = self.locks.lock(version.deliverable_id.into_uuid()).await;

        let (_, project) = self.load_scope(version.deliverable_id).await?;
        require_uploader_or_manager(ctx, &project, &version)?;

        if !self.stores.versions.delete(version_id).await? {
            return Err(AppError::not_found(format!("Version {version_id} not found")));
        }
        info!(
            user_id = %ctx.user_id,
            version_id = %version_id,
            version_number = version.version_number,
            "Version deleted"
        );
        Ok(())
    }
}

fn require_uploader_or_manager(
    ctx: &RequestContext,
    project: &Project,
    version: &Version,
) -> Result<(), AppError> {
    if version.uploaded_by_id == ctx.user_id || permission::can_manage_project(ctx, project) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Only the uploader, the client, or an admin can change this version",
        ))
    }
}
