//! Version entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use studioflow_core::types::{DeliverableId, UserId, VersionId};

use super::status::VersionStatus;

/// One uploaded cut of a deliverable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Version {
    /// Unique version identifier.
    pub id: VersionId,
    /// Parent deliverable.
    pub deliverable_id: DeliverableId,
    /// Sequential number, starting at 1, gap-free per deliverable.
    pub version_number: i32,
    /// URL of the uploaded video in blob storage.
    pub video_url: String,
    /// Optional upload notes.
    pub description: Option<String>,
    /// Review status.
    pub status: VersionStatus,
    /// Uploader.
    pub uploaded_by_id: UserId,
    /// When the version was uploaded.
    pub created_at: DateTime<Utc>,
}
