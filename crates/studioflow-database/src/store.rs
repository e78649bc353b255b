//! Store traits consumed by the service layer.
//!
//! Every method that writes more than one row is atomic: implementations
//! either commit all of it or none of it. Conditional updates return
//! `Ok(None)` when their precondition did not hold so callers can decide
//! between `NotFound` and `Forbidden`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use studioflow_core::result::AppResult;
use studioflow_core::types::{
    DeliverableId, FeedbackId, NotificationId, ProjectId, RevisionTaskId, UserId, VersionId,
    WorkflowPhaseId, WorkflowTaskId,
};
use studioflow_entity::deliverable::{Deliverable, DeliverableStatus};
use studioflow_entity::feedback::{FeedbackType, FeedbackWithTasks, RevisionTask};
use studioflow_entity::notification::{NewNotification, Notification};
use studioflow_entity::project::{Project, ProjectStatus};
use studioflow_entity::user::User;
use studioflow_entity::version::{Version, VersionStatus};
use studioflow_entity::workflow::{PhaseAssignee, WorkflowPhase, WorkflowPhaseWithTasks, WorkflowTask};

use crate::memory::MemoryStore;
use crate::repositories::{
    DeliverableRepository, FeedbackRepository, NotificationRepository, ProjectRepository,
    RoomRepository, UserRepository, VersionRepository, WorkflowRepository,
};

/// Data for a new project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub client_id: UserId,
    pub talent_id: Option<UserId>,
    pub brief: serde_json::Value,
    pub deadline: Option<DateTime<Utc>>,
}

/// Editable project details. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub brief: Option<serde_json::Value>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Data for a new deliverable.
#[derive(Debug, Clone)]
pub struct NewDeliverable {
    pub project_id: ProjectId,
    pub title: String,
    pub kind: String,
    pub deadline: Option<DateTime<Utc>>,
}

/// Editable deliverable details. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct DeliverableChanges {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Data for a new version. The number is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewVersion {
    pub deliverable_id: DeliverableId,
    pub uploaded_by_id: UserId,
    pub video_url: String,
    pub description: Option<String>,
    pub status: VersionStatus,
}

/// Editable version details. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct VersionChanges {
    pub video_url: Option<String>,
    pub description: Option<String>,
}

/// Data for a new feedback entry and its tasks.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub version_id: VersionId,
    pub author_id: UserId,
    pub raw_text: String,
    pub structured_text: Option<String>,
    pub kind: FeedbackType,
    pub tasks: Vec<String>,
}

/// Data for a new workflow phase and its initial tasks.
#[derive(Debug, Clone)]
pub struct NewWorkflowPhase {
    pub deliverable_id: DeliverableId,
    pub name: String,
    pub order_index: i32,
    pub assigned_to: PhaseAssignee,
    pub tasks: Vec<String>,
}

/// Editable phase details. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct PhaseChanges {
    pub name: Option<String>,
    pub order_index: Option<i32>,
    pub assigned_to: Option<PhaseAssignee>,
}

/// User lookup.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Insert or replace a user.
    async fn upsert(&self, user: &User) -> AppResult<()>;

    /// Find a user by ID.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find every user in `ids` that exists.
    async fn find_many(&self, ids: &[UserId]) -> AppResult<Vec<User>>;
}

/// Project persistence.
#[async_trait]
pub trait ProjectStore: Send + Sync + std::fmt::Debug {
    async fn create(&self, project: NewProject) -> AppResult<Project>;

    async fn find_by_id(&self, id: ProjectId) -> AppResult<Option<Project>>;

    /// Every project, newest first.
    async fn list_all(&self) -> AppResult<Vec<Project>>;

    /// Projects owned by `client`, newest first.
    async fn list_by_client(&self, client: UserId) -> AppResult<Vec<Project>>;

    /// Projects where `talent` is the primary talent or is assigned to at
    /// least one deliverable, newest first.
    async fn list_for_talent(&self, talent: UserId) -> AppResult<Vec<Project>>;

    async fn update_details(
        &self,
        id: ProjectId,
        changes: ProjectChanges,
    ) -> AppResult<Option<Project>>;

    async fn update_status(&self, id: ProjectId, status: ProjectStatus)
    -> AppResult<Option<Project>>;

    async fn set_talent(&self, id: ProjectId, talent: Option<UserId>)
    -> AppResult<Option<Project>>;

    /// Delete the project and everything beneath it.
    async fn delete(&self, id: ProjectId) -> AppResult<bool>;
}

/// Deliverable persistence and assignment transitions.
#[async_trait]
pub trait DeliverableStore: Send + Sync + std::fmt::Debug {
    async fn create(&self, deliverable: NewDeliverable) -> AppResult<Deliverable>;

    async fn find_by_id(&self, id: DeliverableId) -> AppResult<Option<Deliverable>>;

    /// Deliverables of a project, oldest first.
    async fn list_by_project(&self, project: ProjectId) -> AppResult<Vec<Deliverable>>;

    async fn update_progress(
        &self,
        id: DeliverableId,
        progress: i32,
        status: Option<DeliverableStatus>,
    ) -> AppResult<Option<Deliverable>>;

    async fn update_details(
        &self,
        id: DeliverableId,
        changes: DeliverableChanges,
    ) -> AppResult<Option<Deliverable>>;

    async fn delete(&self, id: DeliverableId) -> AppResult<bool>;

    /// Set the assigned talent. A talent resets acceptance to `PENDING`;
    /// `None` clears both fields.
    async fn assign_talent(
        &self,
        id: DeliverableId,
        talent: Option<UserId>,
    ) -> AppResult<Option<Deliverable>>;

    /// Mark accepted, only if `talent` is still the assignee.
    async fn accept_assignment(
        &self,
        id: DeliverableId,
        talent: UserId,
    ) -> AppResult<Option<Deliverable>>;

    /// Mark rejected and clear the assignee, only if `talent` is still the
    /// assignee.
    async fn reject_assignment(
        &self,
        id: DeliverableId,
        talent: UserId,
    ) -> AppResult<Option<Deliverable>>;
}

/// Version persistence.
#[async_trait]
pub trait VersionStore: Send + Sync + std::fmt::Debug {
    /// Issue the next version number for the deliverable, insert the
    /// version, and move the deliverable to `REVIEW`, atomically.
    ///
    /// Fails with `NotFound` when the deliverable does not exist.
    async fn create_version(&self, version: NewVersion) -> AppResult<Version>;

    async fn find_by_id(&self, id: VersionId) -> AppResult<Option<Version>>;

    /// Versions of a deliverable, by ascending number.
    async fn list_by_deliverable(&self, deliverable: DeliverableId) -> AppResult<Vec<Version>>;

    async fn set_status(&self, id: VersionId, status: VersionStatus)
    -> AppResult<Option<Version>>;

    async fn update_details(
        &self,
        id: VersionId,
        changes: VersionChanges,
    ) -> AppResult<Option<Version>>;

    /// Delete a version with its feedback. The deliverable's counter is
    /// left alone so numbers are never reissued.
    async fn delete(&self, id: VersionId) -> AppResult<bool>;
}

/// Feedback and revision-task persistence.
#[async_trait]
pub trait FeedbackStore: Send + Sync + std::fmt::Debug {
    /// Insert the feedback with its tasks and set the version to
    /// `CHANGES_REQUESTED`, atomically.
    ///
    /// Fails with `NotFound` when the version does not exist.
    async fn create_feedback(&self, feedback: NewFeedback) -> AppResult<FeedbackWithTasks>;

    async fn find_by_id(&self, id: FeedbackId) -> AppResult<Option<FeedbackWithTasks>>;

    /// Feedback on a version, oldest first.
    async fn list_by_version(&self, version: VersionId) -> AppResult<Vec<FeedbackWithTasks>>;

    /// Delete a feedback entry and its tasks.
    async fn delete(&self, id: FeedbackId) -> AppResult<bool>;

    async fn add_task(&self, feedback: FeedbackId, description: String)
    -> AppResult<Option<RevisionTask>>;

    async fn find_task(&self, id: RevisionTaskId) -> AppResult<Option<RevisionTask>>;

    /// Flip `completed` in a single statement.
    async fn toggle_task(&self, id: RevisionTaskId) -> AppResult<Option<RevisionTask>>;

    async fn delete_task(&self, id: RevisionTaskId) -> AppResult<bool>;
}

/// Workflow phase persistence.
#[async_trait]
pub trait WorkflowStore: Send + Sync + std::fmt::Debug {
    async fn create_phase(&self, phase: NewWorkflowPhase) -> AppResult<WorkflowPhaseWithTasks>;

    async fn find_phase(&self, id: WorkflowPhaseId) -> AppResult<Option<WorkflowPhase>>;

    async fn update_phase(
        &self,
        id: WorkflowPhaseId,
        changes: PhaseChanges,
    ) -> AppResult<Option<WorkflowPhase>>;

    /// Delete a phase and its tasks.
    async fn delete_phase(&self, id: WorkflowPhaseId) -> AppResult<bool>;

    /// Phases of a deliverable by `order_index`, each with ordered tasks.
    async fn list_phases(&self, deliverable: DeliverableId)
    -> AppResult<Vec<WorkflowPhaseWithTasks>>;

    /// Append a task at the end of the phase.
    async fn add_task(&self, phase: WorkflowPhaseId, title: String)
    -> AppResult<Option<WorkflowTask>>;

    async fn find_task(&self, id: WorkflowTaskId) -> AppResult<Option<WorkflowTask>>;

    async fn rename_task(&self, id: WorkflowTaskId, title: String)
    -> AppResult<Option<WorkflowTask>>;

    /// Flip `completed` in a single statement.
    async fn toggle_task(&self, id: WorkflowTaskId) -> AppResult<Option<WorkflowTask>>;

    async fn delete_task(&self, id: WorkflowTaskId) -> AppResult<bool>;
}

/// Notification persistence.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug {
    /// Insert all rows in one transaction.
    async fn create_many(&self, rows: Vec<NewNotification>) -> AppResult<Vec<Notification>>;

    /// Newest first, at most `limit`.
    async fn list_for_user(&self, user: UserId, limit: i64) -> AppResult<Vec<Notification>>;

    async fn count_unread(&self, user: UserId) -> AppResult<i64>;

    /// Mark one row read, only if it belongs to `user`.
    async fn mark_read(&self, id: NotificationId, user: UserId) -> AppResult<bool>;

    /// Returns the number of rows changed.
    async fn mark_all_read(&self, user: UserId) -> AppResult<u64>;

    /// Delete one row, only if it belongs to `user`.
    async fn delete(&self, id: NotificationId, user: UserId) -> AppResult<bool>;

    /// Delete read rows created before `cutoff`. Returns the number removed.
    async fn delete_read_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// Durable project room membership.
#[async_trait]
pub trait RoomStore: Send + Sync + std::fmt::Debug {
    /// Record that `user` joined the room. Repeated joins are no-ops.
    async fn record_member(&self, project: ProjectId, user: UserId) -> AppResult<()>;

    /// Every distinct user that ever joined the room.
    async fn members(&self, project: ProjectId) -> AppResult<Vec<UserId>>;
}

/// One handle per store, shared by the services.
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub deliverables: Arc<dyn DeliverableStore>,
    pub versions: Arc<dyn VersionStore>,
    pub feedback: Arc<dyn FeedbackStore>,
    pub workflow: Arc<dyn WorkflowStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub rooms: Arc<dyn RoomStore>,
}

impl Stores {
    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            projects: Arc::new(ProjectRepository::new(pool.clone())),
            deliverables: Arc::new(DeliverableRepository::new(pool.clone())),
            versions: Arc::new(VersionRepository::new(pool.clone())),
            feedback: Arc::new(FeedbackRepository::new(pool.clone())),
            workflow: Arc::new(WorkflowRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            rooms: Arc::new(RoomRepository::new(pool)),
        }
    }

    /// Every store backed by the same in-memory state.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            projects: store.clone(),
            deliverables: store.clone(),
            versions: store.clone(),
            feedback: store.clone(),
            workflow: store.clone(),
            notifications: store.clone(),
            rooms: store,
        }
    }
}
