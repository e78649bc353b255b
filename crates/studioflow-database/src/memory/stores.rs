//! Store trait implementations for [`MemoryStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use studioflow_core::error::AppError;
use studioflow_core::result::AppResult;
use studioflow_core::types::{
    DeliverableId, FeedbackId, NotificationId, ProjectId, RevisionTaskId, UserId, VersionId,
    WorkflowPhaseId, WorkflowTaskId,
};
use studioflow_entity::deliverable::{AcceptanceStatus, Deliverable, DeliverableStatus};
use studioflow_entity::feedback::{Feedback, FeedbackWithTasks, RevisionTask};
use studioflow_entity::notification::{NewNotification, Notification};
use studioflow_entity::project::{Project, ProjectStatus};
use studioflow_entity::user::User;
use studioflow_entity::version::{Version, VersionStatus};
use studioflow_entity::workflow::{WorkflowPhase, WorkflowPhaseWithTasks, WorkflowTask};

use super::MemoryStore;
use super::state::newest_first;
use crate::store::{
    DeliverableChanges, DeliverableStore, FeedbackStore, NewDeliverable, NewFeedback, NewProject,
    NewVersion, NewWorkflowPhase, NotificationStore, PhaseChanges, ProjectChanges, ProjectStore,
    RoomStore, UserStore, VersionChanges, VersionStore, WorkflowStore,
};

#[async_trait]
impl UserStore for MemoryStore {
    async fn upsert(&self, user: &User) -> AppResult<()> {
        self.state.lock().await.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> AppResult<Vec<User>> {
        let state = self.state.lock().await;
        Ok(ids.iter().filter_map(|id| state.users.get(id).cloned()).collect())
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create(&self, project: NewProject) -> AppResult<Project> {
        let now = Utc::now();
        let row = Project {
            id: ProjectId::new(),
            title: project.title,
            description: project.description,
            client_id: project.client_id,
            talent_id: project.talent_id,
            status: ProjectStatus::Draft,
            brief: project.brief,
            deadline: project.deadline,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.projects.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: ProjectId) -> AppResult<Option<Project>> {
        Ok(self.state.lock().await.projects.get(&id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Project>> {
        let state = self.state.lock().await;
        Ok(newest_first(state.projects.values().cloned().collect()))
    }

    async fn list_by_client(&self, client: UserId) -> AppResult<Vec<Project>> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state
                .projects
                .values()
                .filter(|p| p.client_id == client)
                .cloned()
                .collect(),
        ))
    }

    async fn list_for_talent(&self, talent: UserId) -> AppResult<Vec<Project>> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state
                .projects
                .values()
                .filter(|p| {
                    p.talent_id == Some(talent)
                        || state
                            .deliverables
                            .values()
                            .any(|d| d.project_id == p.id && d.assigned_talent_id == Some(talent))
                })
                .cloned()
                .collect(),
        ))
    }

    async fn update_details(
        &self,
        id: ProjectId,
        changes: ProjectChanges,
    ) -> AppResult<Option<Project>> {
        let mut state = self.state.lock().await;
        Ok(state.projects.get_mut(&id).map(|p| {
            if let Some(title) = changes.title {
                p.title = title;
            }
            if let Some(description) = changes.description {
                p.description = Some(description);
            }
            if let Some(brief) = changes.brief {
                p.brief = brief;
            }
            if let Some(deadline) = changes.deadline {
                p.deadline = Some(deadline);
            }
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn update_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
    ) -> AppResult<Option<Project>> {
        let mut state = self.state.lock().await;
        Ok(state.projects.get_mut(&id).map(|p| {
            p.status = status;
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn set_talent(
        &self,
        id: ProjectId,
        talent: Option<UserId>,
    ) -> AppResult<Option<Project>> {
        let mut state = self.state.lock().await;
        Ok(state.projects.get_mut(&id).map(|p| {
            p.talent_id = talent;
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn delete(&self, id: ProjectId) -> AppResult<bool> {
        Ok(self.state.lock().await.remove_project(id))
    }
}

#[async_trait]
impl DeliverableStore for MemoryStore {
    async fn create(&self, deliverable: NewDeliverable) -> AppResult<Deliverable> {
        let mut state = self.state.lock().await;
        if !state.projects.contains_key(&deliverable.project_id) {
            return Err(AppError::not_found(format!(
                "Project {} not found",
                deliverable.project_id
            )));
        }
        let now = Utc::now();
        let row = Deliverable {
            id: DeliverableId::new(),
            project_id: deliverable.project_id,
            title: deliverable.title,
            kind: deliverable.kind,
            deadline: deliverable.deadline,
            status: DeliverableStatus::NotStarted,
            progress: 0,
            assigned_talent_id: None,
            acceptance_status: None,
            version_counter: 0,
            created_at: now,
            updated_at: now,
        };
        state.deliverables.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: DeliverableId) -> AppResult<Option<Deliverable>> {
        Ok(self.state.lock().await.deliverables.get(&id).cloned())
    }

    async fn list_by_project(&self, project: ProjectId) -> AppResult<Vec<Deliverable>> {
        let state = self.state.lock().await;
        let mut rows: Vec<Deliverable> = state
            .deliverables
            .values()
            .filter(|d| d.project_id == project)
            .cloned()
            .collect();
        rows.sort_by_key(|d| (d.created_at, d.id));
        Ok(rows)
    }

    async fn update_progress(
        &self,
        id: DeliverableId,
        progress: i32,
        status: Option<DeliverableStatus>,
    ) -> AppResult<Option<Deliverable>> {
        let mut state = self.state.lock().await;
        Ok(state.deliverables.get_mut(&id).map(|d| {
            d.progress = progress;
            if let Some(status) = status {
                d.status = status;
            }
            d.updated_at = Utc::now();
            d.clone()
        }))
    }

    async fn update_details(
        &self,
        id: DeliverableId,
        changes: DeliverableChanges,
    ) -> AppResult<Option<Deliverable>> {
        let mut state = self.state.lock().await;
        Ok(state.deliverables.get_mut(&id).map(|d| {
            if let Some(title) = changes.title {
                d.title = title;
            }
            if let Some(kind) = changes.kind {
                d.kind = kind;
            }
            if let Some(deadline) = changes.deadline {
                d.deadline = Some(deadline);
            }
            d.updated_at = Utc::now();
            d.clone()
        }))
    }

    async fn delete(&self, id: DeliverableId) -> AppResult<bool> {
        Ok(self.state.lock().await.remove_deliverable(id))
    }

    async fn assign_talent(
        &self,
        id: DeliverableId,
        talent: Option<UserId>,
    ) -> AppResult<Option<Deliverable>> {
        let mut state = self.state.lock().await;
        Ok(state.deliverables.get_mut(&id).map(|d| {
            d.assigned_talent_id = talent;
            d.acceptance_status = talent.map(|_| AcceptanceStatus::Pending);
            d.updated_at = Utc::now();
            d.clone()
        }))
    }

    async fn accept_assignment(
        &self,
        id: DeliverableId,
        talent: UserId,
    ) -> AppResult<Option<Deliverable>> {
        let mut state = self.state.lock().await;
        Ok(state
            .deliverables
            .get_mut(&id)
            .filter(|d| d.assigned_talent_id == Some(talent))
            .map(|d| {
                d.acceptance_status = Some(AcceptanceStatus::Accepted);
                d.updated_at = Utc::now();
                d.clone()
            }))
    }

    async fn reject_assignment(
        &self,
        id: DeliverableId,
        talent: UserId,
    ) -> AppResult<Option<Deliverable>> {
        let mut state = self.state.lock().await;
        Ok(state
            .deliverables
            .get_mut(&id)
            .filter(|d| d.assigned_talent_id == Some(talent))
            .map(|d| {
                d.acceptance_status = Some(AcceptanceStatus::Rejected);
                d.assigned_talent_id = None;
                d.updated_at = Utc::now();
                d.clone()
            }))
    }
}

#[async_trait]
impl VersionStore for MemoryStore {
    async fn create_version(&self, version: NewVersion) -> AppResult<Version> {
        let mut state = self.state.lock().await;
        let deliverable = state
            .deliverables
            .get_mut(&version.deliverable_id)
            .ok_or_else(|| {
                AppError::not_found(format!("Deliverable {} not found", version.deliverable_id))
            })?;

        deliverable.version_counter += 1;
        deliverable.status = DeliverableStatus::Review;
        deliverable.updated_at = Utc::now();
        let number = deliverable.version_counter;

        let row = Version {
            id: VersionId::new(),
            deliverable_id: version.deliverable_id,
            version_number: number,
            video_url: version.video_url,
            description: version.description,
            status: version.status,
            uploaded_by_id: version.uploaded_by_id,
            created_at: Utc::now(),
        };
        state.versions.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: VersionId) -> AppResult<Option<Version>> {
        Ok(self.state.lock().await.versions.get(&id).cloned())
    }

    async fn list_by_deliverable(&self, deliverable: DeliverableId) -> AppResult<Vec<Version>> {
        let state = self.state.lock().await;
        let mut rows: Vec<Version> = state
            .versions
            .values()
            .filter(|v| v.deliverable_id == deliverable)
            .cloned()
            .collect();
        rows.sort_by_key(|v| v.version_number);
        Ok(rows)
    }

    async fn set_status(
        &self,
        id: VersionId,
        status: VersionStatus,
    ) -> AppResult<Option<Version>> {
        let mut state = self.state.lock().await;
        Ok(state.versions.get_mut(&id).map(|v| {
            v.status = status;
            v.clone()
        }))
    }

    async fn update_details(
        &self,
        id: VersionId,
        changes: VersionChanges,
    ) -> AppResult<Option<Version>> {
        let mut state = self.state.lock().await;
        Ok(state.versions.get_mut(&id).map(|v| {
            if let Some(url) = changes.video_url {
                v.video_url = url;
            }
            if let Some(description) = changes.description {
                v.description = Some(description);
            }
            v.clone()
        }))
    }

    async fn delete(&self, id: VersionId) -> AppResult<bool> {
        Ok(self.state.lock().await.remove_version(id))
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn create_feedback(&self, feedback: NewFeedback) -> AppResult<FeedbackWithTasks> {
        let mut state = self.state.lock().await;
        let version = state.versions.get_mut(&feedback.version_id).ok_or_else(|| {
            AppError::not_found(format!("Version {} not found", feedback.version_id))
        })?;
        version.status = VersionStatus::ChangesRequested;

        let now = Utc::now();
        let row = Feedback {
            id: FeedbackId::new(),
            version_id: feedback.version_id,
            author_id: feedback.author_id,
            raw_text: feedback.raw_text,
            structured_text: feedback.structured_text,
            kind: feedback.kind,
            created_at: now,
        };
        let tasks: Vec<RevisionTask> = feedback
            .tasks
            .into_iter()
            .map(|description| RevisionTask {
                id: RevisionTaskId::new(),
                feedback_id: row.id,
                description,
                completed: false,
                created_at: now,
            })
            .collect();

        state.feedback.insert(row.id, row.clone());
        for task in &tasks {
            state.revision_tasks.insert(task.id, task.clone());
        }
        Ok(FeedbackWithTasks {
            feedback: row,
            tasks,
        })
    }

    async fn find_by_id(&self, id: FeedbackId) -> AppResult<Option<FeedbackWithTasks>> {
        let state = self.state.lock().await;
        Ok(state
            .feedback
            .get(&id)
            .map(|f| state.feedback_with_tasks(f)))
    }

    async fn list_by_version(&self, version: VersionId) -> AppResult<Vec<FeedbackWithTasks>> {
        let state = self.state.lock().await;
        let mut rows: Vec<&Feedback> = state
            .feedback
            .values()
            .filter(|f| f.version_id == version)
            .collect();
        rows.sort_by_key(|f| (f.created_at, f.id));
        Ok(rows
            .into_iter()
            .map(|f| state.feedback_with_tasks(f))
            .collect())
    }

    async fn delete(&self, id: FeedbackId) -> AppResult<bool> {
        Ok(self.state.lock().await.remove_feedback(id))
    }

    async fn add_task(
        &self,
        feedback: FeedbackId,
        description: String,
    ) -> AppResult<Option<RevisionTask>> {
        let mut state = self.state.lock().await;
        if !state.feedback.contains_key(&feedback) {
            return Ok(None);
        }
        let task = RevisionTask {
            id: RevisionTaskId::new(),
            feedback_id: feedback,
            description,
            completed: false,
            created_at: Utc::now(),
        };
        state.revision_tasks.insert(task.id, task.clone());
        Ok(Some(task))
    }

    async fn find_task(&self, id: RevisionTaskId) -> AppResult<Option<RevisionTask>> {
        Ok(self.state.lock().await.revision_tasks.get(&id).cloned())
    }

    async fn toggle_task(&self, id: RevisionTaskId) -> AppResult<Option<RevisionTask>> {
        let mut state = self.state.lock().await;
        Ok(state.revision_tasks.get_mut(&id).map(|t| {
            t.completed = !t.completed;
            t.clone()
        }))
    }

    async fn delete_task(&self, id: RevisionTaskId) -> AppResult<bool> {
        Ok(self.state.lock().await.revision_tasks.remove(&id).is_some())
    }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    async fn create_phase(&self, phase: NewWorkflowPhase) -> AppResult<WorkflowPhaseWithTasks> {
        let mut state = self.state.lock().await;
        if !state.deliverables.contains_key(&phase.deliverable_id) {
            return Err(AppError::not_found(format!(
                "Deliverable {} not found",
                phase.deliverable_id
            )));
        }
        let row = WorkflowPhase {
            id: WorkflowPhaseId::new(),
            deliverable_id: phase.deliverable_id,
            name: phase.name,
            order_index: phase.order_index,
            assigned_to: phase.assigned_to,
        };
        let tasks: Vec<WorkflowTask> = phase
            .tasks
            .into_iter()
            .enumerate()
            .map(|(index, title)| WorkflowTask {
                id: WorkflowTaskId::new(),
                phase_id: row.id,
                title,
                completed: false,
                order_index: index as i32,
            })
            .collect();

        state.phases.insert(row.id, row.clone());
        for task in &tasks {
            state.workflow_tasks.insert(task.id, task.clone());
        }
        Ok(WorkflowPhaseWithTasks { phase: row, tasks })
    }

    async fn find_phase(&self, id: WorkflowPhaseId) -> AppResult<Option<WorkflowPhase>> {
        Ok(self.state.lock().await.phases.get(&id).cloned())
    }

    async fn update_phase(
        &self,
        id: WorkflowPhaseId,
        changes: PhaseChanges,
    ) -> AppResult<Option<WorkflowPhase>> {
        let mut state = self.state.lock().await;
        Ok(state.phases.get_mut(&id).map(|p| {
            if let Some(name) = changes.name {
                p.name = name;
            }
            if let Some(order_index) = changes.order_index {
                p.order_index = order_index;
            }
            if let Some(assigned_to) = changes.assigned_to {
                p.assigned_to = assigned_to;
            }
            p.clone()
        }))
    }

    async fn delete_phase(&self, id: WorkflowPhaseId) -> AppResult<bool> {
        Ok(self.state.lock().await.remove_phase(id))
    }

    async fn list_phases(
        &self,
        deliverable: DeliverableId,
    ) -> AppResult<Vec<WorkflowPhaseWithTasks>> {
        let state = self.state.lock().await;
        let mut phases: Vec<&WorkflowPhase> = state
            .phases
            .values()
            .filter(|p| p.deliverable_id == deliverable)
            .collect();
        phases.sort_by_key(|p| p.order_index);
        Ok(phases
            .into_iter()
            .map(|p| state.phase_with_tasks(p))
            .collect())
    }

    async fn add_task(
        &self,
        phase: WorkflowPhaseId,
        title: String,
    ) -> AppResult<Option<WorkflowTask>> {
        let mut state = self.state.lock().await;
        if !state.phases.contains_key(&phase) {
            return Ok(None);
        }
        let next_index = state
            .workflow_tasks
            .values()
            .filter(|t| t.phase_id == phase)
            .map(|t| t.order_index + 1)
            .max()
            .unwrap_or(0);
        let task = WorkflowTask {
            id: WorkflowTaskId::new(),
            phase_id: phase,
            title,
            completed: false,
            order_index: next_index,
        };
        state.workflow_tasks.insert(task.id, task.clone());
        Ok(Some(task))
    }

    async fn find_task(&self, id: WorkflowTaskId) -> AppResult<Option<WorkflowTask>> {
        Ok(self.state.lock().await.workflow_tasks.get(&id).cloned())
    }

    async fn rename_task(
        &self,
        id: WorkflowTaskId,
        title: String,
    ) -> AppResult<Option<WorkflowTask>> {
        let mut state = self.state.lock().await;
        Ok(state.workflow_tasks.get_mut(&id).map(|t| {
            t.title = title;
            t.clone()
        }))
    }

    async fn toggle_task(&self, id: WorkflowTaskId) -> AppResult<Option<WorkflowTask>> {
        let mut state = self.state.lock().await;
        Ok(state.workflow_tasks.get_mut(&id).map(|t| {
            t.completed = !t.completed;
            t.clone()
        }))
    }

    async fn delete_task(&self, id: WorkflowTaskId) -> AppResult<bool> {
        Ok(self.state.lock().await.workflow_tasks.remove(&id).is_some())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_many(&self, rows: Vec<NewNotification>) -> AppResult<Vec<Notification>> {
        let mut state = self.state.lock().await;
        let created: Vec<Notification> = rows
            .into_iter()
            .map(NewNotification::into_notification)
            .collect();
        for row in &created {
            state.notifications.insert(row.id, row.clone());
        }
        Ok(created)
    }

    async fn list_for_user(&self, user: UserId, limit: i64) -> AppResult<Vec<Notification>> {
        let state = self.state.lock().await;
        let mut rows: Vec<Notification> = state
            .notifications
            .values()
            .filter(|n| n.user_id == user)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn count_unread(&self, user: UserId) -> AppResult<i64> {
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .values()
            .filter(|n| n.user_id == user && !n.read)
            .count() as i64)
    }

    async fn mark_read(&self, id: NotificationId, user: UserId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.notifications.get_mut(&id) {
            Some(n) if n.user_id == user => {
                n.read = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_all_read(&self, user: UserId) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let mut changed = 0;
        for n in state.notifications.values_mut() {
            if n.user_id == user && !n.read {
                n.read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete(&self, id: NotificationId, user: UserId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let owned = state
            .notifications
            .get(&id)
            .is_some_and(|n| n.user_id == user);
        if owned {
            state.notifications.remove(&id);
        }
        Ok(owned)
    }

    async fn delete_read_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.notifications.len();
        state
            .notifications
            .retain(|_, n| !(n.read && n.created_at < cutoff));
        Ok((before - state.notifications.len()) as u64)
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn record_member(&self, project: ProjectId, user: UserId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state
            .rooms
            .entry(project)
            .or_default()
            .entry(user)
            .or_insert_with(Utc::now);
        Ok(())
    }

    async fn members(&self, project: ProjectId) -> AppResult<Vec<UserId>> {
        let state = self.state.lock().await;
        let mut members: Vec<(DateTime<Utc>, UserId)> = state
            .rooms
            .get(&project)
            .map(|m| m.iter().map(|(user, at)| (*at, *user)).collect())
            .unwrap_or_default();
        members.sort();
        Ok(members.into_iter().map(|(_, user)| user).collect())
    }
}
