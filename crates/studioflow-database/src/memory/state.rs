//! Tables backing [`MemoryStore`](super::MemoryStore).

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use studioflow_core::types::{
    DeliverableId, FeedbackId, NotificationId, ProjectId, RevisionTaskId, UserId, VersionId,
    WorkflowPhaseId, WorkflowTaskId,
};
use studioflow_entity::deliverable::Deliverable;
use studioflow_entity::feedback::{Feedback, FeedbackWithTasks, RevisionTask};
use studioflow_entity::notification::Notification;
use studioflow_entity::project::Project;
use studioflow_entity::user::User;
use studioflow_entity::version::Version;
use studioflow_entity::workflow::{WorkflowPhase, WorkflowPhaseWithTasks, WorkflowTask};

#[derive(Debug, Default)]
pub(super) struct State {
    pub users: HashMap<UserId, User>,
    pub projects: HashMap<ProjectId, Project>,
    pub deliverables: HashMap<DeliverableId, Deliverable>,
    pub versions: HashMap<VersionId, Version>,
    pub feedback: HashMap<FeedbackId, Feedback>,
    pub revision_tasks: HashMap<RevisionTaskId, RevisionTask>,
    pub phases: HashMap<WorkflowPhaseId, WorkflowPhase>,
    pub workflow_tasks: HashMap<WorkflowTaskId, WorkflowTask>,
    pub notifications: HashMap<NotificationId, Notification>,
    pub rooms: HashMap<ProjectId, BTreeMap<UserId, DateTime<Utc>>>,
}

impl State {
    pub fn feedback_with_tasks(&self, feedback: &Feedback) -> FeedbackWithTasks {
        let mut tasks: Vec<RevisionTask> = self
            .revision_tasks
            .values()
            .filter(|t| t.feedback_id == feedback.id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| (t.created_at, t.id));
        FeedbackWithTasks {
            feedback: feedback.clone(),
            tasks,
        }
    }

    pub fn phase_with_tasks(&self, phase: &WorkflowPhase) -> WorkflowPhaseWithTasks {
        let mut tasks: Vec<WorkflowTask> = self
            .workflow_tasks
            .values()
            .filter(|t| t.phase_id == phase.id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.order_index);
        WorkflowPhaseWithTasks {
            phase: phase.clone(),
            tasks,
        }
    }

    pub fn remove_feedback(&mut self, id: FeedbackId) -> bool {
        self.revision_tasks.retain(|_, t| t.feedback_id != id);
        self.feedback.remove(&id).is_some()
    }

    pub fn remove_phase(&mut self, id: WorkflowPhaseId) -> bool {
        self.workflow_tasks.retain(|_, t| t.phase_id != id);
        self.phases.remove(&id).is_some()
    }

    pub fn remove_version(&mut self, id: VersionId) -> bool {
        let feedback: Vec<FeedbackId> = self
            .feedback
            .values()
            .filter(|f| f.version_id == id)
            .map(|f| f.id)
            .collect();
        for feedback_id in feedback {
            self.remove_feedback(feedback_id);
        }
        self.versions.remove(&id).is_some()
    }

    pub fn remove_deliverable(&mut self, id: DeliverableId) -> bool {
        let versions: Vec<VersionId> = self
            .versions
            .values()
            .filter(|v| v.deliverable_id == id)
            .map(|v| v.id)
            .collect();
        for version_id in versions {
            self.remove_version(version_id);
        }

        let phases: Vec<WorkflowPhaseId> = self
            .phases
            .values()
            .filter(|p| p.deliverable_id == id)
            .map(|p| p.id)
            .collect();
        for phase_id in phases {
            self.remove_phase(phase_id);
        }

        self.deliverables.remove(&id).is_some()
    }

    pub fn remove_project(&mut self, id: ProjectId) -> bool {
        let deliverables: Vec<DeliverableId> = self
            .deliverables
            .values()
            .filter(|d| d.project_id == id)
            .map(|d| d.id)
            .collect();
        for deliverable_id in deliverables {
            self.remove_deliverable(deliverable_id);
        }
        self.rooms.remove(&id);
        self.projects.remove(&id).is_some()
    }
}

/// Sort newest first.
pub(super) fn newest_first(mut projects: Vec<Project>) -> Vec<Project> {
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    projects
}
