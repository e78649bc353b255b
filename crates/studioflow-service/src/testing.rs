//! Shared fixtures for service unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use studioflow_core::events::DomainEvent;
use studioflow_core::traits::EventSink;
use studioflow_core::types::{ProjectId, UserId};
use studioflow_database::{MemoryStore, Stores};
use studioflow_entity::deliverable::Deliverable;
use studioflow_entity::project::Project;
use studioflow_entity::user::{User, UserRole};

use crate::context::RequestContext;
use crate::deliverable::{CreateDeliverableRequest, DeliverableService};
use crate::ordering::KeyedLocks;
use crate::project::{CreateProjectRequest, ProjectService};
use crate::workflow::WorkflowService;

/// Sink that records every published event.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingSink {
    /// Drains the recorded events.
    pub(crate) fn take(&self) -> Vec<DomainEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn publish(&self, events: Vec<DomainEvent>) {
        self.events.lock().unwrap().extend(events);
    }
}

/// Services over a fresh memory store, with one client and one talent
/// who is the primary talent of every project created via [`Harness::project`].
pub(crate) struct Harness {
    pub stores: Stores,
    pub sink: Arc<RecordingSink>,
    pub workflow: WorkflowService,
    pub projects: ProjectService,
    pub deliverables: DeliverableService,
    pub client: UserId,
    pub talent: UserId,
}

impl Harness {
    pub(crate) async fn new() -> Self {
        let stores = Stores::memory(Arc::new(MemoryStore::new()));
        let sink = Arc::new(RecordingSink::default());
        let locks = Arc::new(KeyedLocks::default());
        let client = seed_user(&stores, UserRole::Client).await;
        let talent = seed_user(&stores, UserRole::Talent).await;
        Self {
            workflow: WorkflowService::new(stores.clone(), sink.clone(), locks.clone()),
            projects: ProjectService::new(stores.clone(), sink.clone(), locks.clone()),
            deliverables: DeliverableService::new(stores.clone(), locks),
            stores,
            sink,
            client,
            talent,
        }
    }

    /// Stores a new user with `role` and returns its ID.
    pub(crate) async fn user(&self, role: UserRole) -> UserId {
        seed_user(&self.stores, role).await
    }

    /// A talent with no link to any project.
    pub(crate) async fn stranger_ctx(&self) -> RequestContext {
        RequestContext::new(self.user(UserRole::Talent).await, UserRole::Talent)
    }

    pub(crate) fn client_ctx(&self) -> RequestContext {
        RequestContext::new(self.client, UserRole::Client)
    }

    pub(crate) fn talent_ctx(&self) -> RequestContext {
        RequestContext::new(self.talent, UserRole::Talent)
    }

    pub(crate) async fn project(&self) -> Project {
        self.projects
            .create_project(
                &self.client_ctx(),
                CreateProjectRequest {
                    title: "Launch film".into(),
                    description: None,
                    client_id: None,
                    talent_id: Some(self.talent),
                    brief: None,
                    deadline: None,
                },
            )
            .await
            .unwrap()
    }

    pub(crate) async fn deliverable_in(&self, project: ProjectId) -> Deliverable {
        self.deliverables
            .create_deliverable(
                &self.client_ctx(),
                project,
                CreateDeliverableRequest {
                    title: "Hero cut".into(),
                    kind: "VIDEO".into(),
                    deadline: None,
                },
            )
            .await
            .unwrap()
    }

    pub(crate) async fn deliverable(&self) -> Deliverable {
        let project = self.project().await;
        self.deliverable_in(project.id).await
    }

    /// A deliverable assigned to the harness talent, with the
    /// assignment event already drained.
    pub(crate) async fn assigned_deliverable(&self) -> Deliverable {
        let d = self.deliverable().await;
        let d = self
            .workflow
            .assign_talent(&self.client_ctx(), d.id, Some(self.talent))
            .await
            .unwrap();
        self.sink.take();
        d
    }
}

async fn seed_user(stores: &Stores, role: UserRole) -> UserId {
    let id = UserId::new();
    stores
        .users
        .upsert(&User {
            id,
            email: format!("{id}@studio.test"),
            name: role.as_str().to_lowercase(),
            role,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    id
}
