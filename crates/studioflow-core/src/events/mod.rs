//! Domain events emitted by StudioFlow operations.
//!
//! Events are produced by the workflow service after its transaction
//! commits, handed to an [`EventSink`](crate::traits::EventSink), and
//! consumed by the notification dispatcher.

pub mod workflow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{ProjectId, UserId};

pub use workflow::WorkflowEvent;

/// Who an event is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// A single user.
    User(UserId),
    /// Everyone associated with a project room, plus an explicit extra
    /// recipient who may never have joined it.
    Room {
        project_id: ProjectId,
        also: Option<UserId>,
    },
}

/// Wrapper for a workflow event with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the transition committed.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event.
    pub actor_id: Option<UserId>,
    /// The event payload.
    pub payload: WorkflowEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Option<UserId>, payload: WorkflowEvent) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }

    /// Shortcut for [`WorkflowEvent::ordering_key`].
    pub fn ordering_key(&self) -> Uuid {
        self.payload.ordering_key()
    }
}
