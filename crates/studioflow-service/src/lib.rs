//! # studioflow-service
//!
//! Business logic for StudioFlow. Services validate a transition against
//! persisted state, commit it through the store traits, and hand the
//! resulting domain events to an [`EventSink`](studioflow_core::traits::EventSink)
//! once the commit is durable.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod deliverable;
pub mod notification;
pub mod ordering;
pub mod permission;
pub mod project;
pub mod visibility;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use context::RequestContext;
pub use deliverable::DeliverableService;
pub use notification::NotificationService;
pub use ordering::KeyedLocks;
pub use project::ProjectService;
pub use workflow::WorkflowService;
