//! Workflow state machine: assignment, versions, feedback, and phases.
//!
//! Each operation validates against persisted state, commits through the
//! store in one atomic unit, and publishes its events only afterwards.

pub mod assignment;
pub mod feedback;
pub mod phase;
pub mod service;
pub mod version;

#[cfg(test)]
mod tests;

pub use feedback::AddFeedbackRequest;
pub use phase::{CreatePhaseRequest, UpdatePhaseRequest};
pub use service::WorkflowService;
pub use version::{AddVersionRequest, UpdateVersionRequest};
