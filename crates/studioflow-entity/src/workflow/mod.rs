//! Workflow phases and their tasks.

pub mod phase;
pub mod task;

pub use phase::{PhaseAssignee, WorkflowPhase, WorkflowPhaseWithTasks};
pub use task::WorkflowTask;
