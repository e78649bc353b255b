//! Workflow task entity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use studioflow_core::types::{WorkflowPhaseId, WorkflowTaskId};

/// A checklist item inside a workflow phase.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkflowTask {
    /// Unique task identifier.
    pub id: WorkflowTaskId,
    /// Owning phase.
    pub phase_id: WorkflowPhaseId,
    /// Task title.
    pub title: String,
    /// Whether the task is done.
    pub completed: bool,
    /// Position within the phase, ascending.
    pub order_index: i32,
}
