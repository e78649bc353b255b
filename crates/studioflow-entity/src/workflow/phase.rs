//! Workflow phase entity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use studioflow_core::types::{DeliverableId, WorkflowPhaseId};

use super::task::WorkflowTask;

/// An ordered stage of work on a deliverable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkflowPhase {
    /// Unique phase identifier.
    pub id: WorkflowPhaseId,
    /// Deliverable the phase belongs to.
    pub deliverable_id: DeliverableId,
    /// Phase name.
    pub name: String,
    /// Position within the deliverable, ascending.
    pub order_index: i32,
    /// Which party the phase is intended for. Informational only.
    pub assigned_to: PhaseAssignee,
}

/// Intended owner of a workflow phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "phase_assignee", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseAssignee {
    /// Client-side phase (briefing, review).
    Client,
    /// Talent-side phase (shooting, editing).
    Talent,
}

impl FromStr for PhaseAssignee {
    type Err = studioflow_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CLIENT" => Ok(Self::Client),
            "TALENT" => Ok(Self::Talent),
            _ => Err(studioflow_core::AppError::validation(format!(
                "Invalid phase assignee: '{s}'"
            ))),
        }
    }
}

/// A phase together with its tasks, as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowPhaseWithTasks {
    /// The phase.
    #[serde(flatten)]
    pub phase: WorkflowPhase,
    /// Tasks ordered by `order_index`.
    pub tasks: Vec<WorkflowTask>,
}
