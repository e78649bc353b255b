//! Role-based visibility of deliverables and workflow phases.
//!
//! These are pure functions over already-loaded rows. Callers load the
//! project and its children, then filter before returning them.

use studioflow_entity::deliverable::Deliverable;
use studioflow_entity::project::Project;
use studioflow_entity::user::UserRole;
use studioflow_entity::workflow::WorkflowPhaseWithTasks;

use crate::context::RequestContext;

/// Returns whether `viewer` may see `deliverable` of `project`.
///
/// Talent see deliverables assigned to them, and the project's primary
/// talent also sees unassigned ones. Every other role, and a missing
/// viewer, sees everything.
pub fn can_view_deliverable(
    project: &Project,
    deliverable: &Deliverable,
    viewer: Option<&RequestContext>,
) -> bool {
    match viewer {
        Some(ctx) if ctx.role == UserRole::Talent => match deliverable.assigned_talent_id {
            Some(assignee) => assignee == ctx.user_id,
            None => project.is_primary_talent(ctx.user_id),
        },
        _ => true,
    }
}

/// Filters a project's deliverables down to what `viewer` may see,
/// preserving order.
pub fn visible_deliverables(
    project: &Project,
    deliverables: Vec<Deliverable>,
    viewer: Option<&RequestContext>,
) -> Vec<Deliverable> {
    deliverables
        .into_iter()
        .filter(|d| can_view_deliverable(project, d, viewer))
        .collect()
}

/// Every phase of a visible deliverable is visible. `assigned_to` is
/// informational only.
pub fn visible_workflow_phases(
    _deliverable: &Deliverable,
    phases: Vec<WorkflowPhaseWithTasks>,
    _viewer: Option<&RequestContext>,
) -> Vec<WorkflowPhaseWithTasks> {
    phases
}
