//! Version, feedback, and workflow phase handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use studioflow_core::types::{
    DeliverableId, FeedbackId, RevisionTaskId, VersionId, WorkflowPhaseId, WorkflowTaskId,
};
use studioflow_entity::feedback::{FeedbackWithTasks, RevisionTask};
use studioflow_entity::version::Version;
use studioflow_entity::workflow::{WorkflowPhase, WorkflowPhaseWithTasks, WorkflowTask};
use studioflow_service::workflow::CreatePhaseRequest;

use crate::dto::request::{
    AddFeedbackBody, AddRevisionTaskRequest, AddVersionBody, StatusRequest, UpdatePhaseBody,
    UpdateVersionBody, WorkflowTaskRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

// ── Versions ─────────────────────────────────────────────────

/// GET /api/deliverables/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeliverableId>,
) -> Result<Json<ApiResponse<Vec<Version>>>, ApiError> {
    let versions = state.workflow.list_versions(&auth, id).await?;
    Ok(Json(ApiResponse::ok(versions)))
}

/// POST /api/deliverables/{id}/versions
pub async fn add_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeliverableId>,
    ValidatedJson(body): ValidatedJson<AddVersionBody>,
) -> Result<(StatusCode, Json<ApiResponse<Version>>), ApiError> {
    let version = state.workflow.add_version(&auth, id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(version))))
}

/// PATCH /api/versions/{id}
pub async fn update_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<VersionId>,
    ValidatedJson(body): ValidatedJson<UpdateVersionBody>,
) -> Result<Json<ApiResponse<Version>>, ApiError> {
    let version = state.workflow.update_version(&auth, id, body.into()).await?;
    Ok(Json(ApiResponse::ok(version)))
}

/// DELETE /api/versions/{id}
pub async fn delete_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<VersionId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.workflow.delete_version(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Version deleted"))))
}

/// PATCH /api/versions/{id}/status
pub async fn set_version_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<VersionId>,
    ValidatedJson(req): ValidatedJson<StatusRequest>,
) -> Result<Json<ApiResponse<Version>>, ApiError> {
    let version = state
        .workflow
        .set_version_status(&auth, id, &req.status)
        .await?;
    Ok(Json(ApiResponse::ok(version)))
}

// ── Feedback ─────────────────────────────────────────────────

/// GET /api/versions/{id}/feedback
pub async fn list_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<VersionId>,
) -> Result<Json<ApiResponse<Vec<FeedbackWithTasks>>>, ApiError> {
    let feedback = state.workflow.list_feedback(&auth, id).await?;
    Ok(Json(ApiResponse::ok(feedback)))
}

/// POST /api/versions/{id}/feedback
pub async fn add_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<VersionId>,
    ValidatedJson(body): ValidatedJson<AddFeedbackBody>,
) -> Result<(StatusCode, Json<ApiResponse<FeedbackWithTasks>>), ApiError> {
    let feedback = state.workflow.add_feedback(&auth, id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(feedback))))
}

/// DELETE /api/feedback/{id}
pub async fn delete_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FeedbackId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.workflow.delete_feedback(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Feedback deleted"))))
}

/// POST /api/feedback/{id}/tasks
pub async fn add_revision_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FeedbackId>,
    ValidatedJson(req): ValidatedJson<AddRevisionTaskRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RevisionTask>>), ApiError> {
    let task = state
        .workflow
        .add_revision_task(&auth, id, &req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(task))))
}

/// PATCH /api/revision-tasks/{id}/toggle
pub async fn toggle_revision_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RevisionTaskId>,
) -> Result<Json<ApiResponse<RevisionTask>>, ApiError> {
    let task = state.workflow.toggle_revision_task(&auth, id).await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// DELETE /api/revision-tasks/{id}
pub async fn delete_revision_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<RevisionTaskId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.workflow.delete_revision_task(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Revision task deleted"))))
}

// ── Phases ───────────────────────────────────────────────────

/// GET /api/deliverables/{id}/phases
pub async fn list_phases(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeliverableId>,
) -> Result<Json<ApiResponse<Vec<WorkflowPhaseWithTasks>>>, ApiError> {
    let phases = state.workflow.list_workflow_phases(&auth, id).await?;
    Ok(Json(ApiResponse::ok(phases)))
}

/// POST /api/deliverables/{id}/phases
pub async fn create_phase(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeliverableId>,
    Json(req): Json<CreatePhaseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WorkflowPhaseWithTasks>>), ApiError> {
    let phase = state.workflow.create_workflow_phase(&auth, id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(phase))))
}

/// PATCH /api/phases/{id}
pub async fn update_phase(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<WorkflowPhaseId>,
    ValidatedJson(body): ValidatedJson<UpdatePhaseBody>,
) -> Result<Json<ApiResponse<WorkflowPhase>>, ApiError> {
    let phase = state
        .workflow
        .update_workflow_phase(&auth, id, body.into())
        .await?;
    Ok(Json(ApiResponse::ok(phase)))
}

/// DELETE /api/phases/{id}
///
/// Removes the phase and its tasks.
pub async fn delete_phase(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<WorkflowPhaseId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.workflow.delete_workflow_phase(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Phase deleted"))))
}

/// POST /api/phases/{id}/tasks
pub async fn add_workflow_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<WorkflowPhaseId>,
    ValidatedJson(req): ValidatedJson<WorkflowTaskRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WorkflowTask>>), ApiError> {
    let task = state.workflow.add_workflow_task(&auth, id, &req.title).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(task))))
}

/// PATCH /api/workflow-tasks/{id}/toggle
pub async fn toggle_workflow_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<WorkflowTaskId>,
) -> Result<Json<ApiResponse<WorkflowTask>>, ApiError> {
    let task = state.workflow.toggle_workflow_task(&auth, id).await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// PATCH /api/workflow-tasks/{id}
pub async fn update_workflow_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<WorkflowTaskId>,
    ValidatedJson(req): ValidatedJson<WorkflowTaskRequest>,
) -> Result<Json<ApiResponse<WorkflowTask>>, ApiError> {
    let task = state
        .workflow
        .update_workflow_task(&auth, id, &req.title)
        .await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// DELETE /api/workflow-tasks/{id}
pub async fn delete_workflow_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<WorkflowTaskId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.workflow.delete_workflow_task(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Workflow task deleted"))))
}
