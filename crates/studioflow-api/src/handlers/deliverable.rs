//! Deliverable handlers: CRUD, progress, and talent assignment.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use studioflow_core::types::{DeliverableId, ProjectId};
use studioflow_entity::deliverable::Deliverable;
use studioflow_service::deliverable::CreateDeliverableRequest;

use crate::dto::request::{
    AssignTalentRequest, RejectAssignmentRequest, UpdateDeliverableBody, UpdateProgressRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/projects/{id}/deliverables
///
/// Talent only see deliverables assigned to them.
pub async fn list_deliverables(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<ApiResponse<Vec<Deliverable>>>, ApiError> {
    let deliverables = state
        .deliverables
        .list_visible_deliverables(&auth, project_id)
        .await?;
    Ok(Json(ApiResponse::ok(deliverables)))
}

/// POST /api/projects/{id}/deliverables
pub async fn create_deliverable(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<ProjectId>,
    Json(req): Json<CreateDeliverableRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Deliverable>>), ApiError> {
    let deliverable = state
        .deliverables
        .create_deliverable(&auth, project_id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(deliverable))))
}

/// GET /api/deliverables/{id}
pub async fn get_deliverable(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeliverableId>,
) -> Result<Json<ApiResponse<Deliverable>>, ApiError> {
    let deliverable = state.deliverables.get_deliverable(&auth, id).await?;
    Ok(Json(ApiResponse::ok(deliverable)))
}

/// PATCH /api/deliverables/{id}/progress
pub async fn update_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeliverableId>,
    ValidatedJson(req): ValidatedJson<UpdateProgressRequest>,
) -> Result<Json<ApiResponse<Deliverable>>, ApiError> {
    let deliverable = state
        .deliverables
        .update_progress(&auth, id, req.progress, req.status.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(deliverable)))
}

/// PATCH /api/deliverables/{id}
pub async fn update_deliverable(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeliverableId>,
    ValidatedJson(body): ValidatedJson<UpdateDeliverableBody>,
) -> Result<Json<ApiResponse<Deliverable>>, ApiError> {
    let deliverable = state
        .deliverables
        .update_deliverable(&auth, id, body.into())
        .await?;
    Ok(Json(ApiResponse::ok(deliverable)))
}

/// DELETE /api/deliverables/{id}
pub async fn delete_deliverable(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeliverableId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.deliverables.delete_deliverable(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Deliverable deleted"))))
}

/// PATCH /api/deliverables/{id}/assign
pub async fn assign_talent(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeliverableId>,
    ValidatedJson(req): ValidatedJson<AssignTalentRequest>,
) -> Result<Json<ApiResponse<Deliverable>>, ApiError> {
    let deliverable = state.workflow.assign_talent(&auth, id, req.talent_id).await?;
    Ok(Json(ApiResponse::ok(deliverable)))
}

/// POST /api/deliverables/{id}/accept
pub async fn accept_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeliverableId>,
) -> Result<Json<ApiResponse<Deliverable>>, ApiError> {
    let deliverable = state.workflow.accept_assignment(&auth, id).await?;
    Ok(Json(ApiResponse::ok(deliverable)))
}

/// POST /api/deliverables/{id}/reject
pub async fn reject_assignment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeliverableId>,
    ValidatedJson(req): ValidatedJson<RejectAssignmentRequest>,
) -> Result<Json<ApiResponse<Deliverable>>, ApiError> {
    let deliverable = state
        .workflow
        .reject_assignment(&auth, id, req.reason)
        .await?;
    Ok(Json(ApiResponse::ok(deliverable)))
}
