//! Project handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use studioflow_core::types::ProjectId;
use studioflow_entity::project::Project;
use studioflow_service::project::{CreateProjectRequest, UpdateProjectRequest};

use crate::dto::request::{ReassignTalentRequest, StatusRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = state.projects.list_projects(&auth).await?;
    Ok(Json(ApiResponse::ok(projects)))
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), ApiError> {
    let project = state.projects.create_project(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(project))))
}

/// GET /api/projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ProjectId>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let project = state.projects.get_project(&auth, id).await?;
    Ok(Json(ApiResponse::ok(project)))
}

/// PATCH /api/projects/{id}
pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ProjectId>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let project = state.projects.update_project(&auth, id, req).await?;
    Ok(Json(ApiResponse::ok(project)))
}

/// PATCH /api/projects/{id}/status
pub async fn update_project_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ProjectId>,
    ValidatedJson(req): ValidatedJson<StatusRequest>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let project = state
        .projects
        .update_project_status(&auth, id, &req.status)
        .await?;
    Ok(Json(ApiResponse::ok(project)))
}

/// PATCH /api/projects/{id}/talent
pub async fn reassign_talent(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ProjectId>,
    ValidatedJson(req): ValidatedJson<ReassignTalentRequest>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let project = state
        .projects
        .reassign_project_talent(&auth, id, req.talent_id)
        .await?;
    Ok(Json(ApiResponse::ok(project)))
}

/// DELETE /api/projects/{id}
pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ProjectId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.projects.delete_project(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Project deleted"))))
}
