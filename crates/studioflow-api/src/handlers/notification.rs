//! Notification inbox handlers.

use axum::Json;
use axum::extract::{Path, State};

use studioflow_core::types::NotificationId;
use studioflow_entity::notification::Notification;

use crate::dto::response::{ApiResponse, CountResponse, MarkedResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Notification>>>, ApiError> {
    let notifications = state.notifications.list(&auth).await?;
    Ok(Json(ApiResponse::ok(notifications)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notifications.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.notifications.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Marked as read"))))
}

/// PATCH /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MarkedResponse>>, ApiError> {
    let marked = state.notifications.mark_all_read(&auth).await?;
    Ok(Json(ApiResponse::ok(MarkedResponse { marked })))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.notifications.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Notification deleted"))))
}
