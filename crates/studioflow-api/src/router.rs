//! Route definitions for the StudioFlow HTTP API.
//!
//! All REST routes are mounted under `/api`; the WebSocket upgrade lives
//! at `/ws`. The router receives `AppState` and passes it to all handlers
//! via Axum's `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(project_routes())
        .merge(deliverable_routes())
        .merge(version_routes())
        .merge(feedback_routes())
        .merge(phase_routes())
        .merge(notification_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_handler));

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Project endpoints
fn project_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects",
            get(handlers::project::list_projects).post(handlers::project::create_project),
        )
        .route(
            "/projects/{id}",
            get(handlers::project::get_project)
                .patch(handlers::project::update_project)
                .delete(handlers::project::delete_project),
        )
        .route(
            "/projects/{id}/status",
            patch(handlers::project::update_project_status),
        )
        .route(
            "/projects/{id}/talent",
            patch(handlers::project::reassign_talent),
        )
}

/// Deliverable CRUD and assignment endpoints
fn deliverable_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{id}/deliverables",
            get(handlers::deliverable::list_deliverables)
                .post(handlers::deliverable::create_deliverable),
        )
        .route(
            "/deliverables/{id}",
            get(handlers::deliverable::get_deliverable)
                .patch(handlers::deliverable::update_deliverable)
                .delete(handlers::deliverable::delete_deliverable),
        )
        .route(
            "/deliverables/{id}/progress",
            patch(handlers::deliverable::update_progress),
        )
        .route(
            "/deliverables/{id}/assign",
            patch(handlers::deliverable::assign_talent),
        )
        .route(
            "/deliverables/{id}/accept",
            post(handlers::deliverable::accept_assignment),
        )
        .route(
            "/deliverables/{id}/reject",
            post(handlers::deliverable::reject_assignment),
        )
}

/// Version endpoints
fn version_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/deliverables/{id}/versions",
            get(handlers::workflow::list_versions).post(handlers::workflow::add_version),
        )
        .route(
            "/versions/{id}",
            patch(handlers::workflow::update_version).delete(handlers::workflow::delete_version),
        )
        .route(
            "/versions/{id}/status",
            patch(handlers::workflow::set_version_status),
        )
}

/// Feedback and revision task endpoints
fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/versions/{id}/feedback",
            get(handlers::workflow::list_feedback).post(handlers::workflow::add_feedback),
        )
        .route(
            "/feedback/{id}",
            delete(handlers::workflow::delete_feedback),
        )
        .route(
            "/feedback/{id}/tasks",
            post(handlers::workflow::add_revision_task),
        )
        .route(
            "/revision-tasks/{id}/toggle",
            patch(handlers::workflow::toggle_revision_task),
        )
        .route(
            "/revision-tasks/{id}",
            delete(handlers::workflow::delete_revision_task),
        )
}

/// Workflow phase endpoints
fn phase_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/deliverables/{id}/phases",
            get(handlers::workflow::list_phases).post(handlers::workflow::create_phase),
        )
        .route(
            "/phases/{id}",
            patch(handlers::workflow::update_phase).delete(handlers::workflow::delete_phase),
        )
        .route(
            "/phases/{id}/tasks",
            post(handlers::workflow::add_workflow_task),
        )
        .route(
            "/workflow-tasks/{id}/toggle",
            patch(handlers::workflow::toggle_workflow_task),
        )
        .route(
            "/workflow-tasks/{id}",
            patch(handlers::workflow::update_workflow_task)
                .delete(handlers::workflow::delete_workflow_task),
        )
}

/// Notification endpoints
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            patch(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::notification::mark_read),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete_notification),
        )
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
