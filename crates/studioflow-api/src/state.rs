//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use studioflow_auth::jwt::JwtDecoder;
use studioflow_core::config::AppConfig;
use studioflow_realtime::RealtimeEngine;
use studioflow_service::{DeliverableService, NotificationService, ProjectService, WorkflowService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Realtime ─────────────────────────────────────────────
    /// WebSocket realtime engine
    pub realtime: RealtimeEngine,

    // ── Services ─────────────────────────────────────────────
    /// Project lifecycle
    pub projects: Arc<ProjectService>,
    /// Deliverable CRUD and progress
    pub deliverables: Arc<DeliverableService>,
    /// Assignment, version, feedback and phase transitions
    pub workflow: Arc<WorkflowService>,
    /// Notification inbox
    pub notifications: Arc<NotificationService>,
}
