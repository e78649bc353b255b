//! # studioflow-api
//!
//! HTTP API layer for StudioFlow built on Axum.
//!
//! Provides the REST endpoints for projects, deliverables, versions,
//! feedback, workflow phases and notifications, the WebSocket upgrade,
//! middleware (CORS, request logging), extractors, DTOs, and error mapping.
//! [`Application`] wires every crate together around a store bundle.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::Application;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
