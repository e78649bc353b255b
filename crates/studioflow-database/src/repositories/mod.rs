//! PostgreSQL implementations of the store traits.

pub mod deliverable;
pub mod feedback;
pub mod notification;
pub mod project;
pub mod room;
pub mod user;
pub mod version;
pub mod workflow;

pub use deliverable::DeliverableRepository;
pub use feedback::FeedbackRepository;
pub use notification::NotificationRepository;
pub use project::ProjectRepository;
pub use room::RoomRepository;
pub use user::UserRepository;
pub use version::VersionRepository;
pub use workflow::WorkflowRepository;

use studioflow_core::error::{AppError, ErrorKind};

/// Wraps a sqlx error as a `Database` error with context.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}
