//! Feedback and revision-task entities.

pub mod model;
pub mod task;

pub use model::{Feedback, FeedbackType, FeedbackWithTasks};
pub use task::RevisionTask;
