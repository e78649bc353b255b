//! Deliverable domain entities.

pub mod model;
pub mod status;

pub use model::Deliverable;
pub use status::{AcceptanceStatus, DeliverableStatus};
