//! Deliverable CRUD and progress.

pub mod service;

pub use service::{CreateDeliverableRequest, DeliverableService, UpdateDeliverableRequest};
