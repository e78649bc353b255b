//! # studioflow-entity
//!
//! Domain entity models for StudioFlow. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod deliverable;
pub mod feedback;
pub mod notification;
pub mod project;
pub mod room;
pub mod user;
pub mod version;
pub mod workflow;
