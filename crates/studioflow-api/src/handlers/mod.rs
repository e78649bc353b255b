//! HTTP request handlers.

pub mod deliverable;
pub mod health;
pub mod notification;
pub mod project;
pub mod workflow;
pub mod ws;
