//! Reading and managing a user's persisted notifications.

pub mod service;

pub use service::NotificationService;
