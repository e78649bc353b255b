//! Scheduled job implementations.

pub mod notification_cleanup;

pub use notification_cleanup::NotificationCleanupJob;
