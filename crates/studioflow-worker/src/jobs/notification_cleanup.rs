//! Retention cleanup of read notifications.

use std::sync::Arc;

use chrono::{Duration, Utc};

use studioflow_core::result::AppResult;
use studioflow_database::store::NotificationStore;

/// Deletes read notifications older than the retention window.
#[derive(Debug, Clone)]
pub struct NotificationCleanupJob {
    notifications: Arc<dyn NotificationStore>,
    retention_days: u32,
}

impl NotificationCleanupJob {
    /// Create a new cleanup job
    pub fn new(notifications: Arc<dyn NotificationStore>, retention_days: u32) -> Self {
        Self {
            notifications,
            retention_days,
        }
    }

    /// Run once. Returns the number of rows removed.
    pub async fn run(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::days(i64::from(self.retention_days));
        let removed = self.notifications.delete_read_before(cutoff).await?;
        tracing::info!(
            removed,
            retention_days = self.retention_days,
            "Cleaned up read notifications"
        );
        Ok(removed)
    }
}
