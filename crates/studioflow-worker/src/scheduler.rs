//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use studioflow_core::error::AppError;

use crate::jobs::NotificationCleanupJob;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler })
    }

    /// Notification retention cleanup on `cron` (six fields, with seconds).
    pub async fn register_notification_cleanup(
        &self,
        job: Arc<NotificationCleanupJob>,
        cron: &str,
    ) -> Result<(), AppError> {
        let schedule = CronJob::new_async(cron, move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                tracing::debug!("Running notification cleanup");
                if let Err(e) = job.run().await {
                    tracing::error!("Notification cleanup failed: {}", e);
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Failed to create notification_cleanup schedule '{}': {}",
                cron, e
            ))
        })?;

        self.scheduler.add(schedule).await.map_err(|e| {
            AppError::internal(format!("Failed to add notification_cleanup schedule: {}", e))
        })?;

        tracing::info!("Registered: notification_cleanup ({})", cron);
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studioflow_database::{MemoryStore, Stores};

    #[tokio::test]
    async fn test_invalid_cron_is_a_configuration_error() {
        let stores = Stores::memory(Arc::new(MemoryStore::new()));
        let job = Arc::new(NotificationCleanupJob::new(stores.notifications, 90));
        let scheduler = CronScheduler::new().await.unwrap();

        let err = scheduler
            .register_notification_cleanup(job, "every tuesday")
            .await
            .unwrap_err();
        assert!(err.is(studioflow_core::error::ErrorKind::Configuration));
    }
}
