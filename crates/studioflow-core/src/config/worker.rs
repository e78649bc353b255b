//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled maintenance job configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether scheduled jobs run in this process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression (with seconds) for notification retention cleanup.
    #[serde(default = "default_cleanup_cron")]
    pub notification_cleanup_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            notification_cleanup_cron: default_cleanup_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cleanup_cron() -> String {
    "0 30 3 * * *".to_string()
}
