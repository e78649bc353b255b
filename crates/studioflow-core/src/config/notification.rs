//! Notification persistence, dispatch, and email configuration.

use serde::{Deserialize, Serialize};

/// Notification fan-out settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Maximum notifications returned by a list call.
    #[serde(default = "default_list_limit")]
    pub list_limit: i64,
    /// Read notifications older than this are removed by the cleanup job.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Number of dispatch workers (queue shards).
    #[serde(default = "default_dispatch_workers")]
    pub dispatch_workers: usize,
    /// Capacity of each dispatch shard. Enqueueing waits when it is full.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Outbound email settings.
    #[serde(default)]
    pub email: EmailConfig,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            list_limit: default_list_limit(),
            retention_days: default_retention_days(),
            dispatch_workers: default_dispatch_workers(),
            queue_capacity: default_queue_capacity(),
            email: EmailConfig::default(),
        }
    }
}

/// SMTP delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// When disabled, emails are logged instead of sent.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay host.
    #[serde(default)]
    pub smtp_host: String,
    /// SMTP relay port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username. Empty means no authentication.
    #[serde(default)]
    pub smtp_user: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// `From` header address.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Per-message timeout in seconds. Exceeding it counts as a failure.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Maximum emails in flight at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Base URL used to turn notification links into absolute URLs.
    #[serde(default = "default_app_url")]
    pub app_base_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_address: default_from_address(),
            timeout_seconds: default_timeout(),
            max_concurrent: default_max_concurrent(),
            app_base_url: default_app_url(),
        }
    }
}

fn default_list_limit() -> i64 {
    50
}

fn default_retention_days() -> u32 {
    90
}

fn default_dispatch_workers() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "StudioFlow <noreply@studioflow.local>".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_max_concurrent() -> usize {
    8
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}
