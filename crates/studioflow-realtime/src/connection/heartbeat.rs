//! Periodic sweep that drops connections which stopped talking.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use super::manager::ConnectionManager;

/// Heartbeat configuration.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between sweeps.
    pub sweep_interval: Duration,
    /// Silence after which a connection is considered dead.
    pub timeout: Duration,
}

impl HeartbeatConfig {
    /// Builds the heartbeat settings from the realtime configuration.
    pub fn from_realtime(config: &studioflow_core::config::RealtimeConfig) -> Self {
        Self {
            sweep_interval: Duration::from_secs(config.heartbeat_interval_seconds.max(1)),
            timeout: Duration::from_secs(config.heartbeat_timeout_seconds),
        }
    }
}

/// Run the heartbeat sweep until `shutdown` fires.
pub async fn run_heartbeat(
    manager: Arc<ConnectionManager>,
    config: HeartbeatConfig,
    mut shutdown: broadcast::Receiver<()>,
) {
    let timeout = chrono::Duration::from_std(config.timeout)
        .unwrap_or_else(|_| chrono::Duration::seconds(90));
    let mut interval = time::interval(config.sweep_interval);
    interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let pruned = manager.prune_stale(timeout);
                if pruned > 0 {
                    tracing::info!(pruned, "Heartbeat sweep removed stale connections");
                }
            }
            _ = shutdown.recv() => break,
        }
    }

    tracing::debug!("Heartbeat loop ended");
}
