//! Event handler seam between the dispatch queue and notification delivery.

use async_trait::async_trait;

use studioflow_core::events::DomainEvent;
use studioflow_realtime::NotificationDispatcher;

/// Consumes events drained from a dispatch shard.
///
/// Implementations must not fail: every error is handled (logged) inside.
#[async_trait]
pub trait EventHandler: Send + Sync + std::fmt::Debug {
    /// Handle one event. Called in enqueue order per ordering key.
    async fn handle(&self, event: &DomainEvent);
}

#[async_trait]
impl EventHandler for NotificationDispatcher {
    async fn handle(&self, event: &DomainEvent) {
        self.dispatch(event).await;
    }
}
