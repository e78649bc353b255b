//! Hand-off point between committed transitions and notification delivery.

use async_trait::async_trait;

use crate::events::DomainEvent;

/// Receives events after the transaction that produced them has committed.
///
/// Implementations must not perform delivery inline: `publish` returns as
/// soon as the events are queued. Events passed in one call share their
/// commit and must be delivered in the given order.
#[async_trait]
pub trait EventSink: Send + Sync + std::fmt::Debug {
    /// Queue the events for background delivery.
    async fn publish(&self, events: Vec<DomainEvent>);
}

/// Sink that discards every event. Used where no delivery is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn publish(&self, events: Vec<DomainEvent>) {
        tracing::debug!(count = events.len(), "Discarding events (no sink wired)");
    }
}
