//! Bounded, sharded queue of committed workflow events.

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use studioflow_core::error::AppError;
use studioflow_core::events::DomainEvent;
use studioflow_core::traits::EventSink;

/// Hands events to background workers, one FIFO shard per worker.
///
/// Events sharing an ordering key always land on the same shard, so a
/// single worker observes them in the order they were enqueued.
#[derive(Debug, Clone)]
pub struct DispatchQueue {
    shards: Vec<mpsc::Sender<DomainEvent>>,
}

impl DispatchQueue {
    /// Creates `workers` shards of `capacity` events each and returns the
    /// receivers the runner drains.
    pub fn new(workers: usize, capacity: usize) -> (Self, Vec<mpsc::Receiver<DomainEvent>>) {
        let (shards, receivers) = (0..workers.max(1))
            .map(|_| mpsc::channel(capacity.max(1)))
            .unzip();
        (Self { shards }, receivers)
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Shard index for an ordering key.
    pub fn shard_for(&self, key: Uuid) -> usize {
        (key.as_u128() % self.shards.len() as u128) as usize
    }

    /// Queues one event, waiting while its shard is full.
    pub async fn enqueue(&self, event: DomainEvent) -> Result<(), AppError> {
        let shard = self.shard_for(event.ordering_key());
        self.shards[shard]
            .send(event)
            .await
            .map_err(|e| {
                AppError::dispatch_failure(format!(
                    "Dispatch queue closed, dropping {} event",
                    e.0.payload.type_tag()
                ))
            })
    }
}

#[async_trait]
impl EventSink for DispatchQueue {
    async fn publish(&self, events: Vec<DomainEvent>) {
        for event in events {
            let event_id = event.id;
            if let Err(e) = self.enqueue(event).await {
                tracing::warn!(%event_id, error = %e, "Event not queued for delivery");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studioflow_core::events::WorkflowEvent;
    use studioflow_core::types::{ProjectId, UserId};

    fn status_event(project: ProjectId, status: &str) -> DomainEvent {
        DomainEvent::new(
            Some(UserId::new()),
            WorkflowEvent::ProjectStatusChanged {
                project_id: project,
                project_title: "Launch".into(),
                status: status.into(),
                talent_id: None,
            },
        )
    }

    #[tokio::test]
    async fn test_same_key_lands_on_one_shard_in_order() {
        let (queue, mut receivers) = DispatchQueue::new(4, 8);
        let project = ProjectId::new();
        queue
            .publish(vec![
                status_event(project, "MATCHING"),
                status_event(project, "IN_PROGRESS"),
                status_event(project, "REVIEW"),
            ])
            .await;

        let shard = queue.shard_for(project.into_uuid());
        let rx = &mut receivers[shard];
        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let WorkflowEvent::ProjectStatusChanged { status, .. } = event.payload {
                seen.push(status);
            }
        }
        assert_eq!(seen, ["MATCHING", "IN_PROGRESS", "REVIEW"]);
    }

    #[tokio::test]
    async fn test_closed_queue_reports_dispatch_failure() {
        let (queue, receivers) = DispatchQueue::new(1, 1);
        drop(receivers);
        let err = queue
            .enqueue(status_event(ProjectId::new(), "REVIEW"))
            .await
            .unwrap_err();
        assert!(err.is(studioflow_core::error::ErrorKind::DispatchFailure));
    }
}
