//! Dispatch runner: one worker task per queue shard.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use studioflow_core::events::DomainEvent;

use crate::executor::EventHandler;

/// Drains dispatch shards and hands each event to the handler.
#[derive(Debug, Clone)]
pub struct DispatchRunner {
    handler: Arc<dyn EventHandler>,
}

impl DispatchRunner {
    /// Create a new runner.
    pub fn new(handler: Arc<dyn EventHandler>) -> Self {
        Self { handler }
    }

    /// Spawn one worker per shard receiver. Workers stop when `cancel`
    /// flips to `true` (after draining what is already queued) or when
    /// every sender is dropped.
    pub fn spawn(
        &self,
        receivers: Vec<mpsc::Receiver<DomainEvent>>,
        cancel: watch::Receiver<bool>,
    ) -> Vec<JoinHandle<()>> {
        receivers
            .into_iter()
            .enumerate()
            .map(|(shard, rx)| {
                let handler = Arc::clone(&self.handler);
                tokio::spawn(run_shard(shard, handler, rx, cancel.clone()))
            })
            .collect()
    }
}

async fn run_shard(
    shard: usize,
    handler: Arc<dyn EventHandler>,
    mut rx: mpsc::Receiver<DomainEvent>,
    mut cancel: watch::Receiver<bool>,
) {
    tracing::info!(shard, "Dispatch worker started");

    loop {
        tokio::select! {
            biased;
            event = rx.recv() => match event {
                Some(event) => handler.handle(&event).await,
                None => break,
            },
            changed = cancel.changed() => {
                if changed.is_err() {
                    // Nobody can cancel any more; run until the senders are gone.
                    while let Some(event) = rx.recv().await {
                        handler.handle(&event).await;
                    }
                    break;
                }
                if *cancel.borrow() {
                    tracing::info!(shard, "Dispatch worker received shutdown signal");
                    rx.close();
                    while let Some(event) = rx.recv().await {
                        handler.handle(&event).await;
                    }
                    break;
                }
            }
        }
    }

    tracing::info!(shard, "Dispatch worker stopped");
}
