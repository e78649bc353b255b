//! Application builder: wires stores, services, the realtime engine, and
//! background workers into one running unit.

use std::sync::Arc;

use axum::Router;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use studioflow_auth::jwt::JwtDecoder;
use studioflow_core::config::AppConfig;
use studioflow_core::result::AppResult;
use studioflow_core::traits::{EventSink, Mailer};
use studioflow_database::Stores;
use studioflow_realtime::RealtimeEngine;
use studioflow_service::{
    DeliverableService, KeyedLocks, NotificationService, ProjectService, WorkflowService,
};
use studioflow_worker::jobs::NotificationCleanupJob;
use studioflow_worker::{CronScheduler, DispatchQueue, DispatchRunner};

use crate::router::build_router;
use crate::state::AppState;

/// A fully wired StudioFlow instance.
///
/// Owns the background tasks it starts; call [`Application::shutdown`]
/// after the HTTP server has stopped accepting requests.
pub struct Application {
    /// Shared handler state.
    pub state: AppState,
    cancel_tx: watch::Sender<bool>,
    workers: Vec<JoinHandle<()>>,
    heartbeat: JoinHandle<()>,
    scheduler: Option<CronScheduler>,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("workers", &self.workers.len())
            .field("scheduler", &self.scheduler.is_some())
            .finish_non_exhaustive()
    }
}

impl Application {
    /// Builds every subsystem on top of `stores` and starts the
    /// background tasks.
    pub async fn build(
        config: AppConfig,
        stores: Stores,
        mailer: Arc<dyn Mailer>,
    ) -> AppResult<Self> {
        tracing::info!("Starting StudioFlow...");

        // ── Step 1: Auth ─────────────────────────────────────────────
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        // ── Step 2: Realtime engine ──────────────────────────────────
        let realtime = RealtimeEngine::new(
            config.realtime.clone(),
            config.notifications.email.clone(),
            stores.clone(),
            Arc::clone(&jwt_decoder),
            mailer,
        );

        // ── Step 3: Dispatch queue & workers ─────────────────────────
        let (queue, receivers) = DispatchQueue::new(
            config.notifications.dispatch_workers,
            config.notifications.queue_capacity,
        );
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let workers = DispatchRunner::new(realtime.dispatcher.clone()).spawn(receivers, cancel_rx);
        let sink: Arc<dyn EventSink> = Arc::new(queue);
        tracing::info!(workers = workers.len(), "Notification dispatch workers started");

        // ── Step 4: Services ─────────────────────────────────────────
        let locks = Arc::new(KeyedLocks::default());
        let projects = Arc::new(ProjectService::new(
            stores.clone(),
            Arc::clone(&sink),
            Arc::clone(&locks),
        ));
        let deliverables = Arc::new(DeliverableService::new(stores.clone(), Arc::clone(&locks)));
        let workflow = Arc::new(WorkflowService::new(
            stores.clone(),
            Arc::clone(&sink),
            Arc::clone(&locks),
        ));
        let notifications = Arc::new(NotificationService::new(
            stores.notifications.clone(),
            config.notifications.list_limit,
        ));

        // ── Step 5: Heartbeat & scheduled jobs ───────────────────────
        let heartbeat = realtime.spawn_heartbeat();

        let scheduler = if config.worker.enabled {
            let scheduler = CronScheduler::new().await?;
            let cleanup = Arc::new(NotificationCleanupJob::new(
                stores.notifications.clone(),
                config.notifications.retention_days,
            ));
            scheduler
                .register_notification_cleanup(cleanup, &config.worker.notification_cleanup_cron)
                .await?;
            scheduler.start().await?;
            Some(scheduler)
        } else {
            None
        };

        let state = AppState {
            config: Arc::new(config),
            jwt_decoder,
            realtime,
            projects,
            deliverables,
            workflow,
            notifications,
        };

        Ok(Self {
            state,
            cancel_tx,
            workers,
            heartbeat,
            scheduler,
        })
    }

    /// The HTTP router for this instance.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Drains queued events, closes live sockets, waits for in-flight
    /// emails, and stops the scheduler.
    pub async fn shutdown(self) {
        tracing::info!("Shutting down background tasks");

        let _ = self.cancel_tx.send(true);
        for worker in self.workers {
            if let Err(e) = worker.await {
                tracing::error!("Dispatch worker panicked: {}", e);
            }
        }

        self.state.realtime.shutdown().await;
        if let Err(e) = self.heartbeat.await {
            tracing::error!("Heartbeat task panicked: {}", e);
        }

        if let Some(scheduler) = self.scheduler {
            if let Err(e) = scheduler.shutdown().await {
                tracing::warn!("Scheduler shutdown failed: {}", e);
            }
        }

        tracing::info!("Background tasks stopped");
    }
}
