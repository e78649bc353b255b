//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::info;

use studioflow_auth::jwt::JwtDecoder;
use studioflow_core::config::{EmailConfig, RealtimeConfig};
use studioflow_core::traits::Mailer;
use studioflow_database::Stores;

use crate::channel::registry::RoomRegistry;
use crate::connection::authenticator::WsAuthenticator;
use crate::connection::heartbeat::{self, HeartbeatConfig};
use crate::connection::manager::ConnectionManager;
use crate::notification::dispatcher::NotificationDispatcher;

/// Central real-time engine that coordinates the WebSocket subsystems.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Project rooms.
    pub rooms: Arc<RoomRegistry>,
    /// Notification dispatcher.
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Admission check for new sockets.
    pub authenticator: WsAuthenticator,
    config: RealtimeConfig,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.connections.connection_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(
        config: RealtimeConfig,
        email: EmailConfig,
        stores: Stores,
        decoder: Arc<JwtDecoder>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let rooms = Arc::new(RoomRegistry::new());
        let connections = Arc::new(ConnectionManager::new(
            config.clone(),
            rooms.clone(),
            stores.clone(),
        ));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            stores,
            connections.clone(),
            mailer,
            email,
        ));

        info!("Real-time engine initialized");

        Self {
            connections,
            rooms,
            dispatcher,
            authenticator: WsAuthenticator::new(decoder),
            config,
            shutdown_tx,
        }
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Starts the heartbeat sweep. It stops on [`RealtimeEngine::shutdown`].
    pub fn spawn_heartbeat(&self) -> JoinHandle<()> {
        tokio::spawn(heartbeat::run_heartbeat(
            self.connections.clone(),
            HeartbeatConfig::from_realtime(&self.config),
            self.shutdown_receiver(),
        ))
    }

    /// Initiates a graceful shutdown of the real-time engine.
    pub async fn shutdown(&self) {
        info!("Shutting down real-time engine");

        let _ = self.shutdown_tx.send(());
        self.connections.close_all();
        self.dispatcher.drain_emails().await;

        info!("Real-time engine shut down");
    }
}
