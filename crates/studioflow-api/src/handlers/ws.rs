//! WebSocket upgrade handler.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use studioflow_realtime::AuthenticatedConnection;
use studioflow_realtime::connection::handle::ConnectionHandle;
use studioflow_realtime::message::OutboundMessage;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    #[serde(default)]
    pub token: Option<String>,
}

/// GET /ws?token={jwt} — WebSocket upgrade
///
/// The token is checked before the upgrade so a bad token is a plain 401.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ApiError> {
    let identity = state
        .realtime
        .authenticator
        .authenticate(query.token.as_deref().unwrap_or_default())?;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, identity, socket)))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(
    state: AppState,
    identity: AuthenticatedConnection,
    socket: WebSocket,
) {
    let connections = state.realtime.connections.clone();
    let (handle, outbound_rx) = connections.register(&identity);
    let conn_id = handle.id;

    info!(
        conn_id = %conn_id,
        user_id = %identity.user_id,
        "WebSocket connection established"
    );

    let ping_every = Duration::from_secs(connections.config().heartbeat_interval_seconds.max(1));
    let (ws_tx, mut ws_rx) = socket.split();
    let writer = tokio::spawn(forward_outbound(
        handle.clone(),
        outbound_rx,
        ws_tx,
        ping_every,
    ));

    loop {
        tokio::select! {
            _ = handle.closed() => break,
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    handle.touch();
                    connections.handle_inbound(&conn_id, text.as_str()).await;
                }
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => handle.touch(),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(Message::Binary(_))) => {
                    debug!(conn_id = %conn_id, "Ignoring binary frame");
                }
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    }

    connections.unregister(&conn_id);
    writer.abort();

    info!(
        conn_id = %conn_id,
        user_id = %identity.user_id,
        "WebSocket connection closed"
    );
}

/// Drains the connection's outbound queue into the socket until either
/// side goes away.
///
/// A protocol ping goes out every `ping_every`; the client's pong is what
/// keeps a listen-only connection ahead of the heartbeat sweep.
async fn forward_outbound<S>(
    handle: Arc<ConnectionHandle>,
    mut outbound_rx: mpsc::Receiver<OutboundMessage>,
    mut ws_tx: S,
    ping_every: Duration,
) where
    S: Sink<Message> + Unpin,
{
    let mut ping = time::interval_at(Instant::now() + ping_every, ping_every);
    ping.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    loop {
        let msg = tokio::select! {
            _ = handle.closed() => break,
            _ = ping.tick() => {
                if ws_tx.send(Message::Ping(Default::default())).await.is_err() {
                    handle.close();
                    break;
                }
                continue;
            }
            msg = outbound_rx.recv() => match msg {
                Some(msg) => msg,
                None => break,
            },
        };

        let text = match serde_json::to_string(&msg) {
            Ok(text) => text,
            Err(e) => {
                warn!(conn_id = %handle.id, error = %e, "Failed to serialize outbound message");
                continue;
            }
        };

        if ws_tx.send(Message::Text(text.into())).await.is_err() {
            handle.close();
            break;
        }
    }

    let _ = ws_tx.close().await;
}
