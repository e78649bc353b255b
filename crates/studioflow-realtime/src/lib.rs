//! # studioflow-realtime
//!
//! Live side of StudioFlow:
//!
//! - WebSocket connection registry with JWT-authenticated admission
//! - Per-project rooms joined and left explicitly by connections
//! - Notification dispatcher that persists, pushes, and emails each
//!   workflow event without ever failing its caller

pub mod channel;
pub mod connection;
pub mod message;
pub mod notification;
pub mod server;

pub use channel::registry::RoomRegistry;
pub use connection::authenticator::{AuthenticatedConnection, WsAuthenticator};
pub use connection::manager::ConnectionManager;
pub use notification::dispatcher::{DispatchOutcome, NotificationDispatcher};
pub use notification::email::{LogMailer, SmtpMailer};
pub use server::RealtimeEngine;
