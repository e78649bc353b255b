//! WebSocket admission: validates the JWT presented at upgrade time.

use std::sync::Arc;

use studioflow_auth::jwt::JwtDecoder;
use studioflow_core::error::AppError;
use studioflow_core::types::UserId;
use studioflow_entity::user::UserRole;

/// Identity established for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedConnection {
    pub user_id: UserId,
    pub role: UserRole,
}

/// Authenticates WebSocket connections using JWT tokens.
#[derive(Debug, Clone)]
pub struct WsAuthenticator {
    decoder: Arc<JwtDecoder>,
}

impl WsAuthenticator {
    /// Creates a new WebSocket authenticator.
    pub fn new(decoder: Arc<JwtDecoder>) -> Self {
        Self { decoder }
    }

    /// Verifies `token` and returns the connecting identity.
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedConnection, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::authentication("Missing token"));
        }
        let claims = self.decoder.decode(token)?;
        Ok(AuthenticatedConnection {
            user_id: claims.user_id(),
            role: claims.role,
        })
    }
}
