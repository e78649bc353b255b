//! JWT token creation.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

use studioflow_core::config::AuthConfig;
use studioflow_core::error::AppError;
use studioflow_core::types::UserId;
use studioflow_entity::user::UserRole;

use super::claims::Claims;

/// Mints HS256 access tokens with the configured TTL and issuer.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    issuer: Option<String>,
    ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: (!config.jwt_issuer.is_empty()).then(|| config.jwt_issuer.clone()),
            ttl_minutes: config.jwt_access_ttl_minutes as i64,
        }
    }

    /// Issues an access token for the given identity.
    pub fn encode(&self, user: UserId, email: &str, role: UserRole) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.into_uuid(),
            email: email.to_string(),
            role,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::minutes(self.ttl_minutes)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))
    }
}
