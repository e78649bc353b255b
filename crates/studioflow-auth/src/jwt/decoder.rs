//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use studioflow_core::config::AuthConfig;
use studioflow_core::error::AppError;

use super::claims::Claims;

/// Validates HS256-signed access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;
        if !config.jwt_issuer.is_empty() {
            validation.set_issuer(&[config.jwt_issuer.as_str()]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Verifies signature, expiry and issuer, returning the claims.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::authentication("Invalid token format")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AppError::authentication("Unexpected token issuer")
                }
                _ => AppError::authentication(format!("Token validation failed: {e}")),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use studioflow_core::error::ErrorKind;
    use studioflow_core::types::UserId;
    use studioflow_entity::user::UserRole;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_round_trip() {
        let cfg = config("test-secret");
        let user = UserId::new();
        let token = JwtEncoder::new(&cfg)
            .encode(user, "talent@example.com", UserRole::Talent)
            .unwrap();

        let claims = JwtDecoder::new(&cfg).decode(&token).unwrap();
        assert_eq!(claims.user_id(), user);
        assert_eq!(claims.role, UserRole::Talent);
        assert_eq!(claims.email, "talent@example.com");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = JwtEncoder::new(&config("one"))
            .encode(UserId::new(), "a@example.com", UserRole::Client)
            .unwrap();

        let err = JwtDecoder::new(&config("two")).decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = JwtDecoder::new(&config("s")).decode("not.a.jwt").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
