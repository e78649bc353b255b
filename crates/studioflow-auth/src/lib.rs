//! # studioflow-auth
//!
//! Signed-identity verification for StudioFlow. Tokens are issued by an
//! external identity service; this crate verifies them for the HTTP API
//! and the WebSocket handshake, and can mint them for tooling and tests.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
