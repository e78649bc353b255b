//! Email boundary.

use async_trait::async_trait;

use crate::result::AppResult;

/// Sends templated email.
///
/// Callers treat every error as non-fatal; the trait still reports them so
/// they can be logged with context.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    /// Send `template` rendered with `data` to `address`.
    async fn send_email(
        &self,
        address: &str,
        template: &str,
        data: &serde_json::Value,
    ) -> AppResult<()>;
}
