//! Email delivery of notifications via SMTP.
//!
//! [`SmtpMailer`] wraps the `lettre` async SMTP transport and sends
//! plain-text mail. [`LogMailer`] is wired instead when email is disabled.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use studioflow_core::config::EmailConfig;
use studioflow_core::error::{AppError, ErrorKind};
use studioflow_core::result::AppResult;
use studioflow_core::traits::Mailer;

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        AppError::with_source(ErrorKind::ExternalService, "Email delivery failed", err)
    }
}

/// Sends notification emails through an SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Builds the STARTTLS transport from configuration.
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let from: Mailbox = config
            .from_address
            .parse()
            .map_err(|e| AppError::from(EmailError::Address(e)))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::from(EmailError::Transport(e)))?
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)));

        if !config.smtp_user.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    async fn deliver(
        &self,
        address: &str,
        template: &str,
        data: &serde_json::Value,
    ) -> Result<(), EmailError> {
        let (subject, body) = render(template, data);
        let email = Message::builder()
            .from(self.from.clone())
            .to(address.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.transport.send(email).await?;
        tracing::info!(to = address, template, "Notification email sent");
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_email(
        &self,
        address: &str,
        template: &str,
        data: &serde_json::Value,
    ) -> AppResult<()> {
        self.deliver(address, template, data).await?;
        Ok(())
    }
}

/// Mailer that only logs what it would have sent.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_email(
        &self,
        address: &str,
        template: &str,
        data: &serde_json::Value,
    ) -> AppResult<()> {
        let (subject, _) = render(template, data);
        tracing::debug!(to = address, template, subject, "Email delivery disabled, skipping");
        Ok(())
    }
}

/// Renders subject and plain-text body from the template data.
fn render(template: &str, data: &serde_json::Value) -> (String, String) {
    let field = |key: &str| data.get(key).and_then(|v| v.as_str()).unwrap_or_default();

    let title = field("title");
    let subject = if title.is_empty() {
        format!("[StudioFlow] {template}")
    } else {
        format!("[StudioFlow] {title}")
    };

    let mut body = String::new();
    let name = field("name");
    if !name.is_empty() {
        body.push_str(&format!("Hi {name},\n\n"));
    }
    body.push_str(field("message"));
    let link = field("link");
    if !link.is_empty() {
        body.push_str(&format!("\n\nOpen: {link}"));
    }
    (subject, body)
}
