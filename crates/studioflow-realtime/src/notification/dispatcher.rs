//! Notification dispatcher: persists, pushes, and emails each event.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use studioflow_core::config::EmailConfig;
use studioflow_core::error::AppError;
use studioflow_core::events::{DomainEvent, EventTarget};
use studioflow_core::traits::Mailer;
use studioflow_core::types::UserId;
use studioflow_database::Stores;
use studioflow_entity::notification::{NewNotification, Notification, NotificationKind};

use crate::connection::manager::ConnectionManager;
use crate::message::types::OutboundMessage;

use super::formatter;

/// Failure of one dispatch step. Always logged, never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("failed to resolve recipients: {0}")]
    Recipients(#[source] AppError),
    #[error("failed to persist notifications: {0}")]
    Persist(#[source] AppError),
    #[error("failed to load recipient emails: {0}")]
    Lookup(#[source] AppError),
}

/// What a single dispatch achieved.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    /// Notification rows written.
    pub persisted: Vec<Notification>,
    /// Live messages accepted by connections.
    pub pushed: usize,
    /// Email tasks spawned.
    pub emails_queued: usize,
}

/// Fans each workflow event out to the store, live connections, and email.
#[derive(Debug)]
pub struct NotificationDispatcher {
    stores: Stores,
    connections: Arc<ConnectionManager>,
    mailer: Arc<dyn Mailer>,
    email: EmailConfig,
    /// Caps concurrent email sends.
    email_slots: Arc<Semaphore>,
    email_tasks: TaskTracker,
}

impl NotificationDispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        stores: Stores,
        connections: Arc<ConnectionManager>,
        mailer: Arc<dyn Mailer>,
        email: EmailConfig,
    ) -> Self {
        Self {
            email_slots: Arc::new(Semaphore::new(email.max_concurrent.max(1))),
            email_tasks: TaskTracker::new(),
            stores,
            connections,
            mailer,
            email,
        }
    }

    /// Delivers one event. Failures in any channel are logged and the
    /// remaining channels still run.
    pub async fn dispatch(&self, event: &DomainEvent) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let tag = event.payload.type_tag();

        let recipients = match self.resolve_recipients(event).await {
            Ok(recipients) => recipients,
            Err(e) => {
                warn!(event_id = %event.id, event_type = tag, error = %e, "Dispatch step failed");
                Vec::new()
            }
        };

        match self.persist(event, &recipients).await {
            Ok(rows) => outcome.persisted = rows,
            Err(e) => {
                warn!(event_id = %event.id, event_type = tag, error = %e, "Dispatch step failed");
            }
        }

        for row in &outcome.persisted {
            outcome.pushed += self.connections.send_to_user(
                &row.user_id,
                &OutboundMessage::NotificationNew {
                    notification: row.clone(),
                },
            );
        }

        if let Some(message) = room_message(event) {
            outcome.pushed += self
                .connections
                .broadcast_to_room(event.payload.project_id(), &message);
        }

        match self.queue_emails(event, &outcome.persisted).await {
            Ok(queued) => outcome.emails_queued = queued,
            Err(e) => {
                warn!(event_id = %event.id, event_type = tag, error = %e, "Dispatch step failed");
            }
        }

        debug!(
            event_id = %event.id,
            event_type = tag,
            persisted = outcome.persisted.len(),
            pushed = outcome.pushed,
            emails = outcome.emails_queued,
            "Event dispatched"
        );
        outcome
    }

    /// Waits for every email task spawned so far.
    pub async fn drain_emails(&self) {
        self.email_tasks.close();
        self.email_tasks.wait().await;
        self.email_tasks.reopen();
    }

    async fn resolve_recipients(&self, event: &DomainEvent) -> Result<Vec<UserId>, DispatchError> {
        match event.payload.target() {
            EventTarget::User(user) => Ok(vec![user]),
            EventTarget::Room { project_id, also } => {
                let members = self
                    .stores
                    .rooms
                    .members(project_id)
                    .await
                    .map_err(DispatchError::Recipients)?;
                let recipients: BTreeSet<UserId> = members
                    .into_iter()
                    .chain(also)
                    .filter(|user| Some(*user) != event.actor_id)
                    .collect();
                Ok(recipients.into_iter().collect())
            }
        }
    }

    async fn persist(
        &self,
        event: &DomainEvent,
        recipients: &[UserId],
    ) -> Result<Vec<Notification>, DispatchError> {
        if recipients.is_empty() {
            return Ok(Vec::new());
        }
        let content = formatter::format(&event.payload);
        let kind = NotificationKind::from(&event.payload);
        let rows = recipients
            .iter()
            .map(|user| NewNotification {
                user_id: *user,
                kind,
                title: content.title.clone(),
                message: content.message.clone(),
                link: Some(content.link.clone()),
            })
            .collect();
        self.stores
            .notifications
            .create_many(rows)
            .await
            .map_err(DispatchError::Persist)
    }

    async fn queue_emails(
        &self,
        event: &DomainEvent,
        rows: &[Notification],
    ) -> Result<usize, DispatchError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let ids: Vec<UserId> = rows.iter().map(|row| row.user_id).collect();
        let users = self
            .stores
            .users
            .find_many(&ids)
            .await
            .map_err(DispatchError::Lookup)?;

        let template = event.payload.type_tag().to_lowercase();
        let timeout = Duration::from_secs(self.email.timeout_seconds.max(1));
        let base_url = self.email.app_base_url.trim_end_matches('/');
        let mut queued = 0;

        for row in rows {
            let Some(user) = users.iter().find(|u| u.id == row.user_id) else {
                continue;
            };
            if user.email.trim().is_empty() {
                continue;
            }
            let link = row.link.as_deref().unwrap_or_default();
            let data = serde_json::json!({
                "title": row.title,
                "message": row.message,
                "link": format!("{base_url}{link}"),
                "name": user.name,
            });
            let address = user.email.clone();
            let template = template.clone();
            let mailer = self.mailer.clone();
            let slots = self.email_slots.clone();
            let event_id = event.id;

            self.email_tasks.spawn(async move {
                let Ok(_permit) = slots.acquire_owned().await else {
                    return;
                };
                match tokio::time::timeout(timeout, mailer.send_email(&address, &template, &data))
                    .await
                {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        warn!(%event_id, to = %address, error = %e, "Notification email failed");
                    }
                    Err(_) => {
                        warn!(%event_id, to = %address, "Notification email timed out");
                    }
                }
            });
            queued += 1;
        }
        Ok(queued)
    }
}

/// The typed live message a room event pushes to every joined connection.
fn room_message(event: &DomainEvent) -> Option<OutboundMessage> {
    use studioflow_core::events::WorkflowEvent;

    match &event.payload {
        WorkflowEvent::ProjectUpdated {
            project_id,
            project_title,
            talent_id,
        } => Some(OutboundMessage::ProjectUpdated {
            project_id: *project_id,
            title: project_title.clone(),
            talent_id: *talent_id,
        }),
        WorkflowEvent::ProjectStatusChanged {
            project_id,
            project_title,
            status,
            ..
        } => Some(OutboundMessage::ProjectStatus {
            project_id: *project_id,
            title: project_title.clone(),
            status: status.clone(),
        }),
        _ => None,
    }
}
