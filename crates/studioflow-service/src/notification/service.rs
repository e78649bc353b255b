//! Notification inbox operations. Rows are only ever created by the
//! dispatcher; users can read, mark, and delete their own.

use std::sync::Arc;

use tracing::info;

use studioflow_core::error::AppError;
use studioflow_core::types::NotificationId;
use studioflow_database::store::NotificationStore;
use studioflow_entity::notification::Notification;

use crate::context::RequestContext;

/// Manages the actor's notification inbox.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification store.
    store: Arc<dyn NotificationStore>,
    /// Maximum rows returned by `list`.
    list_limit: i64,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>, list_limit: i64) -> Self {
        Self {
            store,
            list_limit: list_limit.max(1),
        }
    }

    /// Lists the actor's notifications, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<Notification>, AppError> {
        self.store.list_for_user(ctx.user_id, self.list_limit).await
    }

    /// Counts unread notifications.
    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<i64, AppError> {
        self.store.count_unread(ctx.user_id).await
    }

    /// Marks one notification read. Someone else's notification is
    /// reported as not found.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: NotificationId,
    ) -> Result<(), AppError> {
        if !self.store.mark_read(notification_id, ctx.user_id).await? {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    /// Marks all of the actor's notifications read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        let count = self.store.mark_all_read(ctx.user_id).await?;
        info!(user_id = %ctx.user_id, count, "Marked all notifications read");
        Ok(count)
    }

    /// Deletes one of the actor's notifications.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        notification_id: NotificationId,
    ) -> Result<(), AppError> {
        if !self.store.delete(notification_id, ctx.user_id).await? {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studioflow_core::error::ErrorKind;
    use studioflow_core::types::UserId;
    use studioflow_database::MemoryStore;
    use studioflow_entity::notification::{NewNotification, NotificationKind};
    use studioflow_entity::user::UserRole;

    fn row(user: UserId, n: usize) -> NewNotification {
        NewNotification {
            user_id: user,
            kind: NotificationKind::VersionUploaded,
            title: format!("Version {n}"),
            message: "A new version is ready".into(),
            link: None,
        }
    }

    #[tokio::test]
    async fn test_list_is_limited_and_counts_unread() {
        let store = Arc::new(MemoryStore::new());
        let owner = RequestContext::new(UserId::new(), UserRole::Client);
        store
            .create_many((0..5).map(|n| row(owner.user_id, n)).collect())
            .await
            .unwrap();

        let service = NotificationService::new(store, 3);
        assert_eq!(service.list(&owner).await.unwrap().len(), 3);
        assert_eq!(service.unread_count(&owner).await.unwrap(), 5);
        assert_eq!(service.mark_all_read(&owner).await.unwrap(), 5);
        assert_eq!(service.unread_count(&owner).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cannot_touch_someone_elses_notification() {
        let store = Arc::new(MemoryStore::new());
        let owner = UserId::new();
        let created = store.create_many(vec![row(owner, 0)]).await.unwrap();
        let service = NotificationService::new(store, 50);

        let intruder = RequestContext::new(UserId::new(), UserRole::Talent);
        let err = service.mark_read(&intruder, created[0].id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = service.delete(&intruder, created[0].id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
