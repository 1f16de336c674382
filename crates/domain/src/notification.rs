//! In-app notifications.

use common::{
    Notification, NotificationChannel, NotificationId, RelatedEntity, UserId, timestamp_now,
};
use store::NotificationStore;

use crate::caller::Caller;
use crate::error::{DomainError, Result};

/// How many notifications a listing returns.
pub const NOTIFICATION_PAGE: usize = 50;

/// A notification to create for a user.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user: UserId,
    pub channel: NotificationChannel,
    pub title: String,
    pub message: String,
    pub related_entity: Option<RelatedEntity>,
}

#[derive(Clone)]
pub struct NotificationService<S> {
    store: S,
}

impl<S: NotificationStore> NotificationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persists a new, unread notification.
    #[tracing::instrument(skip(self, input), fields(user = %input.user, title = %input.title))]
    pub async fn notify(&self, input: NewNotification) -> Result<Notification> {
        let now = timestamp_now();
        let notification = Notification {
            id: NotificationId::new(),
            user: input.user,
            channel: input.channel,
            title: input.title,
            message: input.message,
            is_read: false,
            related_entity: input.related_entity,
            created_at: now,
            updated_at: now,
        };
        Ok(self.store.insert_notification(notification).await?)
    }

    /// The caller's newest notifications.
    #[tracing::instrument(skip(self))]
    pub async fn list_for(&self, caller: &Caller) -> Result<Vec<Notification>> {
        Ok(self
            .store
            .list_notifications(caller.user_id, NOTIFICATION_PAGE)
            .await?)
    }

    /// Marks one notification read. Only its recipient may do so.
    #[tracing::instrument(skip(self))]
    pub async fn mark_read(&self, caller: &Caller, id: NotificationId) -> Result<Notification> {
        let notification = self
            .store
            .get_notification(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Notification", id))?;
        if notification.user != caller.user_id {
            return Err(DomainError::access_denied());
        }
        Ok(self.store.mark_notification_read(id).await?)
    }

    /// Marks all of the caller's unread notifications read.
    #[tracing::instrument(skip(self))]
    pub async fn mark_all_read(&self, caller: &Caller) -> Result<u64> {
        Ok(self.store.mark_all_notifications_read(caller.user_id).await?)
    }
}
