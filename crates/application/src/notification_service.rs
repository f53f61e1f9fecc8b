use std::sync::Arc;

use chrono::Utc;
use tabula_core::{AppError, AppResult, UserId, UserIdentity};
use tabula_domain::{NOTIFICATION_INBOX_LIMIT, Notification, NotificationId, NotificationKind};
use tracing::{info, warn};

use crate::ports::NotificationRepository;

/// Newest notifications of a user together with the unread total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationInbox {
    /// Newest notifications, newest first.
    pub notifications: Vec<Notification>,
    /// Unread notifications across the whole inbox, not only the listed ones.
    pub unread_count: u64,
}

/// Application service for per-user notifications.
#[derive(Clone)]
pub struct NotificationService {
    notification_repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    #[must_use]
    pub fn new(notification_repository: Arc<dyn NotificationRepository>) -> Self {
        Self {
            notification_repository,
        }
    }

    /// Returns the actor's inbox.
    pub async fn list_notifications(&self, actor: &UserIdentity) -> AppResult<NotificationInbox> {
        let notifications = self
            .notification_repository
            .list_notifications(actor.user_id(), NOTIFICATION_INBOX_LIMIT)
            .await?;
        let unread_count = self
            .notification_repository
            .count_unread_notifications(actor.user_id())
            .await?;

        Ok(NotificationInbox {
            notifications,
            unread_count,
        })
    }

    /// Marks one of the actor's notifications as read.
    pub async fn mark_notification_read(
        &self,
        actor: &UserIdentity,
        notification_id: NotificationId,
    ) -> AppResult<Notification> {
        self.notification_repository
            .mark_notification_read(actor.user_id(), notification_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("notification '{notification_id}' does not exist"))
            })
    }

    /// Marks the whole inbox of the actor as read.
    pub async fn mark_all_notifications_read(&self, actor: &UserIdentity) -> AppResult<u64> {
        let changed = self
            .notification_repository
            .mark_all_notifications_read(actor.user_id())
            .await?;

        info!(user_id = %actor.user_id(), changed, "notifications marked read");
        Ok(changed)
    }

    /// Delivers a notification. Delivery is best-effort: failures are logged
    /// and never fail the operation that triggered them.
    pub async fn notify(
        &self,
        user_id: UserId,
        title: &str,
        message: String,
        kind: NotificationKind,
    ) {
        let notification = match Notification::new(
            NotificationId::new(),
            user_id,
            title,
            message,
            kind,
            false,
            Utc::now(),
        ) {
            Ok(notification) => notification,
            Err(error) => {
                warn!(%error, %user_id, "skipping invalid notification");
                return;
            }
        };

        if let Err(error) = self
            .notification_repository
            .create_notification(notification)
            .await
        {
            warn!(%error, %user_id, title, "notification delivery failed");
        }
    }
}
