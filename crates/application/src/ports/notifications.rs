use async_trait::async_trait;
use tabula_core::{AppResult, UserId};
use tabula_domain::{Notification, NotificationId};

/// Repository port for user notifications.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Stores a new notification.
    async fn create_notification(&self, notification: Notification) -> AppResult<()>;

    /// Lists a user's newest notifications, newest first.
    async fn list_notifications(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> AppResult<Vec<Notification>>;

    /// Counts a user's unread notifications.
    async fn count_unread_notifications(&self, user_id: UserId) -> AppResult<u64>;

    /// Marks one of the user's notifications as read. Returns `None` when the
    /// user has no notification with that id.
    async fn mark_notification_read(
        &self,
        user_id: UserId,
        notification_id: NotificationId,
    ) -> AppResult<Option<Notification>>;

    /// Marks every unread notification of the user as read and returns how
    /// many changed.
    async fn mark_all_notifications_read(&self, user_id: UserId) -> AppResult<u64>;
}
