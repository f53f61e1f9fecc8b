use async_trait::async_trait;
use tabula_application::ports::NotificationRepository;
use tabula_core::{AppError, AppResult, UserId};
use tabula_domain::{Notification, NotificationId};

use super::InMemoryRepository;

#[async_trait]
impl NotificationRepository for InMemoryRepository {
    async fn create_notification(&self, notification: Notification) -> AppResult<()> {
        let mut notifications = self.notifications.write().await;
        if notifications
            .iter()
            .any(|stored| stored.id() == notification.id())
        {
            return Err(AppError::Conflict(format!(
                "notification '{}' already exists",
                notification.id()
            )));
        }

        notifications.push(notification);
        Ok(())
    }

    async fn list_notifications(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> AppResult<Vec<Notification>> {
        let mut listed: Vec<Notification> = self
            .notifications
            .read()
            .await
            .iter()
            .rev()
            .filter(|notification| notification.user_id() == user_id)
            .cloned()
            .collect();
        listed.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        listed.truncate(limit);
        Ok(listed)
    }

    async fn count_unread_notifications(&self, user_id: UserId) -> AppResult<u64> {
        let count = self
            .notifications
            .read()
            .await
            .iter()
            .filter(|notification| notification.user_id() == user_id && !notification.is_read())
            .count();
        Ok(count as u64)
    }

    async fn mark_notification_read(
        &self,
        user_id: UserId,
        notification_id: NotificationId,
    ) -> AppResult<Option<Notification>> {
        let mut notifications = self.notifications.write().await;
        let Some(stored) = notifications.iter_mut().find(|notification| {
            notification.id() == notification_id && notification.user_id() == user_id
        }) else {
            return Ok(None);
        };

        *stored = stored.marked_read();
        Ok(Some(stored.clone()))
    }

    async fn mark_all_notifications_read(&self, user_id: UserId) -> AppResult<u64> {
        let mut changed = 0;
        for stored in self.notifications.write().await.iter_mut() {
            if stored.user_id() == user_id && !stored.is_read() {
                *stored = stored.marked_read();
                changed += 1;
            }
        }

        Ok(changed)
    }
}
