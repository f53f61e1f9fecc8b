use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tabula_application::ports::NotificationRepository;
use tabula_core::{AppError, AppResult, UserId};
use tabula_domain::{Notification, NotificationId, NotificationKind};

/// PostgreSQL-backed repository for user notifications.
#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    message: String,
    kind: String,
    read: bool,
    created_at: DateTime<Utc>,
}

fn notification_from_row(row: NotificationRow) -> AppResult<Notification> {
    Notification::new(
        NotificationId::from_uuid(row.id),
        UserId::from_uuid(row.user_id),
        row.title,
        row.message,
        NotificationKind::from_str(row.kind.as_str())?,
        row.read,
        row.created_at,
    )
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn create_notification(&self, notification: Notification) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, title, message, kind, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(notification.id().as_uuid())
        .bind(notification.user_id().as_uuid())
        .bind(notification.title())
        .bind(notification.message())
        .bind(notification.kind().as_str())
        .bind(notification.is_read())
        .bind(notification.created_at())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to create notification '{}': {error}",
                notification.id()
            ))
        })?;

        Ok(())
    }

    async fn list_notifications(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> AppResult<Vec<Notification>> {
        let limit = i64::try_from(limit)
            .map_err(|_| AppError::Validation(format!("limit '{limit}' is too large")))?;
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, title, message, kind, read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list notifications of user '{user_id}': {error}"
            ))
        })?;

        rows.into_iter().map(notification_from_row).collect()
    }

    async fn count_unread_notifications(&self, user_id: UserId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM notifications
            WHERE user_id = $1 AND read = FALSE
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to count notifications of user '{user_id}': {error}"
            ))
        })?;

        u64::try_from(count)
            .map_err(|_| AppError::Internal(format!("negative notification count '{count}'")))
    }

    async fn mark_notification_read(
        &self,
        user_id: UserId,
        notification_id: NotificationId,
    ) -> AppResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notifications
            SET read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, message, kind, read, created_at
            "#,
        )
        .bind(notification_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to mark notification '{notification_id}' read: {error}"
            ))
        })?;

        row.map(notification_from_row).transpose()
    }

    async fn mark_all_notifications_read(&self, user_id: UserId) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read = TRUE
            WHERE user_id = $1 AND read = FALSE
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to mark notifications of user '{user_id}' read: {error}"
            ))
        })?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests;
