use tabula_application::NotificationInbox;
use tabula_domain::Notification;

use super::types::{NotificationInboxResponse, NotificationResponse};

impl From<Notification> for NotificationResponse {
    fn from(value: Notification) -> Self {
        Self {
            id: value.id().to_string(),
            title: value.title().to_owned(),
            message: value.message().to_owned(),
            kind: value.kind().as_str().to_owned(),
            read: value.is_read(),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}

impl From<NotificationInbox> for NotificationInboxResponse {
    fn from(value: NotificationInbox) -> Self {
        Self {
            notifications: value
                .notifications
                .into_iter()
                .map(NotificationResponse::from)
                .collect(),
            unread_count: value.unread_count,
        }
    }
}
