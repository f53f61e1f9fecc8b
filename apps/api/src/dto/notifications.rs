mod conversions;
mod types;

pub use types::{MarkAllNotificationsReadResponse, NotificationInboxResponse, NotificationResponse};
