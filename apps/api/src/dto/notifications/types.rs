use serde::Serialize;
use ts_rs::TS;

/// API representation of one notification.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/notification-response.ts"
)]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    pub message: String,
    #[ts(type = "\"info\" | \"success\" | \"warning\" | \"error\"")]
    pub kind: String,
    pub read: bool,
    pub created_at: String,
}

/// The newest notifications of the session user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/notification-inbox-response.ts"
)]
pub struct NotificationInboxResponse {
    pub notifications: Vec<NotificationResponse>,
    /// Unread total across the whole inbox.
    #[ts(type = "number")]
    pub unread_count: u64,
}

/// Result of marking the whole inbox read.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/mark-all-notifications-read-response.ts"
)]
pub struct MarkAllNotificationsReadResponse {
    #[ts(type = "number")]
    pub updated: u64,
}
