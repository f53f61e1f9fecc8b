//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_service;
mod authorization_service;
mod dashboard_service;
mod notification_service;
pub mod ports;
mod row_service;
mod sharing_service;
mod table_service;
mod task_service;
mod user_admin_service;

#[cfg(test)]
mod test_support;

pub use audit_service::{
    AUDIT_LOG_FEED_TABLE, AUDIT_LOG_MAX_LIMIT, AuditDetail, AuditFeed, AuditLogRequest,
    AuditLogView, AuditRecorder, AuditService,
};
pub use authorization_service::AuthorizationService;
pub use dashboard_service::{DASHBOARD_RECENT_AUDIT_LIMIT, DashboardService, DashboardSummary};
pub use notification_service::{NotificationInbox, NotificationService};
pub use row_service::{ExportRecord, ImportRecord, RowService};
pub use sharing_service::SharingService;
pub use table_service::TableService;
pub use task_service::TaskService;
pub use user_admin_service::{FULL_NAME_MIN_LENGTH, UserAdminService};
