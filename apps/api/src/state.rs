use tabula_application::{
    AuditService, AuthorizationService, DashboardService, NotificationService, RowService,
    SharingService, TableService, TaskService, UserAdminService,
};
use tabula_domain::Language;
use tabula_infrastructure::BroadcastChangeFeed;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub table_service: TableService,
    pub row_service: RowService,
    pub sharing_service: SharingService,
    pub user_admin_service: UserAdminService,
    pub task_service: TaskService,
    pub audit_service: AuditService,
    pub notification_service: NotificationService,
    pub dashboard_service: DashboardService,
    pub authorization_service: AuthorizationService,
    pub change_feed: BroadcastChangeFeed,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub bootstrap_admin_email: Option<String>,
    pub default_language: Language,
}
