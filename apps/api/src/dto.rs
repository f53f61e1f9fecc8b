mod audit;
mod common;
mod dashboard;
mod notifications;
mod rows;
mod sharing;
mod tables;
mod tasks;
mod users;

pub use audit::{AuditDetailResponse, AuditLogEntryResponse};
pub use common::{
    HealthResponse, LanguagePreferenceResponse, MutationResponse, UpdateLanguagePreferenceRequest,
    UserIdentityResponse,
};
pub use dashboard::DashboardResponse;
pub use notifications::{
    MarkAllNotificationsReadResponse, NotificationInboxResponse, NotificationResponse,
};
pub use rows::{
    ExportRowsResponse, ImportRowsRequest, RowDataRequest, RowResponse, UpdateCellRequest,
};
pub use sharing::{ShareTableRequest, TablePermissionResponse};
pub use tables::{
    ColumnDefinitionPayload, CreateTableRequest, TableResponse, UpdateTableRequest,
    UpdateTableSchemaRequest,
};
pub use tasks::{CreateTaskRequest, TaskResponse, UpdateTaskStatusRequest};
pub use users::{
    CapabilityFlagsPayload, UpdateProfileRequest, UpdateUserRoleRequest, UserProfileResponse,
};
