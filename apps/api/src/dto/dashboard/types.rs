use serde::Serialize;
use ts_rs::TS;

use crate::dto::AuditLogEntryResponse;

/// Landing page counters and the latest audit activity.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/dashboard-response.ts"
)]
pub struct DashboardResponse {
    #[ts(type = "number")]
    pub tables_count: u64,
    #[ts(type = "number")]
    pub tasks_count: u64,
    #[ts(type = "number")]
    pub completed_tasks_count: u64,
    /// Empty unless the user may view audit logs.
    pub recent_audit_logs: Vec<AuditLogEntryResponse>,
}
