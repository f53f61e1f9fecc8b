use tabula_application::DashboardSummary;

use super::types::DashboardResponse;
use crate::dto::AuditLogEntryResponse;

impl From<DashboardSummary> for DashboardResponse {
    fn from(value: DashboardSummary) -> Self {
        Self {
            tables_count: value.tables_count,
            tasks_count: value.tasks_count,
            completed_tasks_count: value.completed_tasks_count,
            recent_audit_logs: value
                .recent_audit_logs
                .into_iter()
                .map(AuditLogEntryResponse::from)
                .collect(),
        }
    }
}
