use serde::Serialize;
use serde_json::Value;
use ts_rs::TS;

/// One labelled value of an audit entry's detail list.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-detail-response.ts"
)]
pub struct AuditDetailResponse {
    pub label: String,
    pub value: String,
}

/// API representation of an enriched audit entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub id: String,
    pub entity_type: String,
    pub entity_id: String,
    pub table_id: Option<String>,
    #[ts(type = "\"INSERT\" | \"UPDATE\" | \"DELETE\"")]
    pub action: String,
    pub performed_by: Option<String>,
    pub performer_name: Option<String>,
    pub performer_email: Option<String>,
    pub performed_at: String,
    #[ts(type = "Record<string, unknown> | null")]
    pub old_data: Option<Value>,
    #[ts(type = "Record<string, unknown> | null")]
    pub new_data: Option<Value>,
    pub summary: String,
    pub details: Vec<AuditDetailResponse>,
}
