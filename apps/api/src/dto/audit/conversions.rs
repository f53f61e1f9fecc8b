use tabula_application::{AuditDetail, AuditLogView};

use super::types::{AuditDetailResponse, AuditLogEntryResponse};

impl From<AuditDetail> for AuditDetailResponse {
    fn from(value: AuditDetail) -> Self {
        Self {
            label: value.label,
            value: value.value,
        }
    }
}

impl From<AuditLogView> for AuditLogEntryResponse {
    fn from(value: AuditLogView) -> Self {
        let entry = value.entry;
        Self {
            id: entry.id().to_string(),
            entity_type: entry.entity_type().as_str().to_owned(),
            entity_id: entry.entity_id().to_owned(),
            table_id: entry.table_id().map(|table_id| table_id.to_string()),
            action: entry.action().as_str().to_owned(),
            performed_by: entry.performed_by().map(|user_id| user_id.to_string()),
            performer_name: value.performer_name,
            performer_email: value.performer_email,
            performed_at: entry.performed_at().to_rfc3339(),
            old_data: entry.old_data().cloned(),
            new_data: entry.new_data().cloned(),
            summary: value.summary,
            details: value
                .details
                .into_iter()
                .map(AuditDetailResponse::from)
                .collect(),
        }
    }
}
