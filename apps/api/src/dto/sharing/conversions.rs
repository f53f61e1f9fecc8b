use tabula_domain::TablePermission;

use super::types::TablePermissionResponse;

impl From<TablePermission> for TablePermissionResponse {
    fn from(value: TablePermission) -> Self {
        Self {
            id: value.id.to_string(),
            table_id: value.table_id.to_string(),
            user_id: value.user_id.to_string(),
            role: value.role.as_str().to_owned(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}
