use tabula_domain::TableRow;

use super::types::RowResponse;

impl From<TableRow> for RowResponse {
    fn from(value: TableRow) -> Self {
        Self {
            id: value.id().to_string(),
            table_id: value.table_id().to_string(),
            data: value.data().to_json(),
            row_order: value.row_order(),
            created_by: value.created_by().map(|user_id| user_id.to_string()),
            updated_by: value.updated_by().map(|user_id| user_id.to_string()),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}
