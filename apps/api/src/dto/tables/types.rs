use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for table creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-table-request.ts"
)]
pub struct CreateTableRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Incoming payload for renaming a table or changing its description.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-table-request.ts"
)]
pub struct UpdateTableRequest {
    pub name: String,
    pub description: Option<String>,
}

/// One column as exchanged with the table editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/column-definition-payload.ts"
)]
pub struct ColumnDefinitionPayload {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    #[ts(type = "\"text\" | \"number\" | \"date\" | \"select\"")]
    pub column_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub options: Option<Vec<String>>,
}

/// Incoming payload replacing a table's column list.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-table-schema-request.ts"
)]
pub struct UpdateTableSchemaRequest {
    pub columns: Vec<ColumnDefinitionPayload>,
}

/// API representation of a dynamic table.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/table-response.ts"
)]
pub struct TableResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub columns_schema: Vec<ColumnDefinitionPayload>,
    pub owner_id: String,
    /// Effective access of the caller, used to disable affordances up front.
    #[ts(type = "\"view\" | \"edit\" | \"full\"")]
    pub access: String,
    pub created_at: String,
    pub updated_at: String,
}
