use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabula_application::{ExportRecord, ImportRecord};
use ts_rs::TS;

/// API representation of a table row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/row-response.ts"
)]
pub struct RowResponse {
    pub id: String,
    pub table_id: String,
    #[ts(type = "Record<string, string | number | boolean | null>")]
    pub data: Value,
    #[ts(type = "number")]
    pub row_order: i64,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Incoming payload carrying a full row data object.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/row-data-request.ts"
)]
pub struct RowDataRequest {
    #[ts(type = "Record<string, string | number | boolean | null>")]
    pub data: Value,
}

/// Incoming payload for a single cell edit.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-cell-request.ts"
)]
pub struct UpdateCellRequest {
    #[ts(type = "string | number | boolean | null")]
    pub value: Value,
}

/// Incoming payload of flat spreadsheet records.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/import-rows-request.ts"
)]
pub struct ImportRowsRequest {
    #[ts(type = "Array<Record<string, string | number | boolean | null>>")]
    pub records: Vec<ImportRecord>,
}

/// Flat records keyed by column display name, in schema order.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/export-rows-response.ts"
)]
pub struct ExportRowsResponse {
    pub table_name: String,
    #[ts(type = "Array<Record<string, string | number | boolean | null>>")]
    pub records: Vec<ExportRecord>,
}
