use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for sharing a table with a user.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/share-table-request.ts"
)]
pub struct ShareTableRequest {
    pub user_id: String,
    #[ts(type = "\"viewer\" | \"editor\"")]
    pub role: String,
}

/// API representation of a table share.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/table-permission-response.ts"
)]
pub struct TablePermissionResponse {
    pub id: String,
    pub table_id: String,
    pub user_id: String,
    #[ts(type = "\"viewer\" | \"editor\"")]
    pub role: String,
    pub created_at: String,
}
