use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tabula_core::UserIdentity;
use tabula_domain::{CellValue, RowData, RowId, TableId};

use crate::dto::{
    ExportRowsResponse, ImportRowsRequest, MutationResponse, RowDataRequest, RowResponse,
    UpdateCellRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;


pub async fn list_rows_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(table_id): Path<String>,
) -> ApiResult<Json<Vec<RowResponse>>> {
    let rows = state
        .row_service
        .list_rows(&user, TableId::parse(&table_id)?)
        .await?
        .into_iter()
        .map(RowResponse::from)
        .collect();

    Ok(Json(rows))
}

pub async fn add_row_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(table_id): Path<String>,
    Json(payload): Json<RowDataRequest>,
) -> ApiResult<(StatusCode, Json<MutationResponse<RowResponse>>)> {
    let row = state
        .row_service
        .add_row(
            &user,
            TableId::parse(&table_id)?,
            RowData::from_json(payload.data)?,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new("Row added", RowResponse::from(row))),
    ))
}

pub async fn import_rows_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(table_id): Path<String>,
    Json(payload): Json<ImportRowsRequest>,
) -> ApiResult<(StatusCode, Json<MutationResponse<Vec<RowResponse>>>)> {
    let rows: Vec<RowResponse> = state
        .row_service
        .import_rows(&user, TableId::parse(&table_id)?, payload.records)
        .await?
        .into_iter()
        .map(RowResponse::from)
        .collect();

    let message = format!("{} rows imported", rows.len());
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new(message, rows)),
    ))
}

pub async fn export_rows_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(table_id): Path<String>,
) -> ApiResult<Json<ExportRowsResponse>> {
    let table_id = TableId::parse(&table_id)?;
    let table = state.table_service.get_table(&user, table_id).await?;
    let records = state.row_service.export_rows(&user, table_id).await?;

    Ok(Json(ExportRowsResponse {
        table_name: table.name().to_owned(),
        records,
    }))
}

pub async fn update_row_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((table_id, row_id)): Path<(String, String)>,
    Json(payload): Json<RowDataRequest>,
) -> ApiResult<Json<MutationResponse<RowResponse>>> {
    let row = state
        .row_service
        .update_row_data(
            &user,
            TableId::parse(&table_id)?,
            RowId::parse(&row_id)?,
            RowData::from_json(payload.data)?,
        )
        .await?;

    Ok(Json(MutationResponse::new(
        "Row updated",
        RowResponse::from(row),
    )))
}

pub async fn update_cell_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((table_id, row_id, column_id)): Path<(String, String, String)>,
    Json(payload): Json<UpdateCellRequest>,
) -> ApiResult<Json<MutationResponse<RowResponse>>> {
    let row = state
        .row_service
        .update_cell(
            &user,
            TableId::parse(&table_id)?,
            RowId::parse(&row_id)?,
            &column_id,
            CellValue::from_json(payload.value)?,
        )
        .await?;

    Ok(Json(MutationResponse::new(
        "Cell updated",
        RowResponse::from(row),
    )))
}

pub async fn delete_row_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((table_id, row_id)): Path<(String, String)>,
) -> ApiResult<Json<MutationResponse<()>>> {
    state
        .row_service
        .delete_row(&user, TableId::parse(&table_id)?, RowId::parse(&row_id)?)
        .await?;

    Ok(Json(MutationResponse::new("Row deleted", ())))
}
