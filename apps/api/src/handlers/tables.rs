use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tabula_core::UserIdentity;
use tabula_domain::{DynamicTable, TableId};

use crate::dto::{
    CreateTableRequest, MutationResponse, TableResponse, UpdateTableRequest,
    UpdateTableSchemaRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[cfg(test)]
mod tests;

pub async fn list_tables_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<TableResponse>>> {
    let tables = state.table_service.list_tables(&user).await?;

    let mut responses = Vec::with_capacity(tables.len());
    for table in &tables {
        responses.push(table_response(&state, &user, table).await?);
    }

    Ok(Json(responses))
}

pub async fn create_table_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateTableRequest>,
) -> ApiResult<(StatusCode, Json<MutationResponse<TableResponse>>)> {
    let table = state
        .table_service
        .create_table(&user, &payload.name, payload.description)
        .await?;
    let response = table_response(&state, &user, &table).await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new("Table created", response)),
    ))
}

pub async fn get_table_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(table_id): Path<String>,
) -> ApiResult<Json<TableResponse>> {
    let table = state
        .table_service
        .get_table(&user, TableId::parse(&table_id)?)
        .await?;

    Ok(Json(table_response(&state, &user, &table).await?))
}

pub async fn update_table_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(table_id): Path<String>,
    Json(payload): Json<UpdateTableRequest>,
) -> ApiResult<Json<MutationResponse<TableResponse>>> {
    let table = state
        .table_service
        .update_table_details(
            &user,
            TableId::parse(&table_id)?,
            &payload.name,
            payload.description,
        )
        .await?;
    let response = table_response(&state, &user, &table).await?;

    Ok(Json(MutationResponse::new("Table updated", response)))
}

pub async fn update_table_schema_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(table_id): Path<String>,
    Json(payload): Json<UpdateTableSchemaRequest>,
) -> ApiResult<Json<MutationResponse<TableResponse>>> {
    let table = state
        .table_service
        .update_schema(&user, TableId::parse(&table_id)?, payload.into_schema()?)
        .await?;
    let response = table_response(&state, &user, &table).await?;

    Ok(Json(MutationResponse::new("Columns saved", response)))
}

pub async fn delete_table_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(table_id): Path<String>,
) -> ApiResult<Json<MutationResponse<()>>> {
    state
        .table_service
        .delete_table(&user, TableId::parse(&table_id)?)
        .await?;

    Ok(Json(MutationResponse::new("Table deleted", ())))
}

async fn table_response(
    state: &AppState,
    user: &UserIdentity,
    table: &DynamicTable,
) -> ApiResult<TableResponse> {
    let access = state.table_service.table_access(user, table).await?;
    Ok(TableResponse::from_table(table, access))
}
