use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tabula_core::{UserId, UserIdentity};
use tabula_domain::{TableId, TableShareRole};

use crate::dto::{MutationResponse, ShareTableRequest, TablePermissionResponse};
use crate::error::ApiResult;
use crate::state::AppState;


pub async fn list_table_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(table_id): Path<String>,
) -> ApiResult<Json<Vec<TablePermissionResponse>>> {
    let shares = state
        .sharing_service
        .list_table_permissions(&user, TableId::parse(&table_id)?)
        .await?
        .into_iter()
        .map(TablePermissionResponse::from)
        .collect();

    Ok(Json(shares))
}

pub async fn share_table_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(table_id): Path<String>,
    Json(payload): Json<ShareTableRequest>,
) -> ApiResult<(StatusCode, Json<MutationResponse<TablePermissionResponse>>)> {
    let share = state
        .sharing_service
        .share_table(
            &user,
            TableId::parse(&table_id)?,
            UserId::parse(&payload.user_id)?,
            TableShareRole::from_str(&payload.role)?,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new(
            "Table shared",
            TablePermissionResponse::from(share),
        )),
    ))
}

pub async fn revoke_table_share_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((table_id, user_id)): Path<(String, String)>,
) -> ApiResult<Json<MutationResponse<()>>> {
    state
        .sharing_service
        .revoke_table_share(
            &user,
            TableId::parse(&table_id)?,
            UserId::parse(&user_id)?,
        )
        .await?;

    Ok(Json(MutationResponse::new("Access revoked", ())))
}
