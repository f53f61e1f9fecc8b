use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use tabula_core::{UserId, UserIdentity};
use tabula_domain::Role;

use crate::dto::{
    CapabilityFlagsPayload, MutationResponse, UpdateProfileRequest, UpdateUserRoleRequest,
    UserProfileResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[cfg(test)]
mod tests;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<UserProfileResponse>>> {
    let users = state
        .user_admin_service
        .list_users(&user)
        .await?
        .into_iter()
        .map(UserProfileResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn update_user_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRoleRequest>,
) -> ApiResult<Json<MutationResponse<UserProfileResponse>>> {
    let profile = state
        .user_admin_service
        .update_user_role(
            &user,
            UserId::parse(&user_id)?,
            Role::from_str(&payload.role)?,
        )
        .await?;

    Ok(Json(MutationResponse::new(
        "Role updated",
        UserProfileResponse::from(profile),
    )))
}

pub async fn update_user_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<CapabilityFlagsPayload>,
) -> ApiResult<Json<MutationResponse<UserProfileResponse>>> {
    let profile = state
        .user_admin_service
        .update_user_permissions(&user, UserId::parse(&user_id)?, payload.into())
        .await?;

    Ok(Json(MutationResponse::new(
        "Permissions updated",
        UserProfileResponse::from(profile),
    )))
}

pub async fn own_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<UserProfileResponse>> {
    let profile = state.user_admin_service.own_profile(&user).await?;
    Ok(Json(UserProfileResponse::from(profile)))
}

pub async fn update_own_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<MutationResponse<UserProfileResponse>>> {
    let profile = state
        .user_admin_service
        .update_own_profile(&user, &payload.full_name, payload.department)
        .await?;

    Ok(Json(MutationResponse::new(
        "Profile updated",
        UserProfileResponse::from(profile),
    )))
}
