use axum::Json;
use axum::extract::{Extension, Path, State};
use tabula_core::AppError;
use tabula_domain::Role;

use crate::dto::{CapabilityFlagsPayload, UpdateProfileRequest, UpdateUserRoleRequest};
use crate::error::ApiError;
use crate::handlers::test_support::{seed_user, test_state};

use super::{
    list_users_handler, own_profile_handler, update_own_profile_handler,
    update_user_permissions_handler, update_user_role_handler,
};

#[tokio::test]
async fn admin_lists_and_promotes_users() {
    let (state, repository) = test_state();
    let admin = seed_user(&repository, "Admin", Role::Admin, None).await;
    let member = seed_user(&repository, "Member", Role::User, None).await;

    let Json(users) = list_users_handler(State(state.clone()), Extension(admin.clone()))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(users.len(), 2);

    let Json(updated) = update_user_role_handler(
        State(state),
        Extension(admin),
        Path(member.user_id().to_string()),
        Json(UpdateUserRoleRequest {
            role: "manager".to_owned(),
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    assert_eq!(updated.data.role, "manager");
}

#[tokio::test]
async fn members_cannot_list_users() {
    let (state, repository) = test_state();
    let member = seed_user(&repository, "Member", Role::User, None).await;

    let result = list_users_handler(State(state), Extension(member)).await;

    assert!(matches!(result, Err(ApiError(AppError::Forbidden(_)))));
}

#[tokio::test]
async fn granted_flags_are_returned_on_the_profile() {
    let (state, repository) = test_state();
    let admin = seed_user(&repository, "Admin", Role::Admin, None).await;
    let member = seed_user(&repository, "Member", Role::User, None).await;

    let Json(updated) = update_user_permissions_handler(
        State(state.clone()),
        Extension(admin),
        Path(member.user_id().to_string()),
        Json(CapabilityFlagsPayload {
            can_view_audit_logs: true,
            ..CapabilityFlagsPayload::default()
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    let flags = updated.data.permissions.unwrap_or_else(|| unreachable!());
    assert!(flags.can_view_audit_logs);
    assert!(!flags.can_create_tables);

    let Json(profile) = own_profile_handler(State(state), Extension(member))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(profile.permissions, Some(flags));
}

#[tokio::test]
async fn unknown_role_is_rejected() {
    let (state, repository) = test_state();
    let admin = seed_user(&repository, "Admin", Role::Admin, None).await;
    let member = seed_user(&repository, "Member", Role::User, None).await;

    let result = update_user_role_handler(
        State(state),
        Extension(admin),
        Path(member.user_id().to_string()),
        Json(UpdateUserRoleRequest {
            role: "owner".to_owned(),
        }),
    )
    .await;

    assert!(matches!(result, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn own_profile_name_must_be_long_enough() {
    let (state, repository) = test_state();
    let member = seed_user(&repository, "Member", Role::User, None).await;

    let rejected = update_own_profile_handler(
        State(state.clone()),
        Extension(member.clone()),
        Json(UpdateProfileRequest {
            full_name: "M".to_owned(),
            department: None,
        }),
    )
    .await;
    assert!(matches!(
        rejected,
        Err(ApiError(AppError::InvalidFields(_)))
    ));

    let Json(updated) = update_own_profile_handler(
        State(state),
        Extension(member),
        Json(UpdateProfileRequest {
            full_name: "Mira Stone".to_owned(),
            department: Some("Finance".to_owned()),
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    assert_eq!(updated.data.display_name, "Mira Stone");
    assert_eq!(updated.data.department.as_deref(), Some("Finance"));
}
