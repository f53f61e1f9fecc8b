use axum::Json;
use axum::extract::{Extension, Path, State};
use tabula_core::AppError;
use tabula_domain::{Role, TableShareRole};

use crate::error::ApiError;
use crate::handlers::test_support::{creator_flags, seed_user, test_state};

use super::{
    list_notifications_handler, mark_all_notifications_read_handler,
    mark_notification_read_handler,
};

#[tokio::test]
async fn shared_table_shows_up_in_the_grantee_inbox() {
    let (state, repository) = test_state();
    let owner = seed_user(&repository, "Owner", Role::User, Some(creator_flags())).await;
    let guest = seed_user(&repository, "Guest", Role::User, None).await;
    let table = state
        .table_service
        .create_table(&owner, "Pipeline", None)
        .await
        .unwrap_or_else(|_| unreachable!());
    state
        .sharing_service
        .share_table(&owner, table.id(), guest.user_id(), TableShareRole::Viewer)
        .await
        .unwrap_or_else(|_| unreachable!());

    let Json(inbox) = list_notifications_handler(State(state.clone()), Extension(guest.clone()))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(inbox.unread_count, 1);
    assert_eq!(inbox.notifications[0].kind, "success");
    assert!(!inbox.notifications[0].read);

    let Json(marked) = mark_notification_read_handler(
        State(state.clone()),
        Extension(guest.clone()),
        Path(inbox.notifications[0].id.clone()),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    assert!(marked.success);
    assert!(marked.data.read);

    let Json(inbox) = list_notifications_handler(State(state), Extension(guest))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(inbox.unread_count, 0);
}

#[tokio::test]
async fn malformed_and_foreign_ids_are_rejected() {
    let (state, repository) = test_state();
    let owner = seed_user(&repository, "Owner", Role::User, Some(creator_flags())).await;
    let guest = seed_user(&repository, "Guest", Role::User, None).await;
    let table = state
        .table_service
        .create_table(&owner, "Pipeline", None)
        .await
        .unwrap_or_else(|_| unreachable!());
    state
        .sharing_service
        .share_table(&owner, table.id(), guest.user_id(), TableShareRole::Editor)
        .await
        .unwrap_or_else(|_| unreachable!());
    let Json(inbox) = list_notifications_handler(State(state.clone()), Extension(guest))
        .await
        .unwrap_or_else(|_| unreachable!());

    let malformed = mark_notification_read_handler(
        State(state.clone()),
        Extension(owner.clone()),
        Path("not-a-uuid".to_owned()),
    )
    .await;
    assert!(matches!(malformed, Err(ApiError(AppError::Validation(_)))));

    let foreign = mark_notification_read_handler(
        State(state),
        Extension(owner),
        Path(inbox.notifications[0].id.clone()),
    )
    .await;
    assert!(matches!(foreign, Err(ApiError(AppError::NotFound(_)))));
}

#[tokio::test]
async fn read_all_reports_how_many_changed() {
    let (state, repository) = test_state();
    let admin = seed_user(&repository, "Admin", Role::Admin, None).await;
    let member = seed_user(&repository, "Member", Role::User, None).await;
    state
        .user_admin_service
        .update_user_role(&admin, member.user_id(), Role::Manager)
        .await
        .unwrap_or_else(|_| unreachable!());
    state
        .user_admin_service
        .update_user_permissions(&admin, member.user_id(), creator_flags())
        .await
        .unwrap_or_else(|_| unreachable!());

    let Json(first) =
        mark_all_notifications_read_handler(State(state.clone()), Extension(member.clone()))
            .await
            .unwrap_or_else(|_| unreachable!());
    assert_eq!(first.data.updated, 2);

    let Json(second) = mark_all_notifications_read_handler(State(state), Extension(member))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(second.data.updated, 0);
}
