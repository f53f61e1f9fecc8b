use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tabula_core::AppError;
use tabula_domain::Role;

use crate::dto::{
    ColumnDefinitionPayload, CreateTableRequest, UpdateTableRequest, UpdateTableSchemaRequest,
};
use crate::error::ApiError;
use crate::handlers::test_support::{creator_flags, seed_user, test_state};

use super::{
    create_table_handler, delete_table_handler, get_table_handler, list_tables_handler,
    update_table_handler, update_table_schema_handler,
};

fn create_request(name: &str) -> Json<CreateTableRequest> {
    Json(CreateTableRequest {
        name: name.to_owned(),
        description: Some("Quarterly numbers".to_owned()),
    })
}

#[tokio::test]
async fn creator_sees_new_table_with_full_access() {
    let (state, repository) = test_state();
    let owner = seed_user(&repository, "Owner", Role::User, Some(creator_flags())).await;

    let (status, Json(created)) = create_table_handler(
        State(state.clone()),
        Extension(owner.clone()),
        create_request("  Budget  "),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(status, StatusCode::CREATED);
    assert!(created.success);
    assert_eq!(created.data.name, "Budget");
    assert_eq!(created.data.access, "full");
    assert!(created.data.columns_schema.is_empty());

    let Json(tables) = list_tables_handler(State(state), Extension(owner))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].id, created.data.id);
}

#[tokio::test]
async fn short_name_is_reported_as_field_error() {
    let (state, repository) = test_state();
    let owner = seed_user(&repository, "Owner", Role::User, Some(creator_flags())).await;

    let result = create_table_handler(State(state), Extension(owner), create_request("x")).await;

    match result {
        Err(ApiError(AppError::InvalidFields(errors))) => {
            assert!(!errors.messages("name").is_empty());
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn users_without_capability_cannot_create_tables() {
    let (state, repository) = test_state();
    let user = seed_user(&repository, "Plain", Role::User, None).await;

    let result = create_table_handler(State(state), Extension(user), create_request("Budget")).await;

    assert!(matches!(result, Err(ApiError(AppError::Forbidden(_)))));
}

#[tokio::test]
async fn unshared_tables_stay_hidden_from_other_users() {
    let (state, repository) = test_state();
    let owner = seed_user(&repository, "Owner", Role::User, Some(creator_flags())).await;
    let stranger = seed_user(&repository, "Stranger", Role::User, None).await;

    let (_, Json(created)) = create_table_handler(
        State(state.clone()),
        Extension(owner),
        create_request("Budget"),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    let Json(tables) = list_tables_handler(State(state.clone()), Extension(stranger.clone()))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(tables.is_empty());

    let result = get_table_handler(State(state), Extension(stranger), Path(created.data.id)).await;
    assert!(matches!(result, Err(ApiError(AppError::Forbidden(_)))));
}

#[tokio::test]
async fn schema_and_details_updates_are_returned() {
    let (state, repository) = test_state();
    let owner = seed_user(&repository, "Owner", Role::User, Some(creator_flags())).await;
    let (_, Json(created)) = create_table_handler(
        State(state.clone()),
        Extension(owner.clone()),
        create_request("Budget"),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    let Json(renamed) = update_table_handler(
        State(state.clone()),
        Extension(owner.clone()),
        Path(created.data.id.clone()),
        Json(UpdateTableRequest {
            name: "Budget 2026".to_owned(),
            description: None,
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    assert_eq!(renamed.data.name, "Budget 2026");
    assert_eq!(renamed.data.description, None);

    let Json(with_columns) = update_table_schema_handler(
        State(state),
        Extension(owner),
        Path(created.data.id),
        Json(UpdateTableSchemaRequest {
            columns: vec![ColumnDefinitionPayload {
                id: "c1".to_owned(),
                name: "Amount".to_owned(),
                column_type: "number".to_owned(),
                options: None,
            }],
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    assert_eq!(with_columns.data.columns_schema.len(), 1);
    assert_eq!(with_columns.data.columns_schema[0].column_type, "number");
}

#[tokio::test]
async fn deleted_table_is_no_longer_found() {
    let (state, repository) = test_state();
    let admin = seed_user(&repository, "Admin", Role::Admin, None).await;
    let (_, Json(created)) = create_table_handler(
        State(state.clone()),
        Extension(admin.clone()),
        create_request("Budget"),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    let Json(deleted) = delete_table_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Path(created.data.id.clone()),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    assert!(deleted.success);

    let result = get_table_handler(State(state), Extension(admin), Path(created.data.id)).await;
    assert!(matches!(result, Err(ApiError(AppError::NotFound(_)))));
}

#[tokio::test]
async fn malformed_table_id_is_a_validation_error() {
    let (state, repository) = test_state();
    let admin = seed_user(&repository, "Admin", Role::Admin, None).await;

    let result = get_table_handler(
        State(state),
        Extension(admin),
        Path("not-a-uuid".to_owned()),
    )
    .await;

    assert!(matches!(result, Err(ApiError(AppError::Validation(_)))));
}
