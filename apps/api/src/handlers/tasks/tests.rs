use axum::Json;
use axum::extract::{Extension, Path, State};
use tabula_core::{AppError, UserIdentity};
use tabula_domain::Role;

use crate::dto::{CreateTaskRequest, UpdateTaskStatusRequest};
use crate::error::ApiError;
use crate::handlers::test_support::{seed_user, test_state};
use crate::state::AppState;

use super::{
    create_task_handler, delete_task_handler, list_tasks_handler, toggle_task_status_handler,
    update_task_status_handler,
};

async fn create_task(state: &AppState, user: &UserIdentity, title: &str, due_date: Option<&str>) -> String {
    let (_, Json(created)) = create_task_handler(
        State(state.clone()),
        Extension(user.clone()),
        Json(CreateTaskRequest {
            title: title.to_owned(),
            description: None,
            assigned_department: "Operations".to_owned(),
            due_date: due_date.map(ToOwned::to_owned),
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    assert_eq!(created.data.status, "todo");
    created.data.id
}

#[tokio::test]
async fn board_lists_dated_tasks_first() {
    let (state, repository) = test_state();
    let user = seed_user(&repository, "Member", Role::User, None).await;

    create_task(&state, &user, "Undated task", None).await;
    create_task(&state, &user, "Dated task", Some("2026-11-02")).await;

    let Json(tasks) = list_tasks_handler(State(state), Extension(user))
        .await
        .unwrap_or_else(|_| unreachable!());
    let titles: Vec<&str> = tasks.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, ["Dated task", "Undated task"]);
    assert_eq!(tasks[0].due_date.as_deref(), Some("2026-11-02"));
}

#[tokio::test]
async fn invalid_input_reports_every_field() {
    let (state, repository) = test_state();
    let user = seed_user(&repository, "Member", Role::User, None).await;

    let result = create_task_handler(
        State(state),
        Extension(user),
        Json(CreateTaskRequest {
            title: "ab".to_owned(),
            description: None,
            assigned_department: String::new(),
            due_date: None,
        }),
    )
    .await;

    match result {
        Err(ApiError(AppError::InvalidFields(errors))) => {
            assert!(!errors.messages("title").is_empty());
            assert!(!errors.messages("assigned_department").is_empty());
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn status_changes_and_toggle_follow_the_board_rules() {
    let (state, repository) = test_state();
    let user = seed_user(&repository, "Member", Role::User, None).await;
    let task_id = create_task(&state, &user, "Count stock", None).await;

    let Json(in_progress) = update_task_status_handler(
        State(state.clone()),
        Extension(user.clone()),
        Path(task_id.clone()),
        Json(UpdateTaskStatusRequest {
            status: "in_progress".to_owned(),
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    assert_eq!(in_progress.data.status, "in_progress");

    let Json(done) = toggle_task_status_handler(
        State(state.clone()),
        Extension(user.clone()),
        Path(task_id.clone()),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    assert_eq!(done.data.status, "done");

    let Json(reopened) =
        toggle_task_status_handler(State(state), Extension(user), Path(task_id))
            .await
            .unwrap_or_else(|_| unreachable!());
    assert_eq!(reopened.data.status, "todo");
}

#[tokio::test]
async fn deleted_tasks_leave_the_board() {
    let (state, repository) = test_state();
    let user = seed_user(&repository, "Member", Role::User, None).await;
    let task_id = create_task(&state, &user, "Count stock", None).await;

    delete_task_handler(State(state.clone()), Extension(user.clone()), Path(task_id.clone()))
        .await
        .unwrap_or_else(|_| unreachable!());

    let Json(tasks) = list_tasks_handler(State(state.clone()), Extension(user.clone()))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(tasks.is_empty());

    let result = toggle_task_status_handler(State(state), Extension(user), Path(task_id)).await;
    assert!(matches!(result, Err(ApiError(AppError::NotFound(_)))));
}
