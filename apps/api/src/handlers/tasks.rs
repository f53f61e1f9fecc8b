use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tabula_core::UserIdentity;
use tabula_domain::{TaskId, TaskStatus};

use crate::dto::{CreateTaskRequest, MutationResponse, TaskResponse, UpdateTaskStatusRequest};
use crate::error::ApiResult;
use crate::state::AppState;

#[cfg(test)]
mod tests;

pub async fn list_tasks_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = state
        .task_service
        .list_tasks(&user)
        .await?
        .into_iter()
        .map(TaskResponse::from)
        .collect();

    Ok(Json(tasks))
}

pub async fn create_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<MutationResponse<TaskResponse>>)> {
    let due_date = payload.parsed_due_date()?;
    let task = state
        .task_service
        .create_task(
            &user,
            &payload.title,
            payload.description,
            &payload.assigned_department,
            due_date,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new("Task created", TaskResponse::from(task))),
    ))
}

pub async fn update_task_status_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(task_id): Path<String>,
    Json(payload): Json<UpdateTaskStatusRequest>,
) -> ApiResult<Json<MutationResponse<TaskResponse>>> {
    let task = state
        .task_service
        .update_task_status(
            &user,
            TaskId::parse(&task_id)?,
            TaskStatus::from_str(&payload.status)?,
        )
        .await?;

    Ok(Json(MutationResponse::new("Task updated", TaskResponse::from(task))))
}

pub async fn toggle_task_status_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<MutationResponse<TaskResponse>>> {
    let task = state
        .task_service
        .toggle_task_status(&user, TaskId::parse(&task_id)?)
        .await?;

    Ok(Json(MutationResponse::new("Task updated", TaskResponse::from(task))))
}

pub async fn delete_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<MutationResponse<()>>> {
    state
        .task_service
        .delete_task(&user, TaskId::parse(&task_id)?)
        .await?;

    Ok(Json(MutationResponse::new("Task deleted", ())))
}
