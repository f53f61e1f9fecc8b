use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for task creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-task-request.ts"
)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub assigned_department: String,
    /// Calendar date in `YYYY-MM-DD` form.
    pub due_date: Option<String>,
}

/// Incoming payload moving a task to another board column.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-task-status-request.ts"
)]
pub struct UpdateTaskStatusRequest {
    #[ts(type = "\"todo\" | \"in_progress\" | \"done\"")]
    pub status: String,
}

/// API representation of a task board card.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/task-response.ts"
)]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub assigned_department: String,
    pub due_date: Option<String>,
    #[ts(type = "\"todo\" | \"in_progress\" | \"done\"")]
    pub status: String,
    pub created_by: Option<String>,
    pub created_at: String,
}
