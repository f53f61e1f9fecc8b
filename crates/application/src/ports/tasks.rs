use async_trait::async_trait;
use tabula_core::AppResult;
use tabula_domain::{Task, TaskId};

/// Repository port for task board cards.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a new task.
    async fn create_task(&self, task: Task) -> AppResult<()>;

    /// Finds a task that is not soft-deleted.
    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<Task>>;

    /// Lists tasks that are not soft-deleted.
    async fn list_tasks(&self) -> AppResult<Vec<Task>>;

    /// Persists a changed task.
    async fn update_task(&self, task: Task) -> AppResult<()>;
}
