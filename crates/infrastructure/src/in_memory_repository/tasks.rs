use async_trait::async_trait;
use tabula_application::ports::TaskRepository;
use tabula_core::{AppError, AppResult};
use tabula_domain::{Task, TaskId};

use super::InMemoryRepository;

#[async_trait]
impl TaskRepository for InMemoryRepository {
    async fn create_task(&self, task: Task) -> AppResult<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(AppError::Conflict(format!(
                "task '{}' already exists",
                task.id
            )));
        }

        tasks.insert(task.id, task);
        Ok(())
    }

    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        Ok(self
            .tasks
            .read()
            .await
            .get(&task_id)
            .filter(|task| !task.is_deleted)
            .cloned())
    }

    async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .await
            .values()
            .filter(|task| !task.is_deleted)
            .cloned()
            .collect())
    }

    async fn update_task(&self, task: Task) -> AppResult<()> {
        let mut tasks = self.tasks.write().await;
        let Some(stored) = tasks.get_mut(&task.id) else {
            return Err(AppError::NotFound(format!(
                "task '{}' does not exist",
                task.id
            )));
        };

        *stored = task;
        Ok(())
    }
}
