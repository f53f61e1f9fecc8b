use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tabula_core::{AppError, AppResult, UserIdentity};
use tabula_domain::{AuditAction, AuditEntityType, Task, TaskDraft, TaskId, TaskStatus};
use tracing::info;

use crate::AuditRecorder;
use crate::ports::TaskRepository;

/// Application service for the task board. Any authenticated user may use it.
#[derive(Clone)]
pub struct TaskService {
    task_repository: Arc<dyn TaskRepository>,
    audit_recorder: AuditRecorder,
}

impl TaskService {
    /// Creates a new task service.
    #[must_use]
    pub fn new(task_repository: Arc<dyn TaskRepository>, audit_recorder: AuditRecorder) -> Self {
        Self {
            task_repository,
            audit_recorder,
        }
    }

    /// Creates a task in the `todo` column.
    pub async fn create_task(
        &self,
        actor: &UserIdentity,
        title: &str,
        description: Option<String>,
        assigned_department: &str,
        due_date: Option<NaiveDate>,
    ) -> AppResult<Task> {
        let draft = TaskDraft::new(title, description, assigned_department, due_date)?;
        let task = Task {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            assigned_department: draft.assigned_department,
            due_date: draft.due_date,
            status: TaskStatus::Todo,
            is_deleted: false,
            created_by: Some(actor.user_id()),
            created_at: Utc::now(),
        };
        self.task_repository.create_task(task.clone()).await?;

        self.audit_recorder
            .record(
                AuditEntityType::Tasks,
                task.id.to_string(),
                None,
                AuditAction::Insert,
                actor.user_id(),
                None,
                Some(task.snapshot()),
            )
            .await?;

        info!(task_id = %task.id, "task created");
        Ok(task)
    }

    /// Lists live tasks in board order.
    pub async fn list_tasks(&self, _actor: &UserIdentity) -> AppResult<Vec<Task>> {
        let mut tasks = self.task_repository.list_tasks().await?;
        tasks.sort_by(Task::board_cmp);
        Ok(tasks)
    }

    /// Moves a task to another column.
    pub async fn update_task_status(
        &self,
        actor: &UserIdentity,
        task_id: TaskId,
        status: TaskStatus,
    ) -> AppResult<Task> {
        let current = self.require_task(task_id).await?;
        let updated = Task {
            status,
            ..current.clone()
        };
        self.persist_update(actor, &current, updated, AuditAction::Update)
            .await
    }

    /// Flips the checkbox of a task: done reopens, anything else closes.
    pub async fn toggle_task_status(&self, actor: &UserIdentity, task_id: TaskId) -> AppResult<Task> {
        let current = self.require_task(task_id).await?;
        let updated = Task {
            status: current.status.toggled(),
            ..current.clone()
        };
        self.persist_update(actor, &current, updated, AuditAction::Update)
            .await
    }

    /// Soft-deletes a task.
    pub async fn delete_task(&self, actor: &UserIdentity, task_id: TaskId) -> AppResult<()> {
        let current = self.require_task(task_id).await?;
        let deleted = Task {
            is_deleted: true,
            ..current.clone()
        };
        self.persist_update(actor, &current, deleted, AuditAction::Delete)
            .await?;
        Ok(())
    }

    async fn persist_update(
        &self,
        actor: &UserIdentity,
        previous: &Task,
        updated: Task,
        action: AuditAction,
    ) -> AppResult<Task> {
        self.task_repository.update_task(updated.clone()).await?;

        let new_data = (action != AuditAction::Delete).then(|| updated.snapshot());
        self.audit_recorder
            .record(
                AuditEntityType::Tasks,
                updated.id.to_string(),
                None,
                action,
                actor.user_id(),
                Some(previous.snapshot()),
                new_data,
            )
            .await?;

        info!(
            task_id = %updated.id,
            status = updated.status.as_str(),
            action = action.as_str(),
            "task changed"
        );
        Ok(updated)
    }

    async fn require_task(&self, task_id: TaskId) -> AppResult<Task> {
        self.task_repository
            .find_task(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("task '{task_id}' does not exist")))
    }
}
