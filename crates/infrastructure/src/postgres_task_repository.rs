use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tabula_application::ports::TaskRepository;
use tabula_core::{AppError, AppResult, UserId};
use tabula_domain::{Task, TaskId, TaskStatus};

/// PostgreSQL-backed repository for task board cards.
#[derive(Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    assigned_department: String,
    due_date: Option<NaiveDate>,
    status: String,
    is_deleted: bool,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

fn task_from_row(row: TaskRow) -> AppResult<Task> {
    Ok(Task {
        id: TaskId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        assigned_department: row.assigned_department,
        due_date: row.due_date,
        status: TaskStatus::from_str(row.status.as_str())?,
        is_deleted: row.is_deleted,
        created_by: row.created_by.map(UserId::from_uuid),
        created_at: row.created_at,
    })
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create_task(&self, task: Task) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (
                id,
                title,
                description,
                assigned_department,
                due_date,
                status,
                is_deleted,
                created_by,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(task.id.as_uuid())
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.assigned_department)
        .bind(task.due_date)
        .bind(task.status.as_str())
        .bind(task.is_deleted)
        .bind(task.created_by.map(|user_id| user_id.as_uuid()))
        .bind(task.created_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to create task '{}': {error}", task.id))
        })?;

        Ok(())
    }

    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, title, description, assigned_department, due_date, status, is_deleted, created_by, created_at
            FROM tasks
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(task_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find task '{task_id}': {error}")))?;

        row.map(task_from_row).transpose()
    }

    async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, title, description, assigned_department, due_date, status, is_deleted, created_by, created_at
            FROM tasks
            WHERE is_deleted = FALSE
            ORDER BY due_date ASC NULLS LAST, created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list tasks: {error}")))?;

        rows.into_iter().map(task_from_row).collect()
    }

    async fn update_task(&self, task: Task) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                assigned_department = $4,
                due_date = $5,
                status = $6,
                is_deleted = $7
            WHERE id = $1
            "#,
        )
        .bind(task.id.as_uuid())
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.assigned_department)
        .bind(task.due_date)
        .bind(task.status.as_str())
        .bind(task.is_deleted)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update task '{}': {error}", task.id))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "task '{}' does not exist",
                task.id
            )));
        }

        Ok(())
    }
}
