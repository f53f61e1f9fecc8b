use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tabula_application::ports::RowRepository;
use tabula_core::{AppError, AppResult, UserId};
use tabula_domain::{RowData, RowId, TableId, TableRow};

/// PostgreSQL-backed repository for dynamic table rows.
#[derive(Clone)]
pub struct PostgresRowRepository {
    pool: PgPool,
}

impl PostgresRowRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TableRowRow {
    id: Uuid,
    table_id: Uuid,
    data: Value,
    row_order: i64,
    is_deleted: bool,
    created_by: Option<Uuid>,
    updated_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn row_from_row(row: TableRowRow) -> AppResult<TableRow> {
    let data = RowData::from_json(row.data).map_err(|error| {
        AppError::Internal(format!("stored data of row '{}' is invalid: {error}", row.id))
    })?;

    Ok(TableRow::new(
        RowId::from_uuid(row.id),
        TableId::from_uuid(row.table_id),
        data,
        row.row_order,
        row.is_deleted,
        row.created_by.map(UserId::from_uuid),
        row.updated_by.map(UserId::from_uuid),
        row.created_at,
        row.updated_at,
    ))
}

#[async_trait]
impl RowRepository for PostgresRowRepository {
    async fn list_rows(&self, table_id: TableId) -> AppResult<Vec<TableRow>> {
        let rows = sqlx::query_as::<_, TableRowRow>(
            r#"
            SELECT id, table_id, data, row_order, is_deleted, created_by, updated_by, created_at, updated_at
            FROM table_rows
            WHERE table_id = $1 AND is_deleted = FALSE
            ORDER BY row_order ASC, created_at ASC, id ASC
            "#,
        )
        .bind(table_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list rows of table '{table_id}': {error}"))
        })?;

        rows.into_iter().map(row_from_row).collect()
    }

    async fn find_row(&self, table_id: TableId, row_id: RowId) -> AppResult<Option<TableRow>> {
        let row = sqlx::query_as::<_, TableRowRow>(
            r#"
            SELECT id, table_id, data, row_order, is_deleted, created_by, updated_by, created_at, updated_at
            FROM table_rows
            WHERE table_id = $1 AND id = $2
            "#,
        )
        .bind(table_id.as_uuid())
        .bind(row_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find row '{row_id}': {error}")))?;

        row.map(row_from_row).transpose()
    }

    async fn insert_rows(
        &self,
        table_id: TableId,
        created_by: UserId,
        rows: Vec<RowData>,
    ) -> AppResult<Vec<TableRow>> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start row insert transaction for table '{table_id}': {error}"
            ))
        })?;

        // Serializes concurrent inserts on the same table until commit.
        let locked = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM dynamic_tables
            WHERE id = $1 AND is_deleted = FALSE
            FOR UPDATE
            "#,
        )
        .bind(table_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to lock table '{table_id}': {error}"))
        })?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!(
                "table '{table_id}' does not exist"
            )));
        }

        let current_max = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(MAX(row_order), 0)::BIGINT
            FROM table_rows
            WHERE table_id = $1
            "#,
        )
        .bind(table_id.as_uuid())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to read row order of table '{table_id}': {error}"
            ))
        })?;

        let mut inserted = Vec::with_capacity(rows.len());
        for (data, row_order) in rows.into_iter().zip(current_max + 1..) {
            let row = sqlx::query_as::<_, TableRowRow>(
                r#"
                INSERT INTO table_rows (id, table_id, data, row_order, created_by)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, table_id, data, row_order, is_deleted, created_by, updated_by, created_at, updated_at
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(table_id.as_uuid())
            .bind(data.to_json())
            .bind(row_order)
            .bind(created_by.as_uuid())
            .fetch_one(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to insert row into table '{table_id}': {error}"
                ))
            })?;
            inserted.push(row_from_row(row)?);
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit row insert transaction for table '{table_id}': {error}"
            ))
        })?;

        Ok(inserted)
    }

    async fn replace_row_data(
        &self,
        table_id: TableId,
        row_id: RowId,
        data: RowData,
        updated_by: UserId,
    ) -> AppResult<TableRow> {
        let row = sqlx::query_as::<_, TableRowRow>(
            r#"
            UPDATE table_rows
            SET data = $3,
                updated_by = $4,
                updated_at = now()
            WHERE table_id = $1 AND id = $2 AND is_deleted = FALSE
            RETURNING id, table_id, data, row_order, is_deleted, created_by, updated_by, created_at, updated_at
            "#,
        )
        .bind(table_id.as_uuid())
        .bind(row_id.as_uuid())
        .bind(data.to_json())
        .bind(updated_by.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update row '{row_id}': {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("row '{row_id}' does not exist")))?;

        row_from_row(row)
    }

    async fn soft_delete_row(
        &self,
        table_id: TableId,
        row_id: RowId,
        deleted_by: UserId,
    ) -> AppResult<TableRow> {
        let row = sqlx::query_as::<_, TableRowRow>(
            r#"
            UPDATE table_rows
            SET is_deleted = TRUE,
                updated_by = $3,
                updated_at = now()
            WHERE table_id = $1 AND id = $2 AND is_deleted = FALSE
            RETURNING id, table_id, data, row_order, is_deleted, created_by, updated_by, created_at, updated_at
            "#,
        )
        .bind(table_id.as_uuid())
        .bind(row_id.as_uuid())
        .bind(deleted_by.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete row '{row_id}': {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("row '{row_id}' does not exist")))?;

        row_from_row(row)
    }
}
