use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tabula_application::ports::TableRepository;
use tabula_core::{AppError, AppResult, UserId};
use tabula_domain::{DynamicTable, TableId, TableSchema};

/// PostgreSQL-backed repository for dynamic table definitions.
#[derive(Clone)]
pub struct PostgresTableRepository {
    pool: PgPool,
}

impl PostgresTableRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DynamicTableRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    columns_schema: Value,
    owner_id: Uuid,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn table_from_row(row: DynamicTableRow) -> AppResult<DynamicTable> {
    let columns_schema = TableSchema::from_json(row.columns_schema).map_err(|error| {
        AppError::Internal(format!(
            "stored schema of table '{}' is invalid: {error}",
            row.id
        ))
    })?;

    DynamicTable::new(
        TableId::from_uuid(row.id),
        row.name,
        row.description,
        columns_schema,
        UserId::from_uuid(row.owner_id),
        row.is_deleted,
        row.created_at,
        row.updated_at,
    )
}

#[async_trait]
impl TableRepository for PostgresTableRepository {
    async fn create_table(&self, table: DynamicTable) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO dynamic_tables (
                id,
                name,
                description,
                columns_schema,
                owner_id,
                is_deleted,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(table.id().as_uuid())
        .bind(table.name())
        .bind(table.description())
        .bind(table.columns_schema().to_json())
        .bind(table.owner_id().as_uuid())
        .bind(table.is_deleted())
        .bind(table.created_at())
        .bind(table.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to create table '{}': {error}", table.id()))
        })?;

        Ok(())
    }

    async fn find_table(&self, table_id: TableId) -> AppResult<Option<DynamicTable>> {
        let row = sqlx::query_as::<_, DynamicTableRow>(
            r#"
            SELECT id, name, description, columns_schema, owner_id, is_deleted, created_at, updated_at
            FROM dynamic_tables
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(table_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find table '{table_id}': {error}"))
        })?;

        row.map(table_from_row).transpose()
    }

    async fn list_tables(&self) -> AppResult<Vec<DynamicTable>> {
        let rows = sqlx::query_as::<_, DynamicTableRow>(
            r#"
            SELECT id, name, description, columns_schema, owner_id, is_deleted, created_at, updated_at
            FROM dynamic_tables
            WHERE is_deleted = FALSE
            ORDER BY created_at DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list tables: {error}")))?;

        rows.into_iter().map(table_from_row).collect()
    }

    async fn update_table(&self, table: DynamicTable) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE dynamic_tables
            SET name = $2,
                description = $3,
                columns_schema = $4,
                updated_at = $5
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(table.id().as_uuid())
        .bind(table.name())
        .bind(table.description())
        .bind(table.columns_schema().to_json())
        .bind(table.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update table '{}': {error}", table.id()))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "table '{}' does not exist",
                table.id()
            )));
        }

        Ok(())
    }

    async fn soft_delete_table(
        &self,
        table_id: TableId,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE dynamic_tables
            SET is_deleted = TRUE,
                updated_at = $2
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(table_id.as_uuid())
        .bind(deleted_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete table '{table_id}': {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "table '{table_id}' does not exist"
            )));
        }

        Ok(())
    }
}
