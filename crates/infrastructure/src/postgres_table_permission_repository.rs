use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tabula_application::ports::TablePermissionRepository;
use tabula_core::{AppError, AppResult, UserId};
use tabula_domain::{TableId, TablePermission, TableShareRole};

/// PostgreSQL-backed repository for per-table shares.
#[derive(Clone)]
pub struct PostgresTablePermissionRepository {
    pool: PgPool,
}

impl PostgresTablePermissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TablePermissionRow {
    id: Uuid,
    table_id: Uuid,
    user_id: Uuid,
    role: String,
    created_at: DateTime<Utc>,
}

fn share_from_row(row: TablePermissionRow) -> AppResult<TablePermission> {
    Ok(TablePermission {
        id: row.id,
        table_id: TableId::from_uuid(row.table_id),
        user_id: UserId::from_uuid(row.user_id),
        role: TableShareRole::from_str(row.role.as_str())?,
        created_at: row.created_at,
    })
}

#[async_trait]
impl TablePermissionRepository for PostgresTablePermissionRepository {
    async fn find_share(
        &self,
        table_id: TableId,
        user_id: UserId,
    ) -> AppResult<Option<TablePermission>> {
        let row = sqlx::query_as::<_, TablePermissionRow>(
            r#"
            SELECT id, table_id, user_id, role, created_at
            FROM table_permissions
            WHERE table_id = $1 AND user_id = $2
            "#,
        )
        .bind(table_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find share of table '{table_id}' for user '{user_id}': {error}"
            ))
        })?;

        row.map(share_from_row).transpose()
    }

    async fn list_shares(&self, table_id: TableId) -> AppResult<Vec<TablePermission>> {
        let rows = sqlx::query_as::<_, TablePermissionRow>(
            r#"
            SELECT id, table_id, user_id, role, created_at
            FROM table_permissions
            WHERE table_id = $1
            ORDER BY created_at ASC, id
            "#,
        )
        .bind(table_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list shares of table '{table_id}': {error}"))
        })?;

        rows.into_iter().map(share_from_row).collect()
    }

    async fn list_shares_for_user(&self, user_id: UserId) -> AppResult<Vec<TablePermission>> {
        let rows = sqlx::query_as::<_, TablePermissionRow>(
            r#"
            SELECT id, table_id, user_id, role, created_at
            FROM table_permissions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list shares of user '{user_id}': {error}"))
        })?;

        rows.into_iter().map(share_from_row).collect()
    }

    async fn upsert_share(&self, share: TablePermission) -> AppResult<TablePermission> {
        let row = sqlx::query_as::<_, TablePermissionRow>(
            r#"
            INSERT INTO table_permissions (id, table_id, user_id, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (table_id, user_id) DO UPDATE
            SET role = EXCLUDED.role
            RETURNING id, table_id, user_id, role, created_at
            "#,
        )
        .bind(share.id)
        .bind(share.table_id.as_uuid())
        .bind(share.user_id.as_uuid())
        .bind(share.role.as_str())
        .bind(share.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to share table '{}' with user '{}': {error}",
                share.table_id, share.user_id
            ))
        })?;

        share_from_row(row)
    }

    async fn delete_share(
        &self,
        table_id: TableId,
        user_id: UserId,
    ) -> AppResult<Option<TablePermission>> {
        let row = sqlx::query_as::<_, TablePermissionRow>(
            r#"
            DELETE FROM table_permissions
            WHERE table_id = $1 AND user_id = $2
            RETURNING id, table_id, user_id, role, created_at
            "#,
        )
        .bind(table_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to revoke share of table '{table_id}' for user '{user_id}': {error}"
            ))
        })?;

        row.map(share_from_row).transpose()
    }
}
