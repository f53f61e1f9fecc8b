use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tabula_application::ports::{AuditLogQuery, AuditRepository};
use tabula_core::{AppError, AppResult, UserId};
use tabula_domain::{AuditAction, AuditEntityType, AuditLogEntry, TableId};

/// PostgreSQL-backed append-only audit repository.
#[derive(Clone)]
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    id: Uuid,
    entity_type: String,
    entity_id: String,
    table_id: Option<Uuid>,
    action: String,
    performed_by: Option<Uuid>,
    performed_at: DateTime<Utc>,
    old_data: Option<Value>,
    new_data: Option<Value>,
}

fn entry_from_row(row: AuditLogRow) -> AppResult<AuditLogEntry> {
    AuditLogEntry::new(
        row.id,
        AuditEntityType::from_str(row.entity_type.as_str())?,
        row.entity_id,
        row.table_id.map(TableId::from_uuid),
        AuditAction::from_str(row.action.as_str())?,
        row.performed_by.map(UserId::from_uuid),
        row.performed_at,
        row.old_data,
        row.new_data,
    )
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append_entry(&self, entry: AuditLogEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                id,
                entity_type,
                entity_id,
                table_id,
                action,
                performed_by,
                performed_at,
                old_data,
                new_data
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id())
        .bind(entry.entity_type().as_str())
        .bind(entry.entity_id())
        .bind(entry.table_id().map(|table_id| table_id.as_uuid()))
        .bind(entry.action().as_str())
        .bind(entry.performed_by().map(|user_id| user_id.as_uuid()))
        .bind(entry.performed_at())
        .bind(entry.old_data())
        .bind(entry.new_data())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append audit entry: {error}")))?;

        Ok(())
    }

    async fn list_recent(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT id, entity_type, entity_id, table_id, action, performed_by, performed_at, old_data, new_data
            FROM audit_logs
            WHERE ($1::TEXT IS NULL OR action = $1)
                AND ($2::TEXT IS NULL OR entity_type = $2)
            ORDER BY performed_at DESC, id
            LIMIT $3
            OFFSET $4
            "#,
        )
        .bind(query.action.map(|action| action.as_str()))
        .bind(query.entity_type.map(|entity_type| entity_type.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list audit entries: {error}"))
        })?;

        rows.into_iter().map(entry_from_row).collect()
    }
}
