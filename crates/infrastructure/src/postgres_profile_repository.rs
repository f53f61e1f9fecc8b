use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tabula_application::ports::ProfileRepository;
use tabula_core::{AppError, AppResult, UserId};
use tabula_domain::{CapabilityFlags, Role, UserProfile};

/// PostgreSQL-backed repository for user profiles.
#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    full_name: Option<String>,
    email: Option<String>,
    department: Option<String>,
    role: String,
    permissions: Option<Value>,
}

fn profile_from_row(row: ProfileRow) -> AppResult<UserProfile> {
    let permissions = row
        .permissions
        .filter(|value| !value.is_null())
        .map(serde_json::from_value::<CapabilityFlags>)
        .transpose()
        .map_err(|error| {
            AppError::Internal(format!(
                "stored permissions of profile '{}' are invalid: {error}",
                row.id
            ))
        })?;

    Ok(UserProfile {
        id: UserId::from_uuid(row.id),
        full_name: row.full_name,
        email: row.email,
        department: row.department,
        role: Role::from_str(row.role.as_str())?,
        permissions,
    })
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_profile(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, full_name, email, department, role, permissions
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find profile '{user_id}': {error}"))
        })?;

        row.map(profile_from_row).transpose()
    }

    async fn find_profile_by_email(&self, email: &str) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, full_name, email, department, role, permissions
            FROM profiles
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find profile by email: {error}"))
        })?;

        row.map(profile_from_row).transpose()
    }

    async fn list_profiles(&self) -> AppResult<Vec<UserProfile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, full_name, email, department, role, permissions
            FROM profiles
            ORDER BY full_name NULLS LAST, email
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list profiles: {error}")))?;

        rows.into_iter().map(profile_from_row).collect()
    }

    async fn save_profile(&self, profile: UserProfile) -> AppResult<()> {
        let permissions = profile
            .permissions
            .map(serde_json::to_value)
            .transpose()
            .map_err(|error| {
                AppError::Internal(format!("failed to encode profile permissions: {error}"))
            })?;

        sqlx::query(
            r#"
            INSERT INTO profiles (id, full_name, email, department, role, permissions)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                email = EXCLUDED.email,
                department = EXCLUDED.department,
                role = EXCLUDED.role,
                permissions = EXCLUDED.permissions,
                updated_at = now()
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(profile.full_name)
        .bind(profile.email)
        .bind(profile.department)
        .bind(profile.role.as_str())
        .bind(permissions)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to save profile '{}': {error}", profile.id))
        })?;

        Ok(())
    }
}
