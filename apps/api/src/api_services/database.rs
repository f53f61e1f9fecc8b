use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tabula_core::AppError;
use tracing::info;

const MAX_DATABASE_CONNECTIONS: u32 = 10;

/// Opens the connection pool and applies pending schema migrations.
pub async fn connect_and_migrate(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_DATABASE_CONNECTIONS)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;
    info!("database schema is up to date");

    Ok(pool)
}
