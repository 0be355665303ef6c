//! Database connection pool management.

use crate::config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Type alias for the PostgreSQL connection pool.
pub type DbPool = PgPool;

/// Create a new database connection pool.
///
/// # Errors
///
/// Returns an error if the connection pool cannot be created.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let target = config.target();

    let pool = PgPoolOptions::new()
        .max_connections(config.pool_max_connections)
        .acquire_timeout(Duration::from_secs(config.pool_acquire_timeout))
        .connect_with(config.connect_options())
        .await?;

    tracing::info!(
        host = %target.host,
        port = target.port,
        database = %target.database,
        max_connections = config.pool_max_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// Check if the database connection is healthy.
pub async fn health_check(pool: &DbPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}
