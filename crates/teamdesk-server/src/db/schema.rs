//! Table definitions, applied idempotently at startup.

use crate::db::DbPool;
use crate::error::AppResult;

/// DDL statements, executed in order.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS employee_submissions (
        id BIGSERIAL PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        form_data JSONB NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS verified_employee_submissions (
        id BIGSERIAL PRIMARY KEY,
        original_submission_id BIGINT UNIQUE NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        verified_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        verified_by TEXT NOT NULL,
        form_data JSONB NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS admin_users (
        username TEXT PRIMARY KEY,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

/// Create all tables that do not exist yet.
pub async fn init_schema(pool: &DbPool) -> AppResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!(tables = SCHEMA.len(), "Database schema ready");
    Ok(())
}
