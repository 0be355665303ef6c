//! Admin account queries.

use crate::db::models::AdminRow;
use crate::db::DbPool;
use crate::error::AppResult;

/// Get an admin account by username.
pub async fn get_admin(pool: &DbPool, username: &str) -> AppResult<Option<AdminRow>> {
    let row = sqlx::query_as::<_, AdminRow>(
        r#"
        SELECT username, password_hash
        FROM admin_users
        WHERE username = $1
        LIMIT 1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Insert an admin account, or replace its password hash if it exists.
pub async fn upsert_admin(pool: &DbPool, username: &str, password_hash: &str) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO admin_users (username, password_hash)
        VALUES ($1, $2)
        ON CONFLICT (username) DO UPDATE
        SET password_hash = EXCLUDED.password_hash
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .execute(pool)
    .await?;

    Ok(())
}
