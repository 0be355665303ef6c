//! Submission queries.

use chrono::{DateTime, Utc};

use crate::db::models::{PendingSubmissionRow, VerifiedSubmissionRow};
use crate::db::DbPool;
use crate::error::AppResult;

/// Insert a pending submission.
pub async fn insert_submission(
    pool: &DbPool,
    form_data: &serde_json::Value,
) -> AppResult<(i64, DateTime<Utc>)> {
    let result: (i64, DateTime<Utc>) = sqlx::query_as(
        r#"
        INSERT INTO employee_submissions (form_data)
        VALUES ($1)
        RETURNING id, created_at
        "#,
    )
    .bind(form_data)
    .fetch_one(pool)
    .await?;

    Ok(result)
}

/// List pending submissions, newest first.
pub async fn list_pending(pool: &DbPool) -> AppResult<Vec<PendingSubmissionRow>> {
    let rows = sqlx::query_as::<_, PendingSubmissionRow>(
        r#"
        SELECT id, created_at, form_data
        FROM employee_submissions
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List verified submissions, most recently verified first.
pub async fn list_verified(pool: &DbPool) -> AppResult<Vec<VerifiedSubmissionRow>> {
    let rows = sqlx::query_as::<_, VerifiedSubmissionRow>(
        r#"
        SELECT id, original_submission_id, created_at, verified_at, verified_by, form_data
        FROM verified_employee_submissions
        ORDER BY verified_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Move a pending submission into the verified table.
///
/// Runs in a single transaction; the pending row is locked for the duration.
/// Returns `false` when no pending row has this id. Dropping the transaction
/// on any error rolls it back.
pub async fn verify_submission(pool: &DbPool, id: i64, reviewer: &str) -> AppResult<bool> {
    let mut tx = pool.begin().await?;

    let pending = sqlx::query_as::<_, PendingSubmissionRow>(
        r#"
        SELECT id, created_at, form_data
        FROM employee_submissions
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = pending else {
        tx.rollback().await?;
        return Ok(false);
    };

    sqlx::query(
        r#"
        INSERT INTO verified_employee_submissions
            (original_submission_id, created_at, verified_at, verified_by, form_data)
        VALUES ($1, $2, NOW(), $3, $4)
        "#,
    )
    .bind(row.id)
    .bind(row.created_at)
    .bind(reviewer)
    .bind(&row.form_data)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM employee_submissions WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(true)
}

/// Delete a pending submission.
pub async fn delete_submission(pool: &DbPool, id: i64) -> AppResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM employee_submissions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
