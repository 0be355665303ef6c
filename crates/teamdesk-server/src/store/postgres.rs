//! PostgreSQL-backed submission store.

use async_trait::async_trait;

use super::{AdminUser, NewSubmission, Scope, SubmissionRecord, SubmissionStore};
use crate::db::pool::health_check;
use crate::db::queries::{admin as admin_queries, submission as queries};
use crate::db::schema::init_schema;
use crate::db::DbPool;
use crate::error::AppResult;

/// Submission store over the `employee_submissions` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn init(&self, admin: &AdminUser) -> AppResult<()> {
        init_schema(&self.pool).await?;
        admin_queries::upsert_admin(&self.pool, &admin.username, &admin.password_hash).await?;
        tracing::info!(username = %admin.username, "Admin account seeded");
        Ok(())
    }

    async fn health(&self) -> bool {
        health_check(&self.pool).await
    }

    async fn find_admin(&self, username: &str) -> AppResult<Option<AdminUser>> {
        Ok(admin_queries::get_admin(&self.pool, username)
            .await?
            .map(AdminUser::from))
    }

    async fn save(&self, form_data: serde_json::Value) -> AppResult<NewSubmission> {
        let (id, created_at) = queries::insert_submission(&self.pool, &form_data).await?;
        Ok(NewSubmission { id, created_at })
    }

    async fn list(&self, scope: Scope) -> AppResult<Vec<SubmissionRecord>> {
        let records = match scope {
            Scope::Pending => queries::list_pending(&self.pool)
                .await?
                .into_iter()
                .map(SubmissionRecord::from)
                .collect(),
            Scope::Verified => queries::list_verified(&self.pool)
                .await?
                .into_iter()
                .map(SubmissionRecord::from)
                .collect(),
        };
        Ok(records)
    }

    async fn verify(&self, id: i64, reviewer: &str) -> AppResult<bool> {
        queries::verify_submission(&self.pool, id, reviewer).await
    }

    async fn reject(&self, id: i64) -> AppResult<bool> {
        queries::delete_submission(&self.pool, id).await
    }
}
