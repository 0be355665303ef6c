//! Submission persistence.
//!
//! [`SubmissionStore`] is implemented by [`PgStore`] (PostgreSQL tables) and
//! [`SheetStore`] (CSV spreadsheet files behind a single writer task). The
//! backend is chosen at startup from `ONBOARD_STORAGE`.

pub mod postgres;
pub mod spreadsheet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

pub use postgres::PgStore;
pub use spreadsheet::SheetStore;

/// Which list a request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Pending,
    Verified,
}

impl Scope {
    /// `"verified"` selects verified submissions; anything else is pending.
    pub fn resolve(value: Option<&str>) -> Self {
        match value {
            Some("verified") => Scope::Verified,
            _ => Scope::Pending,
        }
    }
}

/// A stored submission, pending or verified.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    /// Row id within its list
    pub id: i64,

    /// Id the submission had while pending (verified records only)
    pub original_submission_id: Option<i64>,

    /// When the employee submitted the form
    pub created_at: DateTime<Utc>,

    pub verified_at: Option<DateTime<Utc>>,
    pub verified_by: Option<String>,

    /// Submitted document
    pub form_data: serde_json::Value,
}

/// Identity of a freshly saved submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewSubmission {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

/// Stored admin credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    pub username: String,
    pub password_hash: String,
}

/// Persistence operations shared by both storage backends.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    /// Prepare storage and seed the configured admin account.
    async fn init(&self, admin: &AdminUser) -> AppResult<()>;

    /// Whether the backend can serve requests.
    async fn health(&self) -> bool;

    async fn find_admin(&self, username: &str) -> AppResult<Option<AdminUser>>;

    /// Persist a new pending submission.
    async fn save(&self, form_data: serde_json::Value) -> AppResult<NewSubmission>;

    /// Pending newest-first by creation, verified newest-first by verification.
    async fn list(&self, scope: Scope) -> AppResult<Vec<SubmissionRecord>>;

    /// Move a pending submission to the verified list. `false` if not pending.
    async fn verify(&self, id: i64, reviewer: &str) -> AppResult<bool>;

    /// Delete a pending submission. `false` if not pending.
    async fn reject(&self, id: i64) -> AppResult<bool>;
}

/// Sort records into list order for `scope`.
pub(crate) fn sort_for_scope(records: &mut [SubmissionRecord], scope: Scope) {
    match scope {
        Scope::Pending => records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        }),
        Scope::Verified => records.sort_by(|a, b| {
            b.verified_at
                .cmp(&a.verified_at)
                .then_with(|| b.id.cmp(&a.id))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: i64, created: i64, verified: Option<i64>) -> SubmissionRecord {
        SubmissionRecord {
            id,
            original_submission_id: None,
            created_at: Utc.timestamp_opt(created, 0).unwrap(),
            verified_at: verified.map(|v| Utc.timestamp_opt(v, 0).unwrap()),
            verified_by: None,
            form_data: serde_json::json!({}),
        }
    }

    #[test]
    fn test_scope_resolve() {
        assert_eq!(Scope::resolve(Some("verified")), Scope::Verified);
        assert_eq!(Scope::resolve(Some("pending")), Scope::Pending);
        assert_eq!(Scope::resolve(Some("VERIFIED")), Scope::Pending);
        assert_eq!(Scope::resolve(None), Scope::Pending);
    }

    #[test]
    fn test_pending_order() {
        let mut records = vec![record(1, 100, None), record(3, 200, None), record(2, 200, None)];
        sort_for_scope(&mut records, Scope::Pending);
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_verified_order() {
        let mut records = vec![
            record(1, 500, Some(900)),
            record(2, 100, Some(1000)),
            record(3, 300, Some(900)),
        ];
        sort_for_scope(&mut records, Scope::Verified);
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
