//! Submission database models.
//!
//! Pending and verified submissions live in separate tables; the form
//! document is stored verbatim as JSONB.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::store::SubmissionRecord;

/// Row of `employee_submissions`.
#[derive(Debug, Clone, FromRow)]
pub struct PendingSubmissionRow {
    /// Unique submission ID
    pub id: i64,

    /// Submission timestamp
    pub created_at: DateTime<Utc>,

    /// Submitted form document
    pub form_data: serde_json::Value,
}

/// Row of `verified_employee_submissions`.
#[derive(Debug, Clone, FromRow)]
pub struct VerifiedSubmissionRow {
    pub id: i64,

    /// ID the submission had in `employee_submissions`
    pub original_submission_id: i64,

    /// Original submission timestamp
    pub created_at: DateTime<Utc>,

    pub verified_at: DateTime<Utc>,

    /// Reviewer name entered at verification
    pub verified_by: String,

    pub form_data: serde_json::Value,
}

impl From<PendingSubmissionRow> for SubmissionRecord {
    fn from(row: PendingSubmissionRow) -> Self {
        SubmissionRecord {
            id: row.id,
            original_submission_id: None,
            created_at: row.created_at,
            verified_at: None,
            verified_by: None,
            form_data: row.form_data,
        }
    }
}

impl From<VerifiedSubmissionRow> for SubmissionRecord {
    fn from(row: VerifiedSubmissionRow) -> Self {
        SubmissionRecord {
            id: row.id,
            original_submission_id: Some(row.original_submission_id),
            created_at: row.created_at,
            verified_at: Some(row.verified_at),
            verified_by: Some(row.verified_by),
            form_data: row.form_data,
        }
    }
}
