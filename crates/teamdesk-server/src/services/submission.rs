//! Submission workflow: intake, review lists, approval and export.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::form::{check_formats, check_required, FormData};
use crate::sheet::{self, csv_file, workbook, Row, HEADERS, SHEET_NAME};
use crate::store::{NewSubmission, Scope, SubmissionRecord, SubmissionStore};

const NOT_PENDING: &str = "Submission not found or already processed";

/// Flattened rows keyed by header.
#[derive(Debug, Clone, Serialize)]
pub struct EntryTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Map<String, Value>>,
}

/// One line of the review list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSummary {
    pub id: i64,
    pub original_submission_id: i64,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
    pub verified_by: Option<String>,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub designation: String,
    pub form_data: Value,
}

impl From<SubmissionRecord> for SubmissionSummary {
    fn from(record: SubmissionRecord) -> Self {
        let form = FormData::from_value(&record.form_data);
        Self {
            id: record.id,
            original_submission_id: record.original_submission_id.unwrap_or(record.id),
            created_at: record.created_at,
            verified_at: record.verified_at,
            verified_by: record.verified_by,
            full_name: form.display_name(),
            email: form.contact_email().to_string(),
            department: form.company.department,
            designation: form.company.designation,
            form_data: record.form_data,
        }
    }
}

/// Download format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => workbook::CONTENT_TYPE,
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

/// An encoded spreadsheet ready to send.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Parse a path id. Only positive integers name a submission.
pub fn parse_submission_id(raw: &str) -> AppResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest("Invalid submission id".to_string())),
    }
}

/// Extract the trimmed `reviewerName` from a review request body.
pub fn reviewer_name(body: Option<&Value>) -> AppResult<String> {
    let name = body
        .and_then(|b| b.get("reviewerName"))
        .map(crate::form::value_to_text)
        .unwrap_or_default();
    let name = name.trim();

    if name.is_empty() {
        return Err(AppError::BadRequest("Reviewer name is required".to_string()));
    }
    Ok(name.to_string())
}

/// Service for submission operations.
#[derive(Clone)]
pub struct SubmissionService {
    store: Arc<dyn SubmissionStore>,
    strict: bool,
}

impl SubmissionService {
    /// Create a new submission service.
    ///
    /// # Arguments
    ///
    /// * `store` - Backend holding submissions
    /// * `strict` - Apply field format rules on intake
    pub fn new(store: Arc<dyn SubmissionStore>, strict: bool) -> Self {
        Self { store, strict }
    }

    /// Validate and persist a submitted document.
    ///
    /// The raw document is stored as submitted; validation runs on the
    /// lenient typed view.
    pub async fn submit(&self, raw: Value) -> AppResult<NewSubmission> {
        let form = FormData::from_value(&raw);
        check_required(&form)?;

        if self.strict {
            let errors = check_formats(&form, Utc::now().date_naive());
            if !errors.is_empty() {
                tracing::info!(fields = errors.len(), "Submission rejected by format rules");
                return Err(AppError::InvalidFields(errors));
            }
        }

        let saved = self.store.save(raw).await?;
        tracing::info!(
            submission_id = saved.id,
            employee = %form.display_name(),
            "Submission saved"
        );
        Ok(saved)
    }

    /// Flattened rows of every submission in `scope`, in list order.
    pub async fn entries(&self, scope: Scope) -> AppResult<EntryTable> {
        let rows = self.flattened(scope).await?;
        Ok(EntryTable {
            headers: HEADERS.to_vec(),
            rows: sheet::rows_to_objects(&rows),
        })
    }

    /// Review list summaries for `scope`.
    pub async fn submissions(&self, scope: Scope) -> AppResult<Vec<SubmissionSummary>> {
        let records = self.store.list(scope).await?;
        Ok(records.into_iter().map(SubmissionSummary::from).collect())
    }

    /// Approve a pending submission.
    pub async fn verify(&self, id: i64, reviewer: &str) -> AppResult<()> {
        if !self.store.verify(id, reviewer).await? {
            return Err(AppError::NotFound(NOT_PENDING.to_string()));
        }
        tracing::info!(submission_id = id, reviewer = %reviewer, "Submission verified");
        Ok(())
    }

    /// Reject and delete a pending submission.
    pub async fn reject(&self, id: i64, reviewer: &str) -> AppResult<()> {
        if !self.store.reject(id).await? {
            return Err(AppError::NotFound(NOT_PENDING.to_string()));
        }
        tracing::info!(submission_id = id, reviewer = %reviewer, "Submission rejected");
        Ok(())
    }

    /// Encode every submission in `scope` as a spreadsheet download.
    pub async fn export(&self, scope: Scope, format: ExportFormat) -> AppResult<ExportFile> {
        let rows = self.flattened(scope).await?;
        let bytes = match format {
            ExportFormat::Xlsx => workbook::encode(SHEET_NAME, &HEADERS[..], &rows)?,
            ExportFormat::Csv => csv_file::encode(&HEADERS[..], &rows)?,
        };

        let stem = match scope {
            Scope::Pending => "employee_data",
            Scope::Verified => "verified_employee_data",
        };

        Ok(ExportFile {
            file_name: format!("{}.{}", stem, format.extension()),
            content_type: format.content_type(),
            bytes,
        })
    }

    async fn flattened(&self, scope: Scope) -> AppResult<Vec<Row>> {
        let records = self.store.list(scope).await?;
        Ok(records
            .iter()
            .flat_map(|record| sheet::build_rows(&FormData::from_value(&record.form_data)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SheetStore;
    use serde_json::json;
    use tempfile::TempDir;

    async fn service(strict: bool) -> (TempDir, SubmissionService) {
        let dir = TempDir::new().unwrap();
        let store = SheetStore::open(dir.path()).await.unwrap();
        (dir, SubmissionService::new(Arc::new(store), strict))
    }

    fn valid_form() -> Value {
        json!({
            "personal": {
                "firstName": "Asha",
                "lastName": "Verma",
                "contactNumber": "98765 43210",
                "emailAddress": "asha@example.com"
            },
            "company": { "department": "Finance", "designation": "Analyst" },
            "education": [
                { "level": "Graduate" },
                { "level": "Post Graduate" }
            ],
            "experience": [{ "company": "Acme" }]
        })
    }

    #[test]
    fn test_parse_submission_id() {
        assert_eq!(parse_submission_id("42").unwrap(), 42);
        for bad in ["0", "-3", "abc", "", "1.5"] {
            assert!(matches!(
                parse_submission_id(bad),
                Err(AppError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn test_reviewer_name() {
        assert_eq!(
            reviewer_name(Some(&json!({ "reviewerName": "  Meera  " }))).unwrap(),
            "Meera"
        );
        assert!(reviewer_name(None).is_err());
        assert!(reviewer_name(Some(&json!({ "reviewerName": "   " }))).is_err());
        assert!(reviewer_name(Some(&json!({ "reviewerName": null }))).is_err());
        assert!(reviewer_name(Some(&json!("Meera"))).is_err());
    }

    #[tokio::test]
    async fn test_submit_requires_name_and_phone() {
        let (_dir, service) = service(false).await;
        let result = service
            .submit(json!({ "personal": { "firstName": "Asha" } }))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let saved = service.submit(valid_form()).await.unwrap();
        assert_eq!(saved.id, 1);
    }

    #[tokio::test]
    async fn test_strict_mode_reports_fields() {
        let (_dir, service) = service(true).await;
        let mut form = valid_form();
        form["personal"]["emailAddress"] = json!("not-an-email");
        form["address"] = json!({ "pincode": "12" });

        match service.submit(form).await {
            Err(AppError::InvalidFields(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["personal.emailAddress", "address.pincode"]);
            }
            other => panic!("expected field errors, got {:?}", other.map(|s| s.id)),
        }

        assert!(service.submit(valid_form()).await.is_ok());
    }

    #[tokio::test]
    async fn test_entries_and_summaries() {
        let (_dir, service) = service(false).await;
        service.submit(valid_form()).await.unwrap();

        let table = service.entries(Scope::Pending).await.unwrap();
        assert_eq!(table.headers.len(), HEADERS.len());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["First Name"], "Asha");
        assert_eq!(table.rows[1]["First Name"], "");
        assert_eq!(table.rows[1]["Education Level"], "Post Graduate");
        assert_eq!(table.rows[1]["Company"], "");

        let summaries = service.submissions(Scope::Pending).await.unwrap();
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.original_submission_id, summary.id);
        assert_eq!(summary.full_name, "Asha Verma");
        assert_eq!(summary.email, "asha@example.com");
        assert_eq!(summary.department, "Finance");
        assert!(summary.verified_by.is_none());
    }

    #[tokio::test]
    async fn test_verify_then_reject_is_not_found() {
        let (_dir, service) = service(false).await;
        let saved = service.submit(valid_form()).await.unwrap();

        service.verify(saved.id, "Meera").await.unwrap();
        let result = service.reject(saved.id, "Meera").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let verified = service.submissions(Scope::Verified).await.unwrap();
        assert_eq!(verified[0].original_submission_id, saved.id);
        assert_eq!(verified[0].verified_by.as_deref(), Some("Meera"));
    }

    #[tokio::test]
    async fn test_export_names_and_formats() {
        let (_dir, service) = service(false).await;
        service.submit(valid_form()).await.unwrap();

        let csv = service
            .export(Scope::Pending, ExportFormat::Csv)
            .await
            .unwrap();
        assert_eq!(csv.file_name, "employee_data.csv");
        let text = String::from_utf8(csv.bytes).unwrap();
        assert!(text.starts_with("Salutation,First Name,"));
        assert_eq!(text.lines().count(), 3);

        let xlsx = service
            .export(Scope::Verified, ExportFormat::Xlsx)
            .await
            .unwrap();
        assert_eq!(xlsx.file_name, "verified_employee_data.xlsx");
        assert_eq!(xlsx.content_type, workbook::CONTENT_TYPE);
        assert_eq!(&xlsx.bytes[..2], b"PK");
    }
}
