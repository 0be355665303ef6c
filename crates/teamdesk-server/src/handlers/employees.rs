//! Employee form intake.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::json_body;
use crate::error::AppResult;
use crate::result_ext::FailExt;
use crate::state::AppState;

/// Response to a saved submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub submission_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Submit the onboarding form.
///
/// `POST /api/employees`
///
/// The body is the nested form document. A missing or non-JSON body is
/// treated as an empty form and fails the required-field check.
///
/// # Returns
///
/// - `201 Created` with the new submission id
/// - `400 Bad Request` when required or (strict mode) formatted fields are invalid
/// - `413 Payload Too Large` when the body exceeds the configured limit
pub async fn submit_employee(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<(StatusCode, Json<SubmitResponse>)> {
    let raw = json_body(body)?.unwrap_or_else(|| serde_json::json!({}));

    let saved = state
        .submissions
        .submit(raw)
        .await
        .or_fail("Failed to save employee data")?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            message: "Employee data saved successfully".to_string(),
            submission_id: saved.id,
            created_at: saved.created_at,
        }),
    ))
}
