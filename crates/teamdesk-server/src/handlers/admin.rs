//! Admin API handlers.
//!
//! Everything except login sits behind the bearer-token middleware.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::json_body;
use crate::auth::AdminClaims;
use crate::error::AppResult;
use crate::form::value_to_text;
use crate::result_ext::FailExt;
use crate::services::{parse_submission_id, reviewer_name, SubmissionSummary};
use crate::state::AppState;
use crate::store::Scope;

/// `?scope=pending|verified`; anything else means pending.
#[derive(Debug, Deserialize, Default)]
pub struct ScopeQuery {
    pub scope: Option<String>,
}

impl ScopeQuery {
    pub fn resolve(&self) -> Scope {
        Scope::resolve(self.scope.as_deref())
    }
}

/// Flattened entries response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntriesResponse {
    pub success: bool,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Map<String, Value>>,
    pub total_rows: usize,
    pub scope: Scope,
}

/// Review list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionsResponse {
    pub success: bool,
    pub rows: Vec<SubmissionSummary>,
    pub total_rows: usize,
    pub scope: Scope,
}

/// Admin login.
///
/// `POST /api/admin/login`
///
/// # Request Body
///
/// ```json
/// { "username": "admin", "password": "admin123" }
/// ```
pub async fn login(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<Value>> {
    let body = json_body(body)?;
    let field = |name: &str| {
        body.as_ref()
            .and_then(|b| b.get(name))
            .map(value_to_text)
            .unwrap_or_default()
    };

    let issued = state
        .admin
        .login(&field("username"), &field("password"))
        .await
        .or_fail("Login failed")?;

    Ok(Json(json!({
        "success": true,
        "token": issued.token,
        "expiresInSeconds": issued.expires_in_seconds,
    })))
}

/// Identity of the token holder.
///
/// `GET /api/admin/me`
pub async fn me(Extension(claims): Extension<AdminClaims>) -> Json<Value> {
    Json(json!({
        "success": true,
        "admin": { "username": claims.username, "role": claims.role },
    }))
}

/// Flattened spreadsheet rows.
///
/// `GET /api/admin/entries?scope=`
pub async fn entries(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> AppResult<Json<EntriesResponse>> {
    let scope = query.resolve();
    let table = state
        .submissions
        .entries(scope)
        .await
        .or_fail("Failed to read entries")?;

    Ok(Json(EntriesResponse {
        success: true,
        total_rows: table.rows.len(),
        headers: table.headers,
        rows: table.rows,
        scope,
    }))
}

/// Review list.
///
/// `GET /api/admin/submissions?scope=`
pub async fn submissions(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> AppResult<Json<SubmissionsResponse>> {
    let scope = query.resolve();
    let rows = state
        .submissions
        .submissions(scope)
        .await
        .or_fail("Failed to read submissions")?;

    Ok(Json(SubmissionsResponse {
        success: true,
        total_rows: rows.len(),
        rows,
        scope,
    }))
}

/// Approve a pending submission.
///
/// `POST /api/admin/submissions/{id}/verify`
///
/// # Request Body
///
/// ```json
/// { "reviewerName": "Meera" }
/// ```
pub async fn verify_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<Value>> {
    let id = parse_submission_id(&id)?;
    let reviewer = reviewer_name(json_body(body)?.as_ref())?;

    state
        .submissions
        .verify(id, &reviewer)
        .await
        .or_fail("Failed to verify submission")?;

    Ok(Json(json!({
        "success": true,
        "message": "Employee verified successfully",
    })))
}

/// Reject and delete a pending submission.
///
/// `DELETE /api/admin/submissions/{id}`
///
/// Takes the same body as verify.
pub async fn reject_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<Value>> {
    let id = parse_submission_id(&id)?;
    let reviewer = reviewer_name(json_body(body)?.as_ref())?;

    state
        .submissions
        .reject(id, &reviewer)
        .await
        .or_fail("Failed to reject submission")?;

    Ok(Json(json!({
        "success": true,
        "message": "Employee rejected and removed successfully",
        "rejectedBy": reviewer,
    })))
}
