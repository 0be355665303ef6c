//! Spreadsheet downloads.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use super::admin::ScopeQuery;
use crate::error::AppResult;
use crate::result_ext::FailExt;
use crate::services::{ExportFile, ExportFormat};
use crate::state::AppState;

fn attachment(file: ExportFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.bytes,
    )
        .into_response()
}

/// Excel workbook of the selected scope.
///
/// `GET /api/admin/download-excel?scope=`
pub async fn download_excel(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> AppResult<Response> {
    let file = state
        .submissions
        .export(query.resolve(), ExportFormat::Xlsx)
        .await
        .or_fail("Failed to generate Excel file")?;
    Ok(attachment(file))
}

/// CSV file of the selected scope.
///
/// `GET /api/admin/download-csv?scope=`
pub async fn download_csv(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> AppResult<Response> {
    let file = state
        .submissions
        .export(query.resolve(), ExportFormat::Csv)
        .await
        .or_fail("Failed to generate CSV file")?;
    Ok(attachment(file))
}
