//! Error types for the TeamDesk onboarding server.
//!
//! This module provides custom error types that implement `IntoResponse`
//! for seamless integration with Axum handlers. Every error body has the
//! shape `{"success": false, "message": "..."}`.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path of the field, e.g. `personal.contactNumber`
    pub field: String,

    /// Human readable reason
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application-level errors for the onboarding server.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Spreadsheet file storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Spreadsheet encoding error
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Not found error
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Field-level validation errors
    #[error("Invalid fields: {}", .0.len())]
    InvalidFields(Vec<FieldError>),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Bad request error
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Operation failed; the cause has already been logged
    #[error("{0}")]
    Failed(String),

    /// Request body exceeded the configured limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidFields(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_)
            | AppError::Storage(_)
            | AppError::Spreadsheet(_)
            | AppError::Failed(_)
            | AppError::Config(_)
            | AppError::Serialization(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Auth(msg)
            | AppError::BadRequest(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Failed(msg) => msg.clone(),
            AppError::InvalidFields(errors) => {
                let body = Json(json!({
                    "success": false,
                    "message": "Invalid employee details",
                    "errors": errors,
                }));
                return (status, body).into_response();
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Internal server error".to_string()
            }
            other => {
                tracing::error!(error = %other, "Unhandled error");
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Request body too large".to_string())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

impl From<envy::Error> for AppError {
    fn from(err: envy::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Spreadsheet(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::Spreadsheet(err.to_string())
    }
}
