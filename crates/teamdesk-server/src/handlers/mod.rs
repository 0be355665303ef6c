//! HTTP handlers for the onboarding API.
//!
//! This module contains all route handlers organized by domain.

pub mod admin;
pub mod employees;
pub mod export;
pub mod health;

pub use health::{api_health, health_check};

use axum::{body::Bytes, extract::rejection::BytesRejection};
use serde_json::Value;

use crate::error::AppResult;

/// Decode a request body as JSON, `None` if absent or malformed.
///
/// A body over the configured limit surfaces as a JSON `413`.
pub(crate) fn json_body(body: Result<Bytes, BytesRejection>) -> AppResult<Option<Value>> {
    let body = body?;
    if body.is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_slice(&body).ok())
}
