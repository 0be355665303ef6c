//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Health status ("ok")
    pub status: String,
}

/// Storage health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealthResponse {
    pub ok: bool,

    /// "connected" or "disconnected"
    pub database: String,

    /// Active storage backend
    pub storage: String,

    pub uptime_seconds: u64,
    pub version: String,
}

/// Basic liveness endpoint.
///
/// `GET /health`
///
/// # Returns
///
/// - `200 OK` with `{"status": "ok"}` if the server is running
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}

/// Storage health endpoint.
///
/// `GET /api/health`
///
/// # Returns
///
/// - `200 OK` with `ok: true` when the backend answers
/// - `500 Internal Server Error` with `ok: false` otherwise
pub async fn api_health(State(state): State<AppState>) -> (StatusCode, Json<ApiHealthResponse>) {
    let healthy = state.store.health().await;

    let status_code = if healthy {
        StatusCode::OK
    } else {
        tracing::warn!(storage = state.store.backend(), "Storage health check failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let response = ApiHealthResponse {
        ok: healthy,
        database: (if healthy { "connected" } else { "disconnected" }).to_string(),
        storage: state.store.backend().to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (status_code, Json(response))
}
