use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::token::{unix_now, TokenSigner};
use crate::error::AppError;

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware to validate the admin token and inject its claims.
pub async fn require_admin(
    State(signer): State<Arc<TokenSigner>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = bearer_token(request.headers())
        .and_then(|token| signer.verify(token, unix_now()))
        .ok_or_else(|| {
            tracing::debug!(path = %request.uri().path(), "Rejected admin request without valid token");
            AppError::Auth("Unauthorized".to_string())
        })?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
