//! Admin login.

use serde::Serialize;
use std::sync::Arc;

use crate::auth::{password, token::unix_now, TokenSigner};
use crate::error::{AppError, AppResult};
use crate::store::SubmissionStore;

/// Issued token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in_seconds: i64,
}

/// Service for admin authentication.
#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn SubmissionStore>,
    signer: Arc<TokenSigner>,
}

impl AdminService {
    pub fn new(store: Arc<dyn SubmissionStore>, signer: Arc<TokenSigner>) -> Self {
        Self { store, signer }
    }

    /// Check credentials against the stored admin account and issue a token.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let admin = self.store.find_admin(username).await?;

        let Some(admin) = admin.filter(|a| password::password_matches(password, &a.password_hash))
        else {
            tracing::warn!(username = %username, "Admin login failed");
            return Err(AppError::Auth("Invalid username or password".to_string()));
        };

        let token = self.signer.issue(&admin.username, unix_now())?;
        tracing::info!(username = %admin.username, "Admin logged in");

        Ok(LoginResponse {
            token,
            expires_in_seconds: self.signer.ttl_seconds(),
        })
    }
}
