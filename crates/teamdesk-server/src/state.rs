//! Application state for the onboarding server.
//!
//! This module defines the shared application state that is
//! passed to all handlers via Axum's state management.

use std::sync::Arc;

use crate::auth::TokenSigner;
use crate::config::AppConfig;
use crate::services::{AdminService, SubmissionService};
use crate::store::SubmissionStore;

/// Shared application state.
///
/// Cloned into every handler; all members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// Submission backend
    pub store: Arc<dyn SubmissionStore>,

    /// Admin token signer, shared with the auth middleware
    pub signer: Arc<TokenSigner>,

    /// Application configuration
    pub config: Arc<AppConfig>,

    pub submissions: SubmissionService,
    pub admin: AdminService,

    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `store` - Initialised submission backend
    /// * `signer` - Admin token signer
    /// * `config` - Application configuration
    pub fn new(store: Arc<dyn SubmissionStore>, signer: TokenSigner, config: AppConfig) -> Self {
        let signer = Arc::new(signer);
        Self {
            submissions: SubmissionService::new(store.clone(), config.strict_validation),
            admin: AdminService::new(store.clone(), signer.clone()),
            store,
            signer,
            config: Arc::new(config),
            start_time: std::time::Instant::now(),
        }
    }

    /// Get the server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
