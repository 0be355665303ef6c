//! TeamDesk Onboarding Library
//!
//! This crate provides the backend for the TeamDesk employee onboarding form:
//!
//! - **Intake**: Accept the multi-step form as one nested JSON document
//! - **Storage**: Persist submissions in PostgreSQL or in CSV spreadsheet files
//! - **Review**: Admin token login and an approve/reject workflow
//! - **Export**: Flatten submissions into spreadsheet rows and download them
//!   as XLSX or CSV
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from environment variables
//! - [`form`]: Typed form model and validation rules
//! - [`sheet`]: Row flattening and spreadsheet codecs
//! - [`auth`]: Password hashing, signed tokens and the admin middleware
//! - [`store`]: Storage backends behind [`store::SubmissionStore`]
//! - [`services`]: Submission and admin workflows
//! - [`handlers`]: HTTP route handlers
//! - [`routes`]: Router assembly
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use teamdesk_server::{
//!     auth::TokenSigner, config::AppConfig, routes::build_router,
//!     state::AppState, store::SheetStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let store = SheetStore::open(&config.data_dir).await?;
//!     let state = AppState::new(Arc::new(store), TokenSigner::new("secret", 3600), config);
//!     let app = build_router(state);
//!     // ... bind and serve
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod form;
pub mod handlers;
pub mod result_ext;
pub mod routes;
pub mod services;
pub mod sheet;
pub mod state;
pub mod store;

pub use error::{AppError, AppResult};
pub use result_ext::{FailExt, ResultExt};
