//! Configuration module for the TeamDesk onboarding server.
//!
//! This module provides configuration loading from environment variables
//! using the `envy` crate for type-safe environment variable parsing.

mod admin;
mod app;
mod database;

pub use admin::AdminConfig;
pub use app::{AppConfig, LogFormat, StorageBackend};
pub use database::DatabaseConfig;
