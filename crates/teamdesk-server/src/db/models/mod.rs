//! Database models for the TeamDesk onboarding server.
//!
//! SQLx row types for the submission and admin tables.

pub mod admin;
pub mod submission;

pub use admin::*;
pub use submission::*;
