//! Database queries for the TeamDesk onboarding server.
//!
//! This module contains database query functions organized by table.

pub mod admin;
pub mod submission;
