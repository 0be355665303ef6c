//! Business logic services.
//!
//! Services sit between the HTTP handlers and the submission store. They
//! validate input, call the store and shape the results.

pub mod admin;
pub mod submission;

pub use admin::{AdminService, LoginResponse};
pub use submission::{
    parse_submission_id, reviewer_name, EntryTable, ExportFile, ExportFormat, SubmissionService,
    SubmissionSummary,
};
