//! Spreadsheet layout and codecs.
//!
//! A submission is flattened into fixed-width rows by [`layout`]; the rows
//! are then encoded as CSV ([`csv_file`]) or XLSX ([`workbook`]).

pub mod csv_file;
pub mod layout;
pub mod workbook;

pub use layout::{build_row, build_rows, form_from_rows, rows_to_objects, Row, COLUMN_COUNT, HEADERS};

/// Worksheet name used for exported workbooks.
pub const SHEET_NAME: &str = "Employees";
