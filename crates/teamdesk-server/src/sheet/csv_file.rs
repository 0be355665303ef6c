//! CSV encoding of flattened rows.

use crate::error::AppResult;

use super::Row;

/// Encode a header row followed by data rows.
pub fn encode<H: AsRef<str>>(headers: &[H], rows: &[Row]) -> AppResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(headers.iter().map(|h| h.as_ref()))?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| crate::error::AppError::Spreadsheet(e.to_string()))
}

/// Decode CSV into its header row and data rows.
///
/// Rows may be ragged; callers pad or truncate as needed.
pub fn decode(bytes: &[u8]) -> AppResult<(Vec<String>, Vec<Row>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok((headers, rows))
}
