//! XLSX export.

use rust_xlsxwriter::{Format, Workbook};

use crate::error::AppResult;

use super::Row;

/// MIME type of an XLSX workbook.
pub const CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Build a single-sheet workbook with a bold header row.
pub fn encode<H: AsRef<str>>(sheet_name: &str, headers: &[H], rows: &[Row]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header.as_ref(), &bold)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            if !cell.is_empty() {
                worksheet.write_string(row_num, col as u16, cell.as_str())?;
            }
        }
    }

    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_produces_zip_container() {
        let rows = vec![vec!["Asha".to_string(), String::new(), "Finance".to_string()]];
        let bytes = encode("Employees", &["First Name", "Last Name", "Department"], &rows).unwrap();
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_invalid_sheet_name_is_rejected() {
        let result = encode::<&str>("bad/name", &[], &[]);
        assert!(result.is_err());
    }
}
