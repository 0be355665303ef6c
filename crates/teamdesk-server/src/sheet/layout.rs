//! Flattening a submission into spreadsheet rows.
//!
//! Each submission yields one row per education/experience pairing. The
//! first row carries the main (personal through declarations) columns,
//! continuation rows leave them blank. Missing entries are blank-padded so
//! every row is exactly [`COLUMN_COUNT`] cells wide.

use serde_json::{Map, Value};

use crate::form::{Address, Company, Education, Experience, FormData, Identification, Other, Personal};

/// Columns carrying personal, company, address, identification and declaration data.
pub const MAIN_COLUMNS: usize = Personal::FIELD_COUNT
    + Company::FIELD_COUNT
    + Address::FIELD_COUNT
    + Identification::FIELD_COUNT
    + Other::FIELD_COUNT;

pub const EDUCATION_COLUMNS: usize = Education::FIELD_COUNT;

pub const EXPERIENCE_COLUMNS: usize = Experience::FIELD_COUNT;

pub const COLUMN_COUNT: usize = MAIN_COLUMNS + EDUCATION_COLUMNS + EXPERIENCE_COLUMNS;

/// Column headers in row order.
pub const HEADERS: [&str; COLUMN_COUNT] = [
    "Salutation",
    "First Name",
    "Last Name",
    "Full Name",
    "Father's Name",
    "Date of Joining",
    "Contact Number",
    "Email Address",
    "Gender",
    "Marital Status",
    "Date of Birth",
    "Blood Group",
    "Branch",
    "Department",
    "Designation",
    "Report To",
    "Personal Email",
    "Company Email",
    "Current Address",
    "Permanent Address",
    "Country",
    "State",
    "District",
    "City",
    "Pincode",
    "Aadhar Number",
    "PAN Number",
    "Passport Number",
    "Previous Interview",
    "Previous Interview Details",
    "Criminal Case",
    "Criminal Case Details",
    "Disability",
    "Disability Details",
    "E-Signature",
    "Signature Date",
    "Signature Place",
    "Education Level",
    "Qualification",
    "Year of Passing",
    "Institute Name",
    "Board/University",
    "Percentage",
    "Specialization",
    "Company",
    "Job Designation",
    "From Date",
    "To Date",
    "Company Address",
    "Company Contact",
    "CTC (Annual)",
    "Reason for Leaving",
];

/// One flattened spreadsheet row.
pub type Row = Vec<String>;

fn push_cells(row: &mut Row, cells: Vec<&str>) {
    row.extend(cells.into_iter().map(String::from));
}

fn push_blanks(row: &mut Row, count: usize) {
    row.extend(std::iter::repeat_with(String::new).take(count));
}

/// Build a single row from the given education and experience slots.
pub fn build_row(form: &FormData, edu_index: usize, exp_index: usize, include_main: bool) -> Row {
    let mut row = Row::with_capacity(COLUMN_COUNT);

    if include_main {
        push_cells(&mut row, form.personal.cells());
        push_cells(&mut row, form.company.cells());
        push_cells(&mut row, form.address.cells());
        push_cells(&mut row, form.identification.cells());
        push_cells(&mut row, form.other.cells());
    } else {
        push_blanks(&mut row, MAIN_COLUMNS);
    }

    match form.education.get(edu_index).and_then(Option::as_ref) {
        Some(edu) => push_cells(&mut row, edu.cells()),
        None => push_blanks(&mut row, EDUCATION_COLUMNS),
    }

    match form.experience.get(exp_index).and_then(Option::as_ref) {
        Some(exp) => push_cells(&mut row, exp.cells()),
        None => push_blanks(&mut row, EXPERIENCE_COLUMNS),
    }

    row
}

/// Flatten a submission into all of its rows.
pub fn build_rows(form: &FormData) -> Vec<Row> {
    let mut rows = vec![build_row(form, 0, 0, true)];
    for i in 1..form.row_span() {
        rows.push(build_row(form, i, i, false));
    }
    rows
}

/// Key each row's cells by header, preserving column order.
pub fn rows_to_objects(rows: &[Row]) -> Vec<Map<String, Value>> {
    rows.iter()
        .map(|row| {
            HEADERS
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let cell = row.get(i).cloned().unwrap_or_default();
                    (header.to_string(), Value::String(cell))
                })
                .collect()
        })
        .collect()
}

/// Split off `count` cells starting at `start`, tolerating short rows.
fn block(row: &[String], start: usize, count: usize) -> &[String] {
    let end = (start + count).min(row.len());
    row.get(start..end).unwrap_or(&[])
}

fn slots_from_blocks<T>(blocks: Vec<Option<T>>) -> Vec<Option<T>> {
    let mut slots = blocks;
    while matches!(slots.last(), Some(None)) {
        slots.pop();
    }
    slots
}

/// Rebuild a submission from its flattened rows.
///
/// The main columns are read from the first row. Each row contributes one
/// education and one experience slot; all-blank blocks become empty slots
/// and trailing empty slots are dropped.
pub fn form_from_rows(rows: &[Row]) -> FormData {
    let Some(first) = rows.first() else {
        return FormData::default();
    };

    let mut offset = 0;
    let mut take = move |count: usize| {
        let cells = block(first, offset, count);
        offset += count;
        cells
    };
    let personal = Personal::from_cells(take(Personal::FIELD_COUNT));
    let company = Company::from_cells(take(Company::FIELD_COUNT));
    let address = Address::from_cells(take(Address::FIELD_COUNT));
    let identification = Identification::from_cells(take(Identification::FIELD_COUNT));
    let other = Other::from_cells(take(Other::FIELD_COUNT));

    let education = rows
        .iter()
        .map(|row| {
            let edu = Education::from_cells(block(row, MAIN_COLUMNS, EDUCATION_COLUMNS));
            (!edu.is_blank()).then_some(edu)
        })
        .collect();

    let experience = rows
        .iter()
        .map(|row| {
            let exp = Experience::from_cells(block(
                row,
                MAIN_COLUMNS + EDUCATION_COLUMNS,
                EXPERIENCE_COLUMNS,
            ));
            (!exp.is_blank()).then_some(exp)
        })
        .collect();

    FormData {
        personal,
        company,
        address,
        identification,
        education: slots_from_blocks(education),
        experience: slots_from_blocks(experience),
        other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> FormData {
        FormData::from_value(&json!({
            "personal": { "salutation": "Ms", "firstName": "Asha", "contactNumber": "9876543210" },
            "company": { "department": "Finance" },
            "other": { "signaturePlace": "Pune" },
            "education": [
                { "level": "UG", "qualification": "B.Com" },
                { "level": "PG", "qualification": "MBA" },
                { "level": "Cert", "qualification": "CFA L1" }
            ],
            "experience": [
                { "company": "Acme", "ctc": "6 LPA" }
            ]
        }))
    }

    #[test]
    fn test_column_counts() {
        assert_eq!(MAIN_COLUMNS, 37);
        assert_eq!(COLUMN_COUNT, 52);
        assert_eq!(HEADERS[MAIN_COLUMNS], "Education Level");
        assert_eq!(HEADERS[MAIN_COLUMNS + EDUCATION_COLUMNS], "Company");
        assert_eq!(HEADERS[COLUMN_COUNT - 1], "Reason for Leaving");
    }

    #[test]
    fn test_one_row_per_pairing() {
        let rows = build_rows(&sample());
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == COLUMN_COUNT));

        assert_eq!(rows[0][0], "Ms");
        assert_eq!(rows[0][1], "Asha");
        assert_eq!(rows[0][13], "Finance");
        assert_eq!(rows[0][36], "Pune");
        assert_eq!(rows[0][MAIN_COLUMNS], "UG");
        assert_eq!(rows[0][MAIN_COLUMNS + EDUCATION_COLUMNS], "Acme");
        assert_eq!(rows[0][MAIN_COLUMNS + EDUCATION_COLUMNS + 6], "6 LPA");
    }

    #[test]
    fn test_continuation_rows_are_padded() {
        let rows = build_rows(&sample());
        assert!(rows[1][..MAIN_COLUMNS].iter().all(String::is_empty));
        assert_eq!(rows[1][MAIN_COLUMNS + 1], "MBA");
        assert!(rows[1][MAIN_COLUMNS + EDUCATION_COLUMNS..].iter().all(String::is_empty));
        assert_eq!(rows[2][MAIN_COLUMNS + 1], "CFA L1");
    }

    #[test]
    fn test_empty_form_is_one_blank_row() {
        let rows = build_rows(&FormData::default());
        assert_eq!(rows.len(), 1);
        assert!(rows[0].iter().all(String::is_empty));
    }

    #[test]
    fn test_null_slot_flattens_to_blanks() {
        let form = FormData::from_value(&json!({
            "experience": [null, { "company": "Beta" }]
        }));
        let rows = build_rows(&form);
        assert_eq!(rows.len(), 2);
        assert!(rows[0][MAIN_COLUMNS + EDUCATION_COLUMNS..].iter().all(String::is_empty));
        assert_eq!(rows[1][MAIN_COLUMNS + EDUCATION_COLUMNS], "Beta");
    }

    #[test]
    fn test_rows_to_objects_keys_by_header() {
        let objects = rows_to_objects(&build_rows(&sample()));
        assert_eq!(objects.len(), 3);
        assert_eq!(objects[0]["First Name"], json!("Asha"));
        assert_eq!(objects[2]["Qualification"], json!("CFA L1"));
        assert_eq!(objects[2]["First Name"], json!(""));
        let keys: Vec<&String> = objects[0].keys().collect();
        assert_eq!(keys.first().map(|k| k.as_str()), Some("Salutation"));
        assert_eq!(keys.len(), COLUMN_COUNT);
    }

    #[test]
    fn test_form_from_rows_restores_submission() {
        let form = sample();
        assert_eq!(form_from_rows(&build_rows(&form)), form);
    }

    #[test]
    fn test_form_from_rows_keeps_interior_gaps() {
        let form = FormData::from_value(&json!({
            "personal": { "firstName": "Ravi" },
            "experience": [null, { "company": "Beta" }]
        }));
        let restored = form_from_rows(&build_rows(&form));
        assert_eq!(restored.experience.len(), 2);
        assert!(restored.experience[0].is_none());
        assert!(restored.education.is_empty());
    }
}
