//! Server-side submission checks.
//!
//! [`check_required`] is always applied. [`check_formats`] mirrors the
//! browser form's field rules and runs only in strict mode.

use chrono::{Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::FormData;
use crate::error::{AppError, AppResult, FieldError};

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").unwrap());

/// Minimum applicant age in months.
const MIN_AGE_MONTHS: u32 = 18 * 12;

/// Reject submissions without a first name or contact number.
pub fn check_required(form: &FormData) -> AppResult<()> {
    if form.personal.first_name.is_empty() || form.personal.contact_number.is_empty() {
        return Err(AppError::Validation(
            "Missing required employee details".to_string(),
        ));
    }
    Ok(())
}

fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn is_n_digits(value: &str, n: usize) -> bool {
    value.len() == n && value.chars().all(|c| c.is_ascii_digit())
}

/// Field format rules. Returns every failing field; empty means valid.
pub fn check_formats(form: &FormData, today: NaiveDate) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let emails = [
        ("personal.emailAddress", &form.personal.email_address),
        ("address.personalEmail", &form.address.personal_email),
        ("address.companyEmail", &form.address.company_email),
    ];
    for (field, value) in emails {
        if !value.is_empty() && !EMAIL.is_match(value) {
            errors.push(FieldError::new(field, "Please enter a valid email address"));
        }
    }

    let phone = digits_only(&form.personal.contact_number);
    if phone.len() != 10 {
        errors.push(FieldError::new(
            "personal.contactNumber",
            "Please enter a valid 10-digit mobile number",
        ));
    }

    let aadhar: String = form
        .identification
        .aadhar_number
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if !aadhar.is_empty() && !is_n_digits(&aadhar, 12) {
        errors.push(FieldError::new(
            "identification.aadharNumber",
            "Please enter a valid 12-digit Aadhar number",
        ));
    }

    let pan = form.identification.pan_number.to_uppercase();
    if !pan.is_empty() && !PAN.is_match(&pan) {
        errors.push(FieldError::new(
            "identification.panNumber",
            "Please enter a valid PAN number",
        ));
    }

    let pincode = &form.address.pincode;
    if !pincode.is_empty() && !is_n_digits(pincode, 6) {
        errors.push(FieldError::new(
            "address.pincode",
            "Please enter a valid 6-digit pincode",
        ));
    }

    let dob = &form.personal.date_of_birth;
    if !dob.is_empty() {
        match NaiveDate::parse_from_str(dob, "%Y-%m-%d") {
            Ok(date) => {
                let latest = today.checked_sub_months(Months::new(MIN_AGE_MONTHS));
                if latest.map(|l| date > l).unwrap_or(true) {
                    errors.push(FieldError::new(
                        "personal.dateOfBirth",
                        "You must be at least 18 years old",
                    ));
                }
            }
            Err(_) => {
                errors.push(FieldError::new(
                    "personal.dateOfBirth",
                    "Please enter a valid date",
                ));
            }
        }
    }

    errors
}
