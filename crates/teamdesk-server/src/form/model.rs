//! Typed view of a submitted onboarding form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;

/// Declares a flat form section whose fields are all free text.
///
/// Field order is the spreadsheet column order for the section.
macro_rules! form_section {
    ($(#[$meta:meta])* $name:ident { $($field:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(
                #[serde(default, deserialize_with = "lenient::text")]
                pub $field: String,
            )+
        }

        impl $name {
            /// Number of spreadsheet columns this section occupies.
            pub const FIELD_COUNT: usize = [$(stringify!($field)),+].len();

            /// Field values in column order.
            pub fn cells(&self) -> Vec<&str> {
                vec![$(self.$field.as_str()),+]
            }

            /// Rebuild the section from cells in column order. Missing cells are blank.
            pub fn from_cells(cells: &[String]) -> Self {
                let mut cells = cells.iter();
                Self {
                    $($field: cells.next().cloned().unwrap_or_default(),)+
                }
            }

            /// True when every field is empty.
            pub fn is_blank(&self) -> bool {
                true $(&& self.$field.is_empty())+
            }
        }
    };
}

form_section! {
    /// Personal details.
    Personal {
        salutation,
        first_name,
        last_name,
        full_name,
        father_name,
        date_of_joining,
        contact_number,
        email_address,
        gender,
        marital_status,
        date_of_birth,
        blood_group,
    }
}

form_section! {
    /// Placement within the company.
    Company {
        branch,
        department,
        designation,
        report_to,
    }
}

form_section! {
    /// Contact addresses.
    Address {
        personal_email,
        company_email,
        current_address,
        permanent_address,
        country,
        state,
        district,
        city,
        pincode,
    }
}

form_section! {
    /// Government identifiers.
    Identification {
        aadhar_number,
        pan_number,
        passport_number,
    }
}

form_section! {
    /// One education entry.
    Education {
        level,
        qualification,
        year_of_passing,
        institute_name,
        board_university,
        percentage,
        specialization,
    }
}

form_section! {
    /// One previous employment.
    Experience {
        company,
        designation,
        from_date,
        to_date,
        experience_address,
        company_contact,
        ctc,
        reason_for_leaving,
    }
}

form_section! {
    /// Declarations and e-signature.
    Other {
        previous_interview,
        previous_interview_details,
        criminal_case,
        criminal_case_details,
        disability,
        disability_details,
        esignature,
        signature_date,
        signature_place,
    }
}

/// A complete onboarding submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormData {
    #[serde(deserialize_with = "lenient::section")]
    pub personal: Personal,

    #[serde(deserialize_with = "lenient::section")]
    pub company: Company,

    #[serde(deserialize_with = "lenient::section")]
    pub address: Address,

    #[serde(deserialize_with = "lenient::section")]
    pub identification: Identification,

    /// Education slots; `None` marks a slot that flattens to blanks.
    #[serde(deserialize_with = "lenient::slots")]
    pub education: Vec<Option<Education>>,

    /// Experience slots; `None` marks a slot that flattens to blanks.
    #[serde(deserialize_with = "lenient::slots")]
    pub experience: Vec<Option<Experience>>,

    #[serde(deserialize_with = "lenient::section")]
    pub other: Other,
}

impl FormData {
    /// Decode a submitted document. Never fails; see module docs.
    pub fn from_value(value: &Value) -> Self {
        if value.is_object() {
            serde_json::from_value(value.clone()).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Name shown in the review list.
    pub fn display_name(&self) -> String {
        if !self.personal.full_name.is_empty() {
            return self.personal.full_name.clone();
        }
        format!("{} {}", self.personal.first_name, self.personal.last_name)
            .trim()
            .to_string()
    }

    /// Email shown in the review list.
    pub fn contact_email(&self) -> &str {
        if !self.personal.email_address.is_empty() {
            &self.personal.email_address
        } else {
            &self.address.personal_email
        }
    }

    /// Rows this submission occupies in a flattened sheet.
    pub fn row_span(&self) -> usize {
        self.education.len().max(self.experience.len()).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_counts() {
        assert_eq!(Personal::FIELD_COUNT, 12);
        assert_eq!(Company::FIELD_COUNT, 4);
        assert_eq!(Address::FIELD_COUNT, 9);
        assert_eq!(Identification::FIELD_COUNT, 3);
        assert_eq!(Other::FIELD_COUNT, 9);
        assert_eq!(Education::FIELD_COUNT, 7);
        assert_eq!(Experience::FIELD_COUNT, 8);
    }

    #[test]
    fn test_decode_camel_case() {
        let form = FormData::from_value(&json!({
            "personal": { "firstName": "Asha", "contactNumber": 9876543210u64 },
            "education": [{ "level": "UG", "yearOfPassing": "2019-05" }],
            "experience": [{ "company": "Acme", "reasonForLeaving": "Relocation" }],
            "other": { "esignature": "Asha K" }
        }));

        assert_eq!(form.personal.first_name, "Asha");
        assert_eq!(form.personal.contact_number, "9876543210");
        let edu = form.education[0].as_ref().unwrap();
        assert_eq!(edu.year_of_passing, "2019-05");
        let exp = form.experience[0].as_ref().unwrap();
        assert_eq!(exp.reason_for_leaving, "Relocation");
        assert_eq!(form.other.esignature, "Asha K");
    }

    #[test]
    fn test_decode_mistyped_sections() {
        let form = FormData::from_value(&json!({
            "personal": "oops",
            "company": null,
            "education": "none",
            "experience": [null, { "company": "Acme" }, "text"],
        }));

        assert!(form.personal.is_blank());
        assert!(form.company.is_blank());
        assert!(form.education.is_empty());
        assert_eq!(form.experience.len(), 3);
        assert!(form.experience[0].is_none());
        assert_eq!(form.experience[1].as_ref().unwrap().company, "Acme");
        assert!(form.experience[2].as_ref().unwrap().is_blank());
    }

    #[test]
    fn test_decode_non_object() {
        assert_eq!(FormData::from_value(&json!([1, 2])), FormData::default());
        assert_eq!(FormData::from_value(&json!(null)), FormData::default());
    }

    #[test]
    fn test_display_name() {
        let mut form = FormData::default();
        form.personal.first_name = "Asha".into();
        assert_eq!(form.display_name(), "Asha");

        form.personal.last_name = "Kumar".into();
        assert_eq!(form.display_name(), "Asha Kumar");

        form.personal.full_name = "Asha R. Kumar".into();
        assert_eq!(form.display_name(), "Asha R. Kumar");
    }

    #[test]
    fn test_contact_email_fallback() {
        let mut form = FormData::default();
        form.address.personal_email = "asha@home.example".into();
        assert_eq!(form.contact_email(), "asha@home.example");

        form.personal.email_address = "asha@work.example".into();
        assert_eq!(form.contact_email(), "asha@work.example");
    }

    #[test]
    fn test_cells_round_trip_order() {
        let edu = Education {
            level: "PG".into(),
            specialization: "Finance".into(),
            ..Default::default()
        };
        let cells: Vec<String> = edu.cells().into_iter().map(String::from).collect();
        assert_eq!(cells[0], "PG");
        assert_eq!(cells[6], "Finance");
        assert_eq!(Education::from_cells(&cells), edu);
    }

    #[test]
    fn test_row_span() {
        let mut form = FormData::default();
        assert_eq!(form.row_span(), 1);
        form.education = vec![None, None, None];
        form.experience = vec![None];
        assert_eq!(form.row_span(), 3);
    }
}
