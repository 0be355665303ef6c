//! Onboarding form data model and validation.
//!
//! The browser posts one nested JSON document per employee. Decoding is
//! lenient: absent or mistyped sections become empty, scalar values are
//! rendered as text, so a submission always flattens to a full row.

mod lenient;
pub mod model;
pub mod validate;

pub use model::{Address, Company, Education, Experience, FormData, Identification, Other, Personal};
pub use validate::{check_formats, check_required};

pub(crate) use lenient::value_to_text;
