//! Client-side form validation, performed before any network call.
//!
//! Rules mirror what the remote service will enforce so malformed input is
//! caught inline instead of surfacing as an API error mid-flow.

use std::sync::LazyLock;

use chrono::{Months, NaiveDate, Utc};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{FieldError, ValidationError};
use crate::models::{Address, CustomerDetails};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());
static ZIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{5}$").unwrap());
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d{3}\) \d{3}-\d{4}$").unwrap());
static SSN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{3}-[A-Za-z0-9]{2}-[A-Za-z0-9]{4}$").unwrap());

/// Validate a login/signup email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();
    let mut fields = Vec::new();

    if trimmed.is_empty() {
        fields.push(FieldError {
            field: "email",
            message: "Email is required.".to_string(),
        });
    } else if !EMAIL_RE.is_match(trimmed) {
        fields.push(FieldError {
            field: "email",
            message: "Invalid email address.".to_string(),
        });
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { fields })
    }
}

/// The PII entry form.
///
/// `ssn` is held as a secret so it never leaks through `Debug` or logging;
/// `phone` and `ssn` carry their display masks (`(xxx) xxx-xxxx`,
/// `xxx-xx-xxxx`).
#[derive(Debug, Default)]
pub struct PiiForm {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub suffix: String,
    pub dob: Option<NaiveDate>,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub ssn: Option<SecretString>,
}

impl PiiForm {
    /// Validate every field, collecting all errors for inline display.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_at(Utc::now().date_naive())
    }

    fn validate_at(&self, today: NaiveDate) -> Result<(), ValidationError> {
        let mut fields = Vec::new();
        let mut require = |field: &'static str, value: &str, label: &str| {
            if value.trim().is_empty() {
                fields.push(FieldError {
                    field,
                    message: format!("{label} is required."),
                });
            }
        };

        require("first_name", &self.first_name, "First Name");
        require("last_name", &self.last_name, "Last Name");
        require("address1", &self.address1, "Address");
        require("city", &self.city, "City");
        require("state", &self.state, "State");

        match self.dob {
            None => fields.push(FieldError {
                field: "dob",
                message: "Date of Birth is required.".to_string(),
            }),
            Some(dob) => {
                let adult_cutoff = today
                    .checked_sub_months(Months::new(18 * 12))
                    .unwrap_or(today);
                if dob > adult_cutoff {
                    fields.push(FieldError {
                        field: "dob",
                        message: "You should be at least 18 years old.".to_string(),
                    });
                }
            }
        }

        if self.zip.trim().is_empty() {
            fields.push(FieldError {
                field: "zip",
                message: "Zip Code is required.".to_string(),
            });
        } else if !ZIP_RE.is_match(self.zip.trim()) {
            fields.push(FieldError {
                field: "zip",
                message: "Invalid Zip Code.".to_string(),
            });
        }

        if self.phone.trim().is_empty() {
            fields.push(FieldError {
                field: "phone",
                message: "Phone Number is required.".to_string(),
            });
        } else if !PHONE_RE.is_match(self.phone.trim()) {
            fields.push(FieldError {
                field: "phone",
                message: "Invalid Phone Number.".to_string(),
            });
        }

        match &self.ssn {
            None => fields.push(FieldError {
                field: "ssn",
                message: "SSN is required.".to_string(),
            }),
            Some(ssn) => {
                let exposed = ssn.expose_secret();
                if exposed.trim().is_empty() {
                    fields.push(FieldError {
                        field: "ssn",
                        message: "SSN is required.".to_string(),
                    });
                } else if !SSN_RE.is_match(exposed.trim()) {
                    fields.push(FieldError {
                        field: "ssn",
                        message: "Invalid Social Security Number.".to_string(),
                    });
                }
            }
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields })
        }
    }

    /// Convert a validated form into the customer-details payload, stripping
    /// the phone display mask.
    pub fn to_details(&self) -> CustomerDetails {
        let optional = |s: &str| {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        };
        CustomerDetails {
            first_name: optional(&self.first_name),
            middle_name: optional(&self.middle_name),
            last_name: optional(&self.last_name),
            suffix: optional(&self.suffix),
            dob: self.dob,
            address: Some(Address {
                street1: self.address1.trim().to_string(),
                street2: optional(&self.address2),
                city: self.city.trim().to_string(),
                state: self.state.trim().to_string(),
                postal_code: self.zip.trim().to_string(),
            }),
            phone: optional(&digits_of(&self.phone)),
        }
    }
}

/// Apply the `(xxx) xxx-xxxx` display mask to raw input.
pub fn format_phone(input: &str) -> String {
    let digits: String = digits_of(input).chars().take(10).collect();
    let (area, rest) = digits.split_at(digits.len().min(3));
    let (prefix, line) = rest.split_at(rest.len().min(3));

    match (area.is_empty(), prefix.is_empty(), line.is_empty()) {
        (true, _, _) => String::new(),
        (false, true, _) => format!("({area}"),
        (false, false, true) => format!("({area}) {prefix}"),
        (false, false, false) => format!("({area}) {prefix}-{line}"),
    }
}

/// Apply the `xxx-xx-xxxx` display mask to raw input.
pub fn format_ssn(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(9)
        .collect();
    let (first, rest) = cleaned.split_at(cleaned.len().min(3));
    let (middle, last) = rest.split_at(rest.len().min(2));

    match (first.is_empty(), middle.is_empty(), last.is_empty()) {
        (true, _, _) => String::new(),
        (false, true, _) => first.to_string(),
        (false, false, true) => format!("{first}-{middle}"),
        (false, false, false) => format!("{first}-{middle}-{last}"),
    }
}

fn digits_of(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}
