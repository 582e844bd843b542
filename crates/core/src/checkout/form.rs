//! Checkout Form

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum length of the first and last names.
pub const MIN_NAME_LENGTH: usize = 2;

#[expect(clippy::expect_used, reason = "the pattern is a compile-time constant")]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Reasons a checkout form is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutFormError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email address is malformed.
    #[error("email address is invalid")]
    InvalidEmail,

    /// A field is shorter than allowed.
    #[error("{field} must be at least {min} characters")]
    TooShort {
        /// Offending field
        field: &'static str,
        /// Minimum length in characters
        min: usize,
    },
}

/// Contact and shipping details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    /// Contact email
    pub email_address: String,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Company
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Street address
    pub address: String,

    /// Apartment, suite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,

    /// City
    pub city: String,

    /// Country
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// State or province
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Postal code
    pub postal_code: String,

    /// Phone number
    pub phone: String,
}

impl CheckoutForm {
    /// Check the form, reporting the first problem found.
    ///
    /// Required fields are checked first, then the email address, then the
    /// name lengths.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutFormError`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), CheckoutFormError> {
        let required = [
            ("emailAddress", &self.email_address),
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("address", &self.address),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("phone", &self.phone),
        ];

        if let Some((field, _)) = required.into_iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(CheckoutFormError::MissingField(field));
        }

        if !EMAIL.is_match(self.email_address.trim()) {
            return Err(CheckoutFormError::InvalidEmail);
        }

        for (field, value) in [("firstName", &self.first_name), ("lastName", &self.last_name)] {
            if value.trim().chars().count() < MIN_NAME_LENGTH {
                return Err(CheckoutFormError::TooShort {
                    field,
                    min: MIN_NAME_LENGTH,
                });
            }
        }

        Ok(())
    }
}
