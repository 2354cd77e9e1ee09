//! Contact form field validation.
//!
//! # Responsibility
//! - Validate name / mobile number / email input before any write.
//! - Produce stable, user-facing inline error messages per field.
//!
//! # Invariants
//! - All functions are pure and synchronous.
//! - Fields are checked independently; no rule depends on another field.
//! - Input is never trimmed or rewritten, only judged.

use crate::model::contact::NewContact;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

// Same shape as the platform email-address pattern mobile clients use.
static EMAIL_ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
    )
    .expect("valid email regex")
});
// Any Unicode decimal digit (category Nd), not just ASCII 0-9.
static DECIMAL_DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{Nd}+$").expect("valid digits regex"));

/// Single-field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    NameRequired,
    MobileRequired,
    MobileNotDigits,
    EmailRequired,
    EmailInvalid,
}

impl FieldError {
    /// Inline error text shown under the offending field.
    pub fn message(self) -> &'static str {
        match self {
            Self::NameRequired => "Name is required",
            Self::MobileRequired => "Mobile number is required",
            Self::MobileNotDigits => "Mobile number should contain only digits",
            Self::EmailRequired => "Email is required",
            Self::EmailInvalid => "Enter a valid email address",
        }
    }

    /// Field this error belongs to.
    pub fn field(self) -> ContactField {
        match self {
            Self::NameRequired => ContactField::Name,
            Self::MobileRequired | Self::MobileNotDigits => ContactField::MobileNumber,
            Self::EmailRequired | Self::EmailInvalid => ContactField::EmailAddress,
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for FieldError {}

/// Editable fields of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    MobileNumber,
    EmailAddress,
    Description,
}

impl ContactField {
    /// Parses a wire name (`name|mobile_number|email_address|description`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "mobile" | "mobile_number" | "mobilenumber" => Some(Self::MobileNumber),
            "email" | "email_address" | "emailaddress" => Some(Self::EmailAddress),
            "description" => Some(Self::Description),
            _ => None,
        }
    }
}

/// Per-field errors collected by a full-form check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub name: Option<FieldError>,
    pub mobile_number: Option<FieldError>,
    pub email_address: Option<FieldError>,
}

impl FormErrors {
    /// Returns `true` when every field passed.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.mobile_number.is_none() && self.email_address.is_none()
    }

    /// Returns the error recorded for `field`, if any.
    pub fn get(&self, field: ContactField) -> Option<FieldError> {
        match field {
            ContactField::Name => self.name,
            ContactField::MobileNumber => self.mobile_number,
            ContactField::EmailAddress => self.email_address,
            ContactField::Description => None,
        }
    }

    /// Records (or clears) the error for `field`.
    pub fn set(&mut self, field: ContactField, error: Option<FieldError>) {
        match field {
            ContactField::Name => self.name = error,
            ContactField::MobileNumber => self.mobile_number = error,
            ContactField::EmailAddress => self.email_address = error,
            ContactField::Description => {}
        }
    }

    /// Iterates over recorded errors in form order.
    pub fn iter(&self) -> impl Iterator<Item = FieldError> + '_ {
        [self.name, self.mobile_number, self.email_address]
            .into_iter()
            .flatten()
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages = self.iter().map(FieldError::message).collect::<Vec<_>>();
        if messages.is_empty() {
            return f.write_str("no validation errors");
        }
        f.write_str(&messages.join("; "))
    }
}

impl Error for FormErrors {}

/// Raw form input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormInput {
    pub name: String,
    pub mobile_number: String,
    pub email_address: String,
    pub description: String,
}

pub fn validate_name(value: &str) -> Result<(), FieldError> {
    if is_blank(value) {
        return Err(FieldError::NameRequired);
    }
    Ok(())
}

pub fn validate_mobile_number(value: &str) -> Result<(), FieldError> {
    if is_blank(value) {
        return Err(FieldError::MobileRequired);
    }
    if !DECIMAL_DIGITS_RE.is_match(value) {
        return Err(FieldError::MobileNotDigits);
    }
    Ok(())
}

pub fn validate_email_address(value: &str) -> Result<(), FieldError> {
    if is_blank(value) {
        return Err(FieldError::EmailRequired);
    }
    if !EMAIL_ADDRESS_RE.is_match(value) {
        return Err(FieldError::EmailInvalid);
    }
    Ok(())
}

/// Validates one field by kind. Description is free text and always passes.
pub fn validate_field(field: ContactField, value: &str) -> Result<(), FieldError> {
    match field {
        ContactField::Name => validate_name(value),
        ContactField::MobileNumber => validate_mobile_number(value),
        ContactField::EmailAddress => validate_email_address(value),
        ContactField::Description => Ok(()),
    }
}

/// Checks all fields at once and collects every failure.
pub fn check_fields(name: &str, mobile_number: &str, email_address: &str) -> FormErrors {
    FormErrors {
        name: validate_name(name).err(),
        mobile_number: validate_mobile_number(mobile_number).err(),
        email_address: validate_email_address(email_address).err(),
    }
}

/// Re-checks the whole form and builds the record to persist.
///
/// # Errors
/// - Returns every failing field when at least one check fails.
pub fn validate_form(input: &ContactFormInput) -> Result<NewContact, FormErrors> {
    let errors = check_fields(&input.name, &input.mobile_number, &input.email_address);
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewContact {
        name: input.name.clone(),
        mobile_number: input.mobile_number.clone(),
        email_address: input.email_address.clone(),
        description: input.description.clone(),
    })
}

fn is_blank(value: &str) -> bool {
    value.chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        for value in ["", " ", "\t\n", "   "] {
            assert_eq!(validate_name(value), Err(FieldError::NameRequired));
        }
        assert_eq!(validate_name("Ann"), Ok(()));
    }

    #[test]
    fn mobile_number_requires_only_digits() {
        assert_eq!(validate_mobile_number(""), Err(FieldError::MobileRequired));
        assert_eq!(validate_mobile_number("  "), Err(FieldError::MobileRequired));
        for value in ["12a45", "+4412", "123 456", "12-34", "½", "Ⅻ", "²³"] {
            assert_eq!(
                validate_mobile_number(value),
                Err(FieldError::MobileNotDigits),
                "{value}"
            );
        }
        for value in ["0123456789", "١٢٣", "１２３", "०१२"] {
            assert_eq!(validate_mobile_number(value), Ok(()), "{value}");
        }
    }

    #[test]
    fn email_requires_standard_syntax() {
        assert_eq!(validate_email_address(""), Err(FieldError::EmailRequired));
        for value in ["bob@", "bob.com", "@example.com", "bob@example", "bob@.com", "a b@c.com"] {
            assert_eq!(
                validate_email_address(value),
                Err(FieldError::EmailInvalid),
                "{value}"
            );
        }
        for value in ["bob@example.com", "ann@x.com", "first.last+tag@mail.example.org"] {
            assert_eq!(validate_email_address(value), Ok(()), "{value}");
        }
    }

    #[test]
    fn validate_form_collects_every_failing_field() {
        let input = ContactFormInput {
            name: String::new(),
            mobile_number: "12x".to_string(),
            email_address: "bob@".to_string(),
            description: String::new(),
        };

        let errors = validate_form(&input).unwrap_err();
        assert_eq!(errors.name, Some(FieldError::NameRequired));
        assert_eq!(errors.mobile_number, Some(FieldError::MobileNotDigits));
        assert_eq!(errors.email_address, Some(FieldError::EmailInvalid));
        assert_eq!(errors.iter().count(), 3);
    }

    #[test]
    fn validate_form_keeps_values_verbatim() {
        let input = ContactFormInput {
            name: " Ann ".to_string(),
            mobile_number: "12345".to_string(),
            email_address: "ann@x.com".to_string(),
            description: String::new(),
        };

        let contact = validate_form(&input).unwrap();
        assert_eq!(contact.name, " Ann ");
        assert_eq!(contact.description, "");
    }

    #[test]
    fn field_errors_map_back_to_their_field() {
        assert_eq!(FieldError::MobileNotDigits.field(), ContactField::MobileNumber);
        assert_eq!(FieldError::EmailRequired.field(), ContactField::EmailAddress);
        assert_eq!(ContactField::parse(" Email "), Some(ContactField::EmailAddress));
        assert_eq!(ContactField::parse("phone"), None);
    }
}
