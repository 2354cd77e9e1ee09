//! Contact creation form state machine.
//!
//! # Responsibility
//! - Hold the in-progress field values and their inline errors.
//! - Re-validate a field on every edit and the whole form on submit.
//!
//! # Invariants
//! - `Closed` forms hold no input and no errors.
//! - `submit` succeeds only when all three checked fields pass together.
//! - A rejected submit returns to `Editing` with every inline error set.

use crate::model::contact::NewContact;
use crate::validation::{validate_field, validate_form, ContactField, ContactFormInput, FormErrors};
use log::debug;

/// Lifecycle phase of the creation form.
///
/// Field validation runs synchronously inside each edit, so there is no
/// resting "validating" phase to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Closed,
    Editing,
    Submitting,
}

/// Modal form used to create one contact.
#[derive(Debug, Clone)]
pub struct ContactForm {
    phase: FormPhase,
    input: ContactFormInput,
    errors: FormErrors,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            phase: FormPhase::Closed,
            input: ContactFormInput::default(),
            errors: FormErrors::default(),
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Closed
    }

    pub fn input(&self) -> &ContactFormInput {
        &self.input
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Inline error text for `field`, if any.
    pub fn error_text(&self, field: ContactField) -> Option<&'static str> {
        self.errors.get(field).map(|err| err.message())
    }

    /// Opens a blank form. Re-opening an open form keeps its input.
    pub fn open(&mut self) {
        if self.phase == FormPhase::Closed {
            self.phase = FormPhase::Editing;
            debug!("event=form_open module=presentation status=ok");
        }
    }

    /// Closes the form and discards its input.
    pub fn dismiss(&mut self) {
        self.phase = FormPhase::Closed;
        self.input = ContactFormInput::default();
        self.errors = FormErrors::default();
    }

    /// Replaces one field and re-validates only that field.
    ///
    /// Ignored while the form is closed.
    pub fn set_field(&mut self, field: ContactField, value: impl Into<String>) {
        if self.phase == FormPhase::Closed {
            return;
        }

        let value = value.into();
        self.errors.set(field, validate_field(field, &value).err());
        match field {
            ContactField::Name => self.input.name = value,
            ContactField::MobileNumber => self.input.mobile_number = value,
            ContactField::EmailAddress => self.input.email_address = value,
            ContactField::Description => self.input.description = value,
        }
        self.phase = FormPhase::Editing;
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.set_field(ContactField::Name, value);
    }

    pub fn set_mobile_number(&mut self, value: impl Into<String>) {
        self.set_field(ContactField::MobileNumber, value);
    }

    pub fn set_email_address(&mut self, value: impl Into<String>) {
        self.set_field(ContactField::EmailAddress, value);
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.set_field(ContactField::Description, value);
    }

    /// Re-checks every field and, when all pass, closes the form.
    ///
    /// # Errors
    /// - Returns the full error set and stays open when any field fails.
    ///   A closed form reports every required field as missing.
    pub fn submit(&mut self) -> Result<NewContact, FormErrors> {
        if self.phase == FormPhase::Closed {
            return Err(validate_form(&ContactFormInput::default())
                .err()
                .unwrap_or_default());
        }

        self.phase = FormPhase::Submitting;
        match validate_form(&self.input) {
            Ok(contact) => {
                debug!("event=form_submit module=presentation status=ok");
                self.dismiss();
                Ok(contact)
            }
            Err(errors) => {
                debug!(
                    "event=form_submit module=presentation status=rejected error_count={}",
                    errors.iter().count()
                );
                self.errors = errors.clone();
                self.phase = FormPhase::Editing;
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactForm, FormPhase};
    use crate::validation::{ContactField, FieldError};

    #[test]
    fn closed_form_ignores_edits() {
        let mut form = ContactForm::new();
        form.set_name("Ann");

        assert_eq!(form.phase(), FormPhase::Closed);
        assert_eq!(form.input().name, "");
    }

    #[test]
    fn edits_validate_only_the_touched_field() {
        let mut form = ContactForm::new();
        form.open();

        form.set_mobile_number("12a");
        assert_eq!(
            form.error_text(ContactField::MobileNumber),
            Some("Mobile number should contain only digits")
        );
        assert_eq!(form.errors().name, None);
        assert_eq!(form.errors().email_address, None);

        form.set_mobile_number("123");
        assert_eq!(form.errors().mobile_number, None);
    }

    #[test]
    fn rejected_submit_returns_to_editing_with_all_errors() {
        let mut form = ContactForm::new();
        form.open();
        form.set_mobile_number("123");
        form.set_email_address("a@b.com");

        let errors = form.submit().unwrap_err();

        assert_eq!(errors.name, Some(FieldError::NameRequired));
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.error_text(ContactField::Name), Some("Name is required"));
        assert_eq!(form.input().mobile_number, "123");
    }

    #[test]
    fn successful_submit_closes_and_clears() {
        let mut form = ContactForm::new();
        form.open();
        form.set_name("Ann");
        form.set_mobile_number("12345");
        form.set_email_address("ann@x.com");

        let contact = form.submit().unwrap();

        assert_eq!(contact.name, "Ann");
        assert_eq!(form.phase(), FormPhase::Closed);
        assert_eq!(form.input().name, "");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn dismiss_discards_input() {
        let mut form = ContactForm::new();
        form.open();
        form.set_name("");
        form.dismiss();
        form.open();

        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(form.errors().is_empty());
    }
}
