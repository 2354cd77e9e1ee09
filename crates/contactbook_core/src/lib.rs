//! Core domain logic for the contact book.
//! This crate is the single source of truth for contact invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod repo;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::contact::{Contact, ContactId, NewContact};
pub use presentation::form::{ContactForm, FormPhase};
pub use presentation::screen::{
    render_contact_list, ContactEntryView, ContactListView, ContactScreen, SubmitOutcome,
};
pub use presentation::view_model::{ContactViewModel, WriteFailure, WriteOperation};
pub use repo::contact_repo::{ContactRepository, RepoError, RepoResult, SqliteContactRepository};
pub use service::contact_store::ContactStore;
pub use validation::{
    validate_email_address, validate_field, validate_form, validate_mobile_number, validate_name,
    ContactField, ContactFormInput, FieldError, FormErrors,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
