//! FFI use-case API for mobile UI calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level contact functions to the mobile UI via FRB.
//! - Keep error semantics simple: envelopes with messages, never panics.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call goes through the one process-wide `ContactStore`.
//! - Invalid input never reaches storage; field errors come back inline.

use contactbook_core::db::DEFAULT_DB_FILE_NAME;
use contactbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, validate_field,
    validate_form, Contact, ContactField, ContactFormInput, ContactStore, FormErrors,
};
use log::error;
use once_cell::sync::OnceCell;
use std::path::PathBuf;

const DB_PATH_ENV: &str = "CONTACTBOOK_DB_PATH";
static CONTACT_STORE: OnceCell<ContactStore> = OnceCell::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Contact row returned to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    pub id: i64,
    pub name: String,
    pub mobile_number: String,
    pub email_address: String,
    pub description: String,
}

impl From<Contact> for ContactItem {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            mobile_number: contact.mobile_number,
            email_address: contact.email_address,
            description: contact.description,
        }
    }
}

/// List envelope; `items` is empty on failure and `message` explains why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    pub ok: bool,
    pub items: Vec<ContactItem>,
    pub message: String,
}

/// Inline form errors, one optional message per checked field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFieldErrors {
    pub name: Option<String>,
    pub mobile_number: Option<String>,
    pub email_address: Option<String>,
}

impl From<&FormErrors> for ContactFieldErrors {
    fn from(errors: &FormErrors) -> Self {
        Self {
            name: errors.name.map(|err| err.message().to_string()),
            mobile_number: errors.mobile_number.map(|err| err.message().to_string()),
            email_address: errors.email_address.map(|err| err.message().to_string()),
        }
    }
}

/// Generic action envelope for create/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    pub ok: bool,
    pub contact_id: Option<i64>,
    pub field_errors: ContactFieldErrors,
    pub message: String,
}

impl ContactActionResponse {
    fn success(message: impl Into<String>, contact_id: Option<i64>) -> Self {
        Self {
            ok: true,
            contact_id,
            field_errors: ContactFieldErrors::default(),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            field_errors: ContactFieldErrors::default(),
            message: message.into(),
        }
    }

    fn rejected(errors: &FormErrors) -> Self {
        Self {
            ok: false,
            contact_id: None,
            field_errors: errors.into(),
            message: errors.to_string(),
        }
    }
}

/// Lists every stored contact in store order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list() -> ContactListResponse {
    match shared_store().and_then(|store| store.list().map_err(|err| err.to_string())) {
        Ok(contacts) => {
            let message = if contacts.is_empty() {
                "No contacts found".to_string()
            } else {
                format!("Found {} contact(s).", contacts.len())
            };
            ContactListResponse {
                ok: true,
                items: contacts.into_iter().map(ContactItem::from).collect(),
                message,
            }
        }
        Err(err) => {
            error!("event=ffi_contacts_list module=ffi status=error error={err}");
            ContactListResponse {
                ok: false,
                items: Vec::new(),
                message: format!("contacts_list failed: {err}"),
            }
        }
    }
}

/// Validates the form and creates a contact.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Returns per-field errors without touching storage when input is invalid.
/// - Returns the store-assigned id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_create(
    name: String,
    mobile_number: String,
    email_address: String,
    description: String,
) -> ContactActionResponse {
    let input = ContactFormInput {
        name,
        mobile_number,
        email_address,
        description,
    };
    let contact = match validate_form(&input) {
        Ok(contact) => contact,
        Err(errors) => return ContactActionResponse::rejected(&errors),
    };

    match shared_store().and_then(|store| store.insert(&contact).map_err(|err| err.to_string())) {
        Ok(id) => ContactActionResponse::success("Contact saved successfully", Some(id)),
        Err(err) => {
            error!("event=ffi_contact_create module=ffi status=error error={err}");
            ContactActionResponse::failure(format!("contact_create failed: {err}"))
        }
    }
}

/// Deletes a contact by id; deleting an unknown id succeeds as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_delete(contact_id: i64) -> ContactActionResponse {
    match shared_store().and_then(|store| store.delete(contact_id).map_err(|err| err.to_string()))
    {
        Ok(true) => ContactActionResponse::success("Contact deleted.", Some(contact_id)),
        Ok(false) => ContactActionResponse::success("Contact already absent.", None),
        Err(err) => {
            error!(
                "event=ffi_contact_delete module=ffi status=error contact_id={contact_id} error={err}"
            );
            ContactActionResponse::failure(format!("contact_delete failed: {err}"))
        }
    }
}

/// Keystroke validation for one field.
///
/// `field` is one of `name|mobile_number|email_address|description`.
/// Returns the inline error text, or `None` when the value is acceptable.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_validate_field(field: String, value: String) -> Option<String> {
    let Some(field) = ContactField::parse(&field) else {
        return Some(format!("unknown field `{}`", field.trim()));
    };
    validate_field(field, &value)
        .err()
        .map(|err| err.message().to_string())
}

fn resolve_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

fn shared_store() -> Result<&'static ContactStore, String> {
    CONTACT_STORE.get_or_try_init(|| {
        let path = resolve_db_path();
        ContactStore::open(&path).map_err(|err| {
            format!("contact DB open failed at `{}`: {err}", path.display())
        })
    })
}
