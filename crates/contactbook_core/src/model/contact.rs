//! Contact records.
//!
//! # Responsibility
//! - Define the persisted `Contact` shape and the `NewContact` insert shape.
//! - Enforce field validation before any record reaches storage.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - `name`, `mobile_number` and `email_address` always pass validation.
//! - `description` may be empty but is never absent.

use crate::validation::{check_fields, FormErrors};
use serde::{Deserialize, Serialize};

/// Store-assigned contact identifier (SQLite rowid).
pub type ContactId = i64;

/// Contact as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub mobile_number: String,
    pub email_address: String,
    /// Free text, empty when the user left it blank.
    pub description: String,
}

impl Contact {
    /// Builds the persisted record from a new contact and its assigned id.
    pub fn from_new(id: ContactId, contact: NewContact) -> Self {
        Self {
            id,
            name: contact.name,
            mobile_number: contact.mobile_number,
            email_address: contact.email_address,
            description: contact.description,
        }
    }

    /// Validates user-editable fields.
    pub fn validate(&self) -> Result<(), FormErrors> {
        into_result(check_fields(
            &self.name,
            &self.mobile_number,
            &self.email_address,
        ))
    }

    /// Returns `description` when it carries visible text.
    pub fn visible_description(&self) -> Option<&str> {
        if self.description.trim().is_empty() {
            None
        } else {
            Some(self.description.as_str())
        }
    }
}

/// Contact about to be inserted. The store assigns its identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub name: String,
    pub mobile_number: String,
    pub email_address: String,
    #[serde(default)]
    pub description: String,
}

impl NewContact {
    pub fn new(
        name: impl Into<String>,
        mobile_number: impl Into<String>,
        email_address: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mobile_number: mobile_number.into(),
            email_address: email_address.into(),
            description: description.into(),
        }
    }

    /// Validates user-editable fields.
    pub fn validate(&self) -> Result<(), FormErrors> {
        into_result(check_fields(
            &self.name,
            &self.mobile_number,
            &self.email_address,
        ))
    }
}

fn into_result(errors: FormErrors) -> Result<(), FormErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
