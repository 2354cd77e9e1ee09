//! Headless contact screen.
//!
//! # Responsibility
//! - Turn the observed contact collection into a render model.
//! - Route form submissions and delete actions to the view model.
//!
//! # Invariants
//! - List entries are keyed by contact id, in store order.
//! - Only a submission that passed full-form validation reaches the view model.

use super::form::ContactForm;
use super::view_model::ContactViewModel;
use crate::model::contact::{Contact, ContactId};
use crate::validation::FormErrors;

pub const EMPTY_STATE_MESSAGE: &str = "No contacts found";
pub const ADD_CONTACT_ACTION: &str = "Add Contact";
pub const SAVED_CONFIRMATION: &str = "Contact saved successfully";

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEntryView {
    pub key: ContactId,
    pub name: String,
    pub mobile_number: String,
    /// `tel:` URI opened when the number is tapped.
    pub dial_uri: String,
    pub email_address: String,
    /// `mailto:` URI opened when the email is tapped.
    pub mail_uri: String,
    pub description: Option<String>,
}

impl From<&Contact> for ContactEntryView {
    fn from(contact: &Contact) -> Self {
        Self {
            key: contact.id,
            name: contact.name.clone(),
            mobile_number: contact.mobile_number.clone(),
            dial_uri: format!("tel:{}", contact.mobile_number),
            email_address: contact.email_address.clone(),
            mail_uri: format!("mailto:{}", contact.email_address),
            description: contact.visible_description().map(str::to_string),
        }
    }
}

/// Contact list body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactListView {
    Empty {
        message: &'static str,
        action: &'static str,
    },
    Entries(Vec<ContactEntryView>),
}

pub fn render_contact_list(contacts: &[Contact]) -> ContactListView {
    if contacts.is_empty() {
        return ContactListView::Empty {
            message: EMPTY_STATE_MESSAGE,
            action: ADD_CONTACT_ACTION,
        };
    }

    ContactListView::Entries(contacts.iter().map(ContactEntryView::from).collect())
}

/// Result of pressing "save" on the creation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Insert dispatched and the form closed.
    Saved { confirmation: &'static str },
    /// Form stays open with inline errors.
    Rejected(FormErrors),
}

/// Contact screen wiring the list, the creation form and the view model.
pub struct ContactScreen {
    view_model: ContactViewModel,
    form: ContactForm,
}

impl ContactScreen {
    pub fn new(view_model: ContactViewModel) -> Self {
        Self {
            view_model,
            form: ContactForm::new(),
        }
    }

    pub fn view_model(&self) -> &ContactViewModel {
        &self.view_model
    }

    /// Renders the latest observed collection.
    pub fn view(&self) -> ContactListView {
        render_contact_list(&self.view_model.current_contacts())
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    pub fn open_form(&mut self) {
        self.form.open();
    }

    pub fn submit_form(&mut self) -> SubmitOutcome {
        match self.form.submit() {
            Ok(contact) => {
                self.view_model.insert_contact(contact);
                SubmitOutcome::Saved {
                    confirmation: SAVED_CONFIRMATION,
                }
            }
            Err(errors) => SubmitOutcome::Rejected(errors),
        }
    }

    pub fn delete(&self, id: ContactId) {
        self.view_model.delete_contact(id);
    }

    /// Tears the screen down after queued writes are applied.
    pub async fn close(self) {
        self.view_model.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::{render_contact_list, ContactListView, EMPTY_STATE_MESSAGE};
    use crate::model::contact::Contact;

    #[test]
    fn empty_collection_renders_call_to_action() {
        assert_eq!(
            render_contact_list(&[]),
            ContactListView::Empty {
                message: EMPTY_STATE_MESSAGE,
                action: "Add Contact",
            }
        );
    }

    #[test]
    fn entries_carry_intents_and_hide_blank_description() {
        let contacts = vec![
            Contact {
                id: 7,
                name: "Ann".to_string(),
                mobile_number: "12345".to_string(),
                email_address: "ann@x.com".to_string(),
                description: "  ".to_string(),
            },
            Contact {
                id: 9,
                name: "Bob".to_string(),
                mobile_number: "555".to_string(),
                email_address: "bob@example.com".to_string(),
                description: "plumber".to_string(),
            },
        ];

        let ContactListView::Entries(entries) = render_contact_list(&contacts) else {
            panic!("expected entries");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, 7);
        assert_eq!(entries[0].dial_uri, "tel:12345");
        assert_eq!(entries[0].mail_uri, "mailto:ann@x.com");
        assert_eq!(entries[0].description, None);
        assert_eq!(entries[1].description.as_deref(), Some("plumber"));
    }
}
