//! Shared contact store handle with a live subscription.
//!
//! # Responsibility
//! - Own the single SQLite connection used by every contact consumer.
//! - Pass create/update/delete/list calls through to the repository.
//! - Re-publish the full contact collection after each change.
//!
//! # Invariants
//! - One `ContactStore` is opened per process and shared through `Clone`.
//! - Subscribers always observe a complete, committed collection.
//! - A mutation that changed nothing does not notify subscribers.

use crate::db::{open_db, open_db_in_memory};
use crate::model::contact::{Contact, ContactId, NewContact};
use crate::repo::contact_repo::{
    ContactRepository, RepoError, RepoResult, SqliteContactRepository,
};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// Cloneable handle to the process-wide contact store.
#[derive(Clone)]
pub struct ContactStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    conn: Mutex<Connection>,
    contacts_tx: watch::Sender<Vec<Contact>>,
}

impl ContactStore {
    /// Opens (or creates) the contact database at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens a private in-memory contact database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps an already migrated connection.
    ///
    /// The schema is checked once here. Loads the initial snapshot so late
    /// subscribers never start blank.
    pub fn from_connection(conn: Connection) -> RepoResult<Self> {
        let initial = SqliteContactRepository::try_new(&conn)?.list_contacts()?;
        info!(
            "event=store_open module=service status=ok contact_count={}",
            initial.len()
        );
        let (contacts_tx, _) = watch::channel(initial);

        Ok(Self {
            inner: Arc::new(StoreInner {
                conn: Mutex::new(conn),
                contacts_tx,
            }),
        })
    }

    /// Inserts a contact and returns its store-assigned id.
    pub fn insert(&self, contact: &NewContact) -> RepoResult<ContactId> {
        self.mutate("contact_insert", |repo| repo.create_contact(contact))
    }

    /// Replaces every field of an existing contact.
    pub fn update(&self, contact: &Contact) -> RepoResult<()> {
        self.mutate("contact_update", |repo| repo.update_contact(contact))
    }

    /// Deletes a contact. Returns `false` (and notifies nobody) when absent.
    pub fn delete(&self, id: ContactId) -> RepoResult<bool> {
        let conn = self.lock()?;
        let repo = SqliteContactRepository::new_unchecked(&conn);
        let removed = repo.delete_contact(id)?;

        if removed {
            self.publish(&repo);
            info!("event=contact_delete module=service status=ok contact_id={id}");
        } else {
            info!("event=contact_delete module=service status=noop contact_id={id}");
        }
        Ok(removed)
    }

    pub fn get(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let conn = self.lock()?;
        SqliteContactRepository::new_unchecked(&conn).get_contact(id)
    }

    /// Reads the current collection straight from storage.
    pub fn list(&self) -> RepoResult<Vec<Contact>> {
        let conn = self.lock()?;
        SqliteContactRepository::new_unchecked(&conn).list_contacts()
    }

    /// Latest published collection without touching storage.
    pub fn snapshot(&self) -> Vec<Contact> {
        self.inner.contacts_tx.borrow().clone()
    }

    /// Subscribes to the full collection, re-delivered after every change.
    ///
    /// The current collection is readable immediately through `borrow()`.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Contact>> {
        self.inner.contacts_tx.subscribe()
    }

    // Failures are reported by the caller; only committed writes log here.
    fn mutate<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&SqliteContactRepository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let conn = self.lock()?;
        let repo = SqliteContactRepository::new_unchecked(&conn);
        let value = op(&repo)?;
        self.publish(&repo);
        info!("event={event} module=service status=ok");
        Ok(value)
    }

    // The write has already committed; a failed re-list keeps the previous
    // snapshot instead of failing the write.
    fn publish(&self, repo: &SqliteContactRepository<'_>) {
        match repo.list_contacts() {
            Ok(contacts) => {
                self.inner.contacts_tx.send_replace(contacts);
            }
            Err(err) => {
                error!("event=contacts_publish module=service status=error error={err}");
            }
        }
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.inner.conn.lock().map_err(|_| {
            error!("event=store_lock module=service status=error error_code=lock_poisoned");
            RepoError::LockPoisoned
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ContactStore;
    use crate::model::contact::NewContact;
    use crate::repo::contact_repo::RepoError;
    use rusqlite::Connection;

    fn ann() -> NewContact {
        NewContact::new("Ann", "12345", "ann@x.com", "")
    }

    #[test]
    fn insert_publishes_new_snapshot() {
        let store = ContactStore::open_in_memory().unwrap();
        let mut rx = store.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        let id = store.insert(&ann()).unwrap();

        assert!(rx.has_changed().unwrap());
        let contacts = rx.borrow_and_update().clone();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].id, id);
    }

    #[test]
    fn deleting_missing_contact_does_not_notify() {
        let store = ContactStore::open_in_memory().unwrap();
        let id = store.insert(&ann()).unwrap();
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        assert!(store.delete(id).unwrap());
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        assert!(!store.delete(id).unwrap());
        assert!(!rx.has_changed().unwrap());
        assert!(rx.borrow().is_empty());
    }

    #[test]
    fn clones_share_one_store() {
        let store = ContactStore::open_in_memory().unwrap();
        let other = store.clone();

        store.insert(&ann()).unwrap();

        assert_eq!(other.list().unwrap().len(), 1);
        assert_eq!(other.snapshot().len(), 1);
    }

    #[test]
    fn unmigrated_connection_is_rejected_once_at_open() {
        let conn = Connection::open_in_memory().unwrap();

        let result = ContactStore::from_connection(conn);

        assert!(matches!(
            result,
            Err(RepoError::UninitializedConnection {
                actual_version: 0,
                ..
            })
        ));
    }

    #[test]
    fn committed_write_succeeds_when_republish_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.sqlite3");
        let store = ContactStore::open(&path).unwrap();
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        let other = Connection::open(&path).unwrap();
        other
            .execute(
                "INSERT INTO contacts (name, mobileNumber, emailAddress) VALUES ('Bad', '1', 'bad');",
                [],
            )
            .unwrap();

        let id = store.insert(&ann()).unwrap();

        let stored: String = other
            .query_row("SELECT name FROM contacts WHERE id = ?1;", [id], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(stored, "Ann");
        assert!(!rx.has_changed().unwrap());
        assert!(store.snapshot().is_empty());
    }
}
