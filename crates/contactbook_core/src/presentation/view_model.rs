//! Presentation state holder for the contact screen.
//!
//! # Responsibility
//! - Expose the current contact collection as an observable value.
//! - Accept create/delete intents without blocking the caller.
//! - Surface storage failures as an observable error instead of dropping them.
//!
//! # Invariants
//! - The observed collection starts empty and only ever holds store snapshots.
//! - Writes are applied in the order they were requested.
//! - Dropping the holder cancels its background tasks; queued writes that
//!   have not started are discarded.

use crate::model::contact::{Contact, ContactId, NewContact};
use crate::repo::contact_repo::RepoResult;
use crate::service::contact_store::ContactStore;
use log::{debug, error, info, warn};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Write kinds dispatched by the view model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Insert,
    Delete,
}

impl WriteOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Delete => "delete",
        }
    }
}

/// Storage failure reported by a background write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub operation: WriteOperation,
    pub message: String,
}

impl Display for WriteFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.operation.as_str(), self.message)
    }
}

#[derive(Debug)]
enum WriteRequest {
    Insert(NewContact),
    Delete(ContactId),
}

impl WriteRequest {
    fn operation(&self) -> WriteOperation {
        match self {
            Self::Insert(_) => WriteOperation::Insert,
            Self::Delete(_) => WriteOperation::Delete,
        }
    }

    fn apply(self, store: &ContactStore) -> RepoResult<()> {
        match self {
            Self::Insert(contact) => store.insert(&contact).map(|_| ()),
            Self::Delete(id) => store.delete(id).map(|_| ()),
        }
    }
}

/// Mediates between a contact UI and the shared [`ContactStore`].
pub struct ContactViewModel {
    contacts_rx: watch::Receiver<Vec<Contact>>,
    errors_tx: Arc<watch::Sender<Option<WriteFailure>>>,
    errors_rx: watch::Receiver<Option<WriteFailure>>,
    requests_tx: Option<mpsc::UnboundedSender<WriteRequest>>,
    forwarder: JoinHandle<()>,
    writer: Option<JoinHandle<()>>,
}

impl ContactViewModel {
    /// Starts the snapshot forwarder and the writer on `runtime`.
    pub fn new(store: ContactStore, runtime: &Handle) -> Self {
        let (contacts_tx, contacts_rx) = watch::channel(Vec::new());
        let (errors_tx, errors_rx) = watch::channel(None);
        let errors_tx = Arc::new(errors_tx);
        let (requests_tx, requests_rx) = mpsc::unbounded_channel();

        let forwarder = runtime.spawn(forward_contacts(store.subscribe(), contacts_tx));
        let writer = runtime.spawn(run_writer(store, requests_rx, Arc::clone(&errors_tx)));

        Self {
            contacts_rx,
            errors_tx,
            errors_rx,
            requests_tx: Some(requests_tx),
            forwarder,
            writer: Some(writer),
        }
    }

    /// Observable contact collection.
    pub fn contacts(&self) -> watch::Receiver<Vec<Contact>> {
        self.contacts_rx.clone()
    }

    /// Collection as last observed.
    pub fn current_contacts(&self) -> Vec<Contact> {
        self.contacts_rx.borrow().clone()
    }

    /// Observable last storage failure, `None` while writes succeed.
    pub fn last_error(&self) -> watch::Receiver<Option<WriteFailure>> {
        self.errors_rx.clone()
    }

    pub fn clear_error(&self) {
        self.errors_tx.send_replace(None);
    }

    /// Queues an insert and returns immediately.
    pub fn insert_contact(&self, contact: NewContact) {
        self.dispatch(WriteRequest::Insert(contact));
    }

    /// Queues a delete and returns immediately. Deleting an absent id is a no-op.
    pub fn delete_contact(&self, id: ContactId) {
        self.dispatch(WriteRequest::Delete(id));
    }

    /// Applies every queued write, then stops the background tasks.
    pub async fn shutdown(mut self) {
        self.requests_tx.take();
        if let Some(writer) = self.writer.take() {
            if let Err(err) = writer.await {
                error!("event=view_model_shutdown module=presentation status=error error={err}");
                return;
            }
        }
        info!("event=view_model_shutdown module=presentation status=ok");
    }

    fn dispatch(&self, request: WriteRequest) {
        let operation = request.operation();
        let sent = self
            .requests_tx
            .as_ref()
            .is_some_and(|tx| tx.send(request).is_ok());
        if sent {
            debug!(
                "event=contact_write module=presentation status=queued operation={}",
                operation.as_str()
            );
            return;
        }

        warn!(
            "event=contact_write module=presentation status=error operation={} error_code=writer_stopped",
            operation.as_str()
        );
        self.errors_tx.send_replace(Some(WriteFailure {
            operation,
            message: "background writer is not running".to_string(),
        }));
    }
}

impl Drop for ContactViewModel {
    fn drop(&mut self) {
        self.forwarder.abort();
        if let Some(writer) = self.writer.take() {
            writer.abort();
        }
    }
}

async fn forward_contacts(
    mut store_rx: watch::Receiver<Vec<Contact>>,
    contacts_tx: watch::Sender<Vec<Contact>>,
) {
    loop {
        let snapshot = store_rx.borrow_and_update().clone();
        debug!(
            "event=contacts_refresh module=presentation status=ok contact_count={}",
            snapshot.len()
        );
        contacts_tx.send_replace(snapshot);

        if store_rx.changed().await.is_err() {
            break;
        }
    }
}

async fn run_writer(
    store: ContactStore,
    mut requests: mpsc::UnboundedReceiver<WriteRequest>,
    errors_tx: Arc<watch::Sender<Option<WriteFailure>>>,
) {
    while let Some(request) = requests.recv().await {
        let operation = request.operation();
        let worker_store = store.clone();
        let outcome = tokio::task::spawn_blocking(move || request.apply(&worker_store)).await;

        let message = match outcome {
            Ok(Ok(())) => continue,
            Ok(Err(err)) => err.to_string(),
            Err(err) => format!("write task failed: {err}"),
        };

        error!(
            "event=contact_write module=presentation status=error operation={} error={}",
            operation.as_str(),
            message
        );
        errors_tx.send_replace(Some(WriteFailure { operation, message }));
    }
}
