//! Remote sync adapter.
//!
//! Opens the two per-identity subscriptions and turns every full-collection
//! snapshot into a wholesale `SetBookmarks` / `SetNotes` transition.
//!
//! # Lifetime
//!
//! A [`SyncSession`] is the scoped resource tied to one identity. Closing it
//! (or dropping it) cancels both forwarding tasks; `close` additionally waits
//! for them, so once it returns no further snapshot from that identity can
//! reach the store.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{
    BookmarkSet, Collection, Identity, Note, NoteSet, RepositoryId, RepositorySummary, Scope,
};
use crate::ports::{CollectionSnapshot, DocumentStore, SnapshotStream};
use crate::state::Action;

use super::store::StateStore;

/// Opens subscriptions for an identity.
#[derive(Clone)]
pub struct SyncAdapter {
    store: StateStore,
    documents: Arc<dyn DocumentStore>,
}

impl SyncAdapter {
    pub fn new(store: StateStore, documents: Arc<dyn DocumentStore>) -> Self {
        Self { store, documents }
    }

    /// Subscribe to `(identity, bookmarks)` and `(identity, notes)`.
    ///
    /// A scope that fails to subscribe is logged and skipped; the other one
    /// still syncs and already-synced data is left in place.
    pub async fn open(&self, identity: &Identity) -> SyncSession {
        let cancel = CancellationToken::new();
        let mut tasks = Vec::with_capacity(2);

        for collection in [Collection::Bookmarks, Collection::Notes] {
            let scope = Scope::new(identity.clone(), collection);
            match self.documents.subscribe(&scope).await {
                Ok(stream) => {
                    debug!(identity = %identity, collection = %collection, "Subscribed");
                    tasks.push(tokio::spawn(forward_snapshots(
                        self.store.clone(),
                        scope,
                        stream,
                        cancel.clone(),
                    )));
                }
                Err(err) => {
                    warn!(identity = %identity, collection = %collection, error = %err, "Subscription failed");
                }
            }
        }

        info!(identity = %identity, subscriptions = tasks.len(), "Sync session opened");
        SyncSession {
            identity: identity.clone(),
            cancel,
            tasks,
        }
    }
}

/// Live subscriptions for one identity.
pub struct SyncSession {
    identity: Identity,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl SyncSession {
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Number of subscriptions that opened successfully.
    pub fn active_subscriptions(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    /// Cancel both subscriptions and wait for their tasks to finish.
    pub async fn close(mut self) {
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            if let Err(err) = task.await {
                if err.is_panic() {
                    warn!(identity = %self.identity, "Subscription task panicked");
                }
            }
        }
        info!(identity = %self.identity, "Sync session closed");
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn forward_snapshots(
    store: StateStore,
    scope: Scope,
    mut stream: SnapshotStream,
    cancel: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            next = stream.next() => next,
        };

        match next {
            Some(Ok(snapshot)) => {
                let action = match scope.collection {
                    Collection::Bookmarks => Action::SetBookmarks(decode_bookmarks(&scope, &snapshot)),
                    Collection::Notes => Action::SetNotes(decode_notes(&scope, &snapshot)),
                };
                // Checked under the store lock: a session being closed, or an
                // identity that is no longer current, never writes.
                let applied = store.dispatch_if(
                    |state| !cancel.is_cancelled() && state.identity.as_ref() == Some(&scope.identity),
                    [action],
                );
                if applied {
                    debug!(scope = %scope, documents = snapshot.len(), "Snapshot applied");
                } else {
                    debug!(scope = %scope, "Dropping snapshot for inactive identity");
                }
            }
            Some(Err(err)) => {
                // Keep whatever was synced last; stale beats empty.
                warn!(scope = %scope, error = %err, "Subscription error");
            }
            None => {
                debug!(scope = %scope, "Subscription stream ended");
                break;
            }
        }
    }
}

/// Bookmark documents are full repository bodies stored under the
/// repository id. Documents whose key and body id disagree are skipped, since
/// a toggle could never delete them.
fn decode_bookmarks(scope: &Scope, snapshot: &CollectionSnapshot) -> BookmarkSet {
    snapshot
        .iter()
        .filter_map(|(key, value)| {
            let Ok(id) = key.parse::<RepositoryId>() else {
                warn!(scope = %scope, key = %key, "Skipping bookmark with non-numeric key");
                return None;
            };
            match serde_json::from_value::<RepositorySummary>(value.clone()) {
                Ok(repo) if repo.id == id => Some((id, repo)),
                Ok(repo) => {
                    warn!(scope = %scope, key = %key, body_id = %repo.id, "Skipping bookmark whose key does not match its id");
                    None
                }
                Err(err) => {
                    warn!(scope = %scope, key = %key, error = %err, "Skipping malformed bookmark");
                    None
                }
            }
        })
        .collect()
}

fn decode_notes(scope: &Scope, snapshot: &CollectionSnapshot) -> NoteSet {
    snapshot
        .iter()
        .filter_map(|(key, value)| {
            let Ok(id) = key.parse::<RepositoryId>() else {
                warn!(scope = %scope, key = %key, "Skipping note with non-numeric key");
                return None;
            };
            match serde_json::from_value::<Note>(value.clone()) {
                Ok(note) => Some((id, note)),
                Err(err) => {
                    warn!(scope = %scope, key = %key, error = %err, "Skipping malformed note");
                    None
                }
            }
        })
        .collect()
}
