//! Bookmark and note write commands.
//!
//! Commands never touch the synced collections. The write goes to the
//! document store and the subscription echo is what updates `bookmarks` /
//! `notes`, so the state never disagrees with the store.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::domain::{Identity, Note, RepositoryId, RepositorySummary, Scope};
use crate::ports::{DocumentStore, DocumentStoreError};
use crate::state::Action;

use super::store::StateStore;

/// How long a toggle waits for its write to come back through the
/// subscription before returning anyway.
const BOOKMARK_ECHO_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors from mutation commands.
///
/// The `Display` text is what lands in the error slice.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MutationError {
    #[error("Sign-in required. Sync features are unavailable right now.")]
    NotSignedIn,

    #[error("No repository is selected.")]
    NoSelection,

    #[error("Failed to save changes: {0}")]
    Store(#[from] DocumentStoreError),

    #[error("Failed to encode document: {0}")]
    Serialization(String),
}

/// What a bookmark toggle asked the store to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkChange {
    Added,
    Removed,
}

/// Issues writes against the document store on behalf of the current
/// identity.
#[derive(Clone)]
pub struct MutationService {
    store: StateStore,
    documents: Arc<dyn DocumentStore>,
    syncing_indicator: Duration,
    /// Bumped per note save; only the latest save clears `syncing`.
    note_saves: Arc<AtomicU64>,
}

impl MutationService {
    pub fn new(store: StateStore, documents: Arc<dyn DocumentStore>, config: &EngineConfig) -> Self {
        Self {
            store,
            documents,
            syncing_indicator: config.syncing_indicator(),
            note_saves: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Add the repository to bookmarks if absent, remove it if present.
    ///
    /// Membership is read from the last synced snapshot. After a successful
    /// write the call waits (bounded) until the subscription echo flips
    /// membership, so an immediate second toggle sees the new state. On
    /// failure the error slice is set and membership is left to the next
    /// snapshot.
    pub async fn toggle_bookmark(
        &self,
        repo: &RepositorySummary,
    ) -> Result<BookmarkChange, MutationError> {
        match self.write_bookmark(repo).await {
            Ok((identity, change)) => {
                self.await_echo(&identity, repo.id, change == BookmarkChange::Added)
                    .await;
                Ok(change)
            }
            Err(err) => {
                warn!(repository = %repo.id, error = %err, "Bookmark toggle failed");
                self.store.dispatch(Action::SetError(Some(err.to_string())));
                Err(err)
            }
        }
    }

    async fn write_bookmark(
        &self,
        repo: &RepositorySummary,
    ) -> Result<(Identity, BookmarkChange), MutationError> {
        let (identity, present) = self.store.read(|state| {
            (state.identity.clone(), state.bookmarks.contains_key(&repo.id))
        });
        let identity = identity.ok_or(MutationError::NotSignedIn)?;
        let scope = Scope::bookmarks(&identity);
        let key = repo.id.key();

        let change = if present {
            self.documents.delete(&scope, &key).await?;
            debug!(scope = %scope, key = %key, "Bookmark removed");
            BookmarkChange::Removed
        } else {
            let body = serde_json::to_value(repo)
                .map_err(|e| MutationError::Serialization(e.to_string()))?;
            self.documents.put(&scope, &key, body).await?;
            debug!(scope = %scope, key = %key, "Bookmark added");
            BookmarkChange::Added
        };
        Ok((identity, change))
    }

    /// Wait until the synced set shows `id` as `present`, the identity
    /// changes, or the echo timeout passes. Never edits the set itself.
    async fn await_echo(&self, identity: &Identity, id: RepositoryId, present: bool) {
        let mut rx = self.store.subscribe();
        let echoed = tokio::time::timeout(
            BOOKMARK_ECHO_TIMEOUT,
            rx.wait_for(|state| {
                state.identity.as_ref() != Some(identity)
                    || state.bookmarks.contains_key(&id) == present
            }),
        )
        .await
        .is_ok_and(|result| result.is_ok());

        if !echoed {
            debug!(repository = %id, present, "Bookmark echo not observed in time");
        }
    }

    /// Create or overwrite the note for `id`.
    ///
    /// Holds `syncing` for at least the configured indicator delay after a
    /// successful write. A failed write clears it immediately. The draft
    /// text is left alone.
    pub async fn save_note(&self, id: RepositoryId, text: &str) -> Result<(), MutationError> {
        let identity = match self.preconditions() {
            Ok(identity) => identity,
            Err(err) => {
                self.store.dispatch(Action::SetError(Some(err.to_string())));
                return Err(err);
            }
        };

        let generation = self.note_saves.fetch_add(1, Ordering::SeqCst) + 1;
        self.store.dispatch(Action::SetSyncing(true));
        match self.write_note(&identity, id, text).await {
            Ok(()) => {
                tokio::time::sleep(self.syncing_indicator).await;
                if self.is_latest_save(generation) {
                    self.store.dispatch(Action::SetSyncing(false));
                }
                Ok(())
            }
            Err(err) => {
                warn!(repository = %id, error = %err, "Note save failed");
                let mut actions = vec![Action::SetError(Some(err.to_string()))];
                if self.is_latest_save(generation) {
                    actions.insert(0, Action::SetSyncing(false));
                }
                self.store.dispatch_if(|_| true, actions);
                Err(err)
            }
        }
    }

    /// Whether no save started after the one numbered `generation`.
    fn is_latest_save(&self, generation: u64) -> bool {
        self.note_saves.load(Ordering::SeqCst) == generation
    }

    fn preconditions(&self) -> Result<Identity, MutationError> {
        self.store.read(|state| {
            let identity = state.identity.clone().ok_or(MutationError::NotSignedIn)?;
            if state.ui.selected.is_none() {
                return Err(MutationError::NoSelection);
            }
            Ok(identity)
        })
    }

    async fn write_note(
        &self,
        identity: &Identity,
        id: RepositoryId,
        text: &str,
    ) -> Result<(), MutationError> {
        let note = Note::new(text, Utc::now());
        let body =
            serde_json::to_value(&note).map_err(|e| MutationError::Serialization(e.to_string()))?;
        let scope = Scope::notes(identity);
        self.documents.put(&scope, &id.key(), body).await?;
        debug!(scope = %scope, key = %id, "Note written");
        Ok(())
    }
}
