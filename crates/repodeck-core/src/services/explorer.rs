//! `ExplorerCore` - the engine facade.
//!
//! Owns the state store and the background tasks (query controller,
//! identity lifecycle) and exposes the user-facing commands. Collaborators
//! arrive through [`ExplorerDeps`]; nothing is reached globally.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::domain::{
    BookmarkSet, FiltersUpdate, Identity, NoteSet, RepositoryId, RepositorySummary,
};
use crate::ports::{ExplorerDeps, IdentityProvider};
use crate::state::{self, Action, ExplorerState};

use super::mutations::{BookmarkChange, MutationError, MutationService};
use super::query_controller::QueryController;
use super::store::StateStore;
use super::sync::{SyncAdapter, SyncSession};

/// Running explorer engine.
///
/// Must be started inside a Tokio runtime. Call [`ExplorerCore::shutdown`]
/// for an orderly teardown; dropping the core only signals cancellation.
pub struct ExplorerCore {
    store: StateStore,
    mutations: MutationService,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl ExplorerCore {
    /// Start the engine with the default (empty) initial state.
    pub fn start(deps: ExplorerDeps, config: EngineConfig) -> Self {
        Self::start_with_state(deps, config, ExplorerState::default())
    }

    /// Start the engine from a given initial state, e.g. restored filters.
    pub fn start_with_state(deps: ExplorerDeps, config: EngineConfig, initial: ExplorerState) -> Self {
        let store = StateStore::new(initial);
        let cancel = CancellationToken::new();

        let controller = QueryController::new(store.clone(), Arc::clone(&deps.search), &config)
            .spawn(cancel.child_token());

        let lifecycle = tokio::spawn(run_identity_lifecycle(
            store.clone(),
            Arc::clone(&deps.identity),
            SyncAdapter::new(store.clone(), Arc::clone(&deps.documents)),
            cancel.child_token(),
        ));

        let mutations = MutationService::new(store.clone(), deps.documents, &config);
        info!(
            debounce_ms = config.search_debounce_ms,
            page_size = config.page_size,
            "Explorer engine started"
        );

        Self {
            store,
            mutations,
            cancel,
            tasks: vec![controller, lifecycle],
        }
    }

    /// Handle to the underlying store.
    pub const fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn state(&self) -> ExplorerState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExplorerState> {
        self.store.subscribe()
    }

    /// The list the main view should render.
    pub fn displayed_repositories(&self) -> Vec<RepositorySummary> {
        self.store.read(state::displayed_repositories)
    }

    pub fn is_bookmarked(&self, id: RepositoryId) -> bool {
        self.store.read(|s| state::is_bookmarked(s, id))
    }

    pub fn update_filters(&self, update: FiltersUpdate) {
        self.store.dispatch(Action::UpdateFilters(update));
    }

    pub fn open_detail(&self, repo: RepositorySummary) {
        self.store.dispatch(Action::OpenDetail(repo));
    }

    /// Close the detail view, discarding any unsaved draft.
    pub fn close_detail(&self) {
        self.store.dispatch(Action::CloseDetail);
    }

    pub fn update_draft_note(&self, text: impl Into<String>) {
        self.store.dispatch(Action::UpdateDraftNote(text.into()));
    }

    pub fn dismiss_error(&self) {
        self.store.dispatch(Action::SetError(None));
    }

    pub async fn toggle_bookmark(
        &self,
        repo: &RepositorySummary,
    ) -> Result<BookmarkChange, MutationError> {
        self.mutations.toggle_bookmark(repo).await
    }

    pub async fn save_note(&self, id: RepositoryId, text: &str) -> Result<(), MutationError> {
        self.mutations.save_note(id, text).await
    }

    /// Save the current draft for the selected repository.
    pub async fn save_draft_note(&self) -> Result<(), MutationError> {
        let target = self
            .store
            .read(|s| s.selected_repository_id().map(|id| (id, s.ui.draft_note_text.clone())));
        match target {
            Some((id, text)) => self.mutations.save_note(id, &text).await,
            None => {
                let err = MutationError::NoSelection;
                self.store.dispatch(Action::SetError(Some(err.to_string())));
                Err(err)
            }
        }
    }

    /// Cancel the pending search timer, close both subscriptions and wait
    /// for every background task to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for task in std::mem::take(&mut self.tasks) {
            if let Err(err) = task.await {
                if err.is_panic() {
                    warn!("Engine task panicked during shutdown");
                }
            }
        }
        info!("Explorer engine stopped");
    }
}

impl Drop for ExplorerCore {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Sign in, then follow the identity observer for the life of the engine.
///
/// The task owns the current [`SyncSession`]; every identity change closes
/// the old session before the new identity is published.
async fn run_identity_lifecycle(
    store: StateStore,
    provider: Arc<dyn IdentityProvider>,
    sync: SyncAdapter,
    cancel: CancellationToken,
) {
    let mut lifecycle = IdentityLifecycle {
        store,
        sync,
        current: None,
        session: None,
    };

    let signed_in = tokio::select! {
        biased;
        () = cancel.cancelled() => return,
        result = provider.sign_in() => result,
    };
    match signed_in {
        Ok(identity) => lifecycle.switch_to(Some(identity)).await,
        Err(err) => warn!(error = %err, "Sign-in failed, sync features unavailable"),
    }

    let mut changes = provider.watch();
    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            next = changes.next() => next,
        };
        match next {
            Some(identity) => lifecycle.switch_to(identity).await,
            None => {
                debug!("Identity observer ended");
                cancel.cancelled().await;
                break;
            }
        }
    }

    lifecycle.close().await;
}

struct IdentityLifecycle {
    store: StateStore,
    sync: SyncAdapter,
    current: Option<Identity>,
    session: Option<SyncSession>,
}

impl IdentityLifecycle {
    async fn switch_to(&mut self, next: Option<Identity>) {
        if self.current == next {
            return;
        }
        self.close().await;

        match &next {
            Some(identity) => info!(identity = %identity, "Identity available"),
            None => info!("Identity lost"),
        }
        self.store.dispatch_if(
            |_| true,
            [
                Action::SetIdentity(next.clone()),
                Action::SetBookmarks(BookmarkSet::new()),
                Action::SetNotes(NoteSet::new()),
            ],
        );

        if let Some(identity) = &next {
            self.session = Some(self.sync.open(identity).await);
        }
        self.current = next;
    }

    async fn close(&mut self) {
        if let Some(session) = self.session.take() {
            session.close().await;
        }
    }
}
