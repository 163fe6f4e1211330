//! `StateStore` - the single authoritative state container.
//!
//! Every asynchronous task (search, subscriptions, mutations) rejoins the
//! state only through `dispatch` / `dispatch_if`. Observers hold a
//! `watch::Receiver` and are woken only when the state actually changed.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

use crate::state::{Action, ExplorerState, reduce};

/// Shared handle to the state container. Cheap to clone.
#[derive(Clone)]
pub struct StateStore {
    tx: Arc<watch::Sender<ExplorerState>>,
}

impl StateStore {
    pub fn new(initial: ExplorerState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Apply one action.
    ///
    /// Returns `true` if the state changed. A transition that produces an
    /// equal state (e.g. a redelivered snapshot) does not wake observers.
    pub fn dispatch(&self, action: Action) -> bool {
        let name = action.name();
        let changed = self.tx.send_if_modified(|state| {
            let next = reduce(state, action);
            if next == *state {
                false
            } else {
                *state = next;
                true
            }
        });
        trace!(action = name, changed, "Dispatched");
        changed
    }

    /// Apply a batch of actions atomically, but only if `guard` holds on the
    /// current state.
    ///
    /// The guard and the transitions run under the same lock, so no other
    /// dispatch can slip in between the check and the write. Returns whether
    /// the guard held; observers are woken only if the state changed.
    pub fn dispatch_if<G, I>(&self, guard: G, actions: I) -> bool
    where
        G: FnOnce(&ExplorerState) -> bool,
        I: IntoIterator<Item = Action>,
    {
        let mut accepted = false;
        self.tx.send_if_modified(|state| {
            if !guard(state) {
                return false;
            }
            accepted = true;
            let next = actions
                .into_iter()
                .fold(state.clone(), |acc, action| reduce(&acc, action));
            if next == *state {
                false
            } else {
                *state = next;
                true
            }
        });
        accepted
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> ExplorerState {
        self.tx.borrow().clone()
    }

    /// Read the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&ExplorerState) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<ExplorerState> {
        self.tx.subscribe()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(ExplorerState::default())
    }
}
