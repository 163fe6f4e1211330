//! The state container: state shape, actions, the pure reducer and view
//! selectors.
//!
//! # Structure
//!
//! - `action` - tagged set of transitions
//! - `reducer` - `(state, action) -> state`, no I/O, no clock
//! - `selector` - derived views (displayed list, membership, notes)

mod action;
mod reducer;
mod selector;

use std::sync::Arc;

use crate::domain::{BookmarkSet, Filters, Identity, NoteSet, RepositoryId, RepositorySummary};

pub use action::Action;
pub use reducer::reduce;
pub use selector::{displayed_repositories, is_bookmarked, note_for, selected_note};

/// Transient UI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// A search is in flight.
    pub loading: bool,
    /// The single user-visible error slot.
    pub error: Option<String>,
    /// Repository shown in the detail view.
    pub selected: Option<RepositorySummary>,
    pub modal_open: bool,
    /// Unsaved note text. Seeded on open, discarded on close.
    pub draft_note_text: String,
    /// A note write is being shown as in progress.
    pub syncing: bool,
}

impl UiState {
    pub fn selected_repository_id(&self) -> Option<RepositoryId> {
        self.selected.as_ref().map(|repo| repo.id)
    }
}

/// Complete explorer state.
///
/// Slices sit behind `Arc` so a transition that touches one slice shares
/// every other slice with the previous state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplorerState {
    pub identity: Option<Identity>,
    pub filters: Arc<Filters>,
    /// Last search results, in API order.
    pub search_results: Arc<Vec<RepositorySummary>>,
    /// Projection of the latest bookmarks snapshot.
    pub bookmarks: Arc<BookmarkSet>,
    /// Projection of the latest notes snapshot.
    pub notes: Arc<NoteSet>,
    pub ui: UiState,
}

impl ExplorerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a given filter snapshot.
    #[must_use]
    pub fn with_filters(filters: Filters) -> Self {
        Self {
            filters: Arc::new(filters),
            ..Self::default()
        }
    }

    pub fn selected_repository_id(&self) -> Option<RepositoryId> {
        self.ui.selected_repository_id()
    }

    pub const fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }
}
