//! The pure transition function.

use std::sync::Arc;

use super::{Action, ExplorerState};

/// Apply `action` to `state`, returning the next state.
///
/// Only the addressed slice is replaced; every other slice is shared with
/// `state`. Performs no I/O and never reads the clock.
#[must_use]
pub fn reduce(state: &ExplorerState, action: Action) -> ExplorerState {
    let mut next = state.clone();

    match action {
        Action::SetIdentity(identity) => next.identity = identity,
        Action::SetSearchResults(results) => next.search_results = Arc::new(results),
        Action::SetBookmarks(bookmarks) => next.bookmarks = Arc::new(bookmarks),
        Action::SetNotes(notes) => next.notes = Arc::new(notes),
        Action::UpdateFilters(update) => {
            let merged = state.filters.merged(&update);
            if merged != *state.filters {
                next.filters = Arc::new(merged);
            }
        }
        Action::SetLoading(loading) => next.ui.loading = loading,
        Action::SetSyncing(syncing) => next.ui.syncing = syncing,
        Action::SetError(error) => next.ui.error = error,
        Action::OpenDetail(repo) => {
            next.ui.draft_note_text = state
                .notes
                .get(&repo.id)
                .map(|note| note.content.clone())
                .unwrap_or_default();
            next.ui.selected = Some(repo);
            next.ui.modal_open = true;
        }
        Action::CloseDetail => {
            next.ui.selected = None;
            next.ui.modal_open = false;
            next.ui.draft_note_text.clear();
        }
        Action::UpdateDraftNote(text) => {
            // A draft only exists while a repository is selected.
            if next.ui.selected.is_some() {
                next.ui.draft_note_text = text;
            }
        }
    }

    next
}
