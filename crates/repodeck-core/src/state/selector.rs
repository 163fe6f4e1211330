//! Derived views over [`ExplorerState`].

use crate::domain::{Note, RepositoryId, RepositorySummary, View};

use super::ExplorerState;

/// The list the UI should render.
///
/// - `Bookmarks`: values of the bookmark set, ascending by repository id
/// - `Discover`: the last search results, in API order
///
/// Neither source is cleared when the view flips, so switching back restores
/// what was there without a new search.
pub fn displayed_repositories(state: &ExplorerState) -> Vec<RepositorySummary> {
    match state.filters.view {
        View::Bookmarks => state.bookmarks.values().cloned().collect(),
        View::Discover => state.search_results.as_ref().clone(),
    }
}

/// Membership test against the synced bookmark set.
pub fn is_bookmarked(state: &ExplorerState, id: RepositoryId) -> bool {
    state.bookmarks.contains_key(&id)
}

/// Persisted note for a repository, if any.
pub fn note_for(state: &ExplorerState, id: RepositoryId) -> Option<&Note> {
    state.notes.get(&id)
}

/// Persisted note for the currently selected repository.
pub fn selected_note(state: &ExplorerState) -> Option<&Note> {
    state
        .selected_repository_id()
        .and_then(|id| note_for(state, id))
}
