//! State transitions.

use crate::domain::{BookmarkSet, FiltersUpdate, Identity, NoteSet, RepositorySummary};

/// Tagged set of transitions accepted by [`super::reduce`].
///
/// Each variant addresses exactly one slice; only `OpenDetail` reads another
/// slice (the notes) while transitioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetIdentity(Option<Identity>),
    SetSearchResults(Vec<RepositorySummary>),
    /// Wholesale replacement from a bookmarks snapshot.
    SetBookmarks(BookmarkSet),
    /// Wholesale replacement from a notes snapshot.
    SetNotes(NoteSet),
    /// Merge into the current filter snapshot.
    UpdateFilters(FiltersUpdate),
    SetLoading(bool),
    SetSyncing(bool),
    SetError(Option<String>),
    /// Select a repository and seed the draft from its note.
    OpenDetail(RepositorySummary),
    /// Clear selection and drop the draft.
    CloseDetail,
    UpdateDraftNote(String),
}

impl Action {
    /// Short name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetIdentity(_) => "set_identity",
            Self::SetSearchResults(_) => "set_search_results",
            Self::SetBookmarks(_) => "set_bookmarks",
            Self::SetNotes(_) => "set_notes",
            Self::UpdateFilters(_) => "update_filters",
            Self::SetLoading(_) => "set_loading",
            Self::SetSyncing(_) => "set_syncing",
            Self::SetError(_) => "set_error",
            Self::OpenDetail(_) => "open_detail",
            Self::CloseDetail => "close_detail",
            Self::UpdateDraftNote(_) => "update_draft_note",
        }
    }
}
