#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types for convenience
pub use config::{DEFAULT_SEARCH_DEBOUNCE_MS, DEFAULT_SYNCING_DELAY_MS, EngineConfig};
pub use domain::{
    BookmarkSet, Collection, Filters, FiltersUpdate, Identity, Note, NoteSet, RepositoryId,
    RepositoryLicense, RepositoryOwner, RepositorySummary, Scope, SortOrder, View,
};
pub use ports::{
    AuthError, CollectionSnapshot, DEFAULT_PAGE_SIZE, DocumentStore, DocumentStoreError,
    ExplorerDeps, IdentityProvider, RATE_LIMITED_MESSAGE, SEARCH_FAILED_MESSAGE, SearchError,
    SearchPort, SearchRequest, SnapshotStream,
};
pub use services::{
    BookmarkChange, ExplorerCore, MutationError, MutationService, QueryController, StateStore,
    SyncAdapter, SyncSession,
};
pub use state::{Action, ExplorerState, UiState};

// Dev-dependencies exercised only by the integration tests
#[cfg(test)]
use repodeck_local as _;
#[cfg(test)]
use tokio_test as _;
