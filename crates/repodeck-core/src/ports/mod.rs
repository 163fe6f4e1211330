//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces that the engine expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No HTTP or SDK types in any signature
//! - Every port owns its error enum; adapters map their errors at the boundary
//! - Collaborators are injected through [`ExplorerDeps`], never reached globally

pub mod document_store;
pub mod identity;
pub mod search;

use std::sync::Arc;

pub use document_store::{CollectionSnapshot, DocumentStore, DocumentStoreError, SnapshotStream};
pub use identity::{AuthError, IdentityProvider};
pub use search::{
    DEFAULT_PAGE_SIZE, RATE_LIMITED_MESSAGE, SEARCH_FAILED_MESSAGE, SearchError, SearchPort,
    SearchRequest,
};

/// Container for the three collaborators the engine depends on.
///
/// Lives in core so that `ExplorerCore` can accept it without depending on
/// any adapter crate.
///
/// # Example
///
/// ```ignore
/// let deps = ExplorerDeps::new(
///     Arc::new(DefaultGithubClient::new(&GithubClientConfig::new())),
///     Arc::new(AnonymousIdentityProvider::new()),
///     Arc::new(MemoryDocumentStore::new()),
/// );
/// let core = ExplorerCore::start(deps, EngineConfig::default());
/// ```
#[derive(Clone)]
pub struct ExplorerDeps {
    /// Repository search API.
    pub search: Arc<dyn SearchPort>,
    /// Anonymous/token identity provider.
    pub identity: Arc<dyn IdentityProvider>,
    /// Remote document store for bookmarks and notes.
    pub documents: Arc<dyn DocumentStore>,
}

impl ExplorerDeps {
    pub fn new(
        search: Arc<dyn SearchPort>,
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            search,
            identity,
            documents,
        }
    }
}
