//! Engine services.
//!
//! Everything that runs: the state store, the debounced query controller,
//! the sync adapter, mutation commands and the [`ExplorerCore`] facade that
//! wires them together.

mod debounce;
mod explorer;
mod mutations;
mod query_controller;
mod store;
mod sync;

pub use debounce::DebounceTimer;
pub use explorer::ExplorerCore;
pub use mutations::{BookmarkChange, MutationError, MutationService};
pub use query_controller::QueryController;
pub use store::StateStore;
pub use sync::{SyncAdapter, SyncSession};
