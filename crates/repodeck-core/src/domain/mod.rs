//! Domain types for the repository explorer.
//!
//! These are pure data types with no infrastructure dependencies.

mod collections;
mod filters;
mod identity;
mod repository;

pub use collections::{BookmarkSet, Note, NoteSet};
pub use filters::{Filters, FiltersUpdate, SortOrder, View};
pub use identity::{Collection, Identity, Scope};
pub use repository::{RepositoryId, RepositoryLicense, RepositoryOwner, RepositorySummary};
