//! Synced collections: bookmarks and notes.
//!
//! Both are derived state: they are only ever replaced wholesale from the
//! latest subscription snapshot, never patched entry by entry.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::repository::{RepositoryId, RepositorySummary};

/// Personal note attached to a repository.
///
/// Persisted as `{ "content": ..., "updatedAt": <ISO-8601> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub content: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(content: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            updated_at,
        }
    }
}

/// Repository snapshots keyed by id, as stored at bookmark time.
pub type BookmarkSet = BTreeMap<RepositoryId, RepositorySummary>;

/// Notes keyed by repository id.
pub type NoteSet = BTreeMap<RepositoryId, Note>;
