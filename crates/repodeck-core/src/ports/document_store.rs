//! Remote document store port.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use thiserror::Error;

use crate::domain::Scope;

/// Full contents of one scope: document key to document body.
pub type CollectionSnapshot = BTreeMap<String, serde_json::Value>;

/// Stream of full-collection snapshots. Ends when the subscription is dropped
/// or the backend closes it.
pub type SnapshotStream = BoxStream<'static, Result<CollectionSnapshot, DocumentStoreError>>;

/// Errors from the remote document store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentStoreError {
    /// The backend could not be reached.
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    /// The caller is not allowed to touch this scope.
    #[error("Permission denied for {scope}")]
    PermissionDenied { scope: String },

    /// A document body could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Unexpected backend failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Port for the per-identity document store.
///
/// Keys are the decimal string form of repository ids. Writes are
/// create-or-overwrite; subscriptions deliver the entire collection on every
/// event, never a delta, and may redeliver an unchanged collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or overwrite the document at `key`.
    async fn put(
        &self,
        scope: &Scope,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), DocumentStoreError>;

    /// Delete the document at `key`. Deleting a missing key succeeds.
    async fn delete(&self, scope: &Scope, key: &str) -> Result<(), DocumentStoreError>;

    /// Subscribe to full-collection snapshots of `scope`.
    async fn subscribe(&self, scope: &Scope) -> Result<SnapshotStream, DocumentStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn _assert_object_safe(_: Arc<dyn DocumentStore>) {}

    #[test]
    fn test_permission_error_names_scope() {
        let err = DocumentStoreError::PermissionDenied {
            scope: "users/u1/notes".to_string(),
        };
        assert!(err.to_string().contains("users/u1/notes"));
    }
}
