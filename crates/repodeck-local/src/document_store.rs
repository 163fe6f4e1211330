//! In-memory [`DocumentStore`].
//!
//! Each scope is a `watch` channel holding the whole collection. Writes
//! modify the collection in place and every subscriber receives the full
//! updated collection, which is exactly the snapshot model the engine
//! expects from a remote store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use repodeck_core::{CollectionSnapshot, DocumentStore, DocumentStoreError, Scope, SnapshotStream};

type Channels = HashMap<Scope, watch::Sender<CollectionSnapshot>>;

/// Document store backed by process memory. Cheap to clone; clones share
/// the same collections.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    channels: Arc<Mutex<Channels>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of a scope.
    pub fn snapshot(&self, scope: &Scope) -> CollectionSnapshot {
        self.lock()
            .ok()
            .and_then(|channels| channels.get(scope).map(|tx| tx.borrow().clone()))
            .unwrap_or_default()
    }

    /// Number of live subscriptions on a scope.
    pub fn subscriber_count(&self, scope: &Scope) -> usize {
        self.lock()
            .ok()
            .and_then(|channels| channels.get(scope).map(watch::Sender::receiver_count))
            .unwrap_or(0)
    }

    /// Make every subsequent `put` / `delete` fail until reset.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Replace a scope's contents and notify subscribers, even if the
    /// snapshot is identical to the current one.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn emit_raw(&self, scope: &Scope, snapshot: CollectionSnapshot) {
        if let Ok(mut channels) = self.lock() {
            channel(&mut channels, scope).send_modify(|current| *current = snapshot);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Channels>, DocumentStoreError> {
        self.channels
            .lock()
            .map_err(|_| DocumentStoreError::Internal("document store lock poisoned".to_string()))
    }

    fn check_writable(&self, scope: &Scope) -> Result<(), DocumentStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DocumentStoreError::Unavailable(format!(
                "writes to {scope} are failing"
            )));
        }
        Ok(())
    }
}

fn channel<'a>(channels: &'a mut Channels, scope: &Scope) -> &'a watch::Sender<CollectionSnapshot> {
    channels
        .entry(scope.clone())
        .or_insert_with(|| watch::channel(CollectionSnapshot::new()).0)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn put(
        &self,
        scope: &Scope,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), DocumentStoreError> {
        self.check_writable(scope)?;
        let mut channels = self.lock()?;
        channel(&mut channels, scope).send_modify(|collection| {
            collection.insert(key.to_string(), value);
        });
        debug!(scope = %scope, key, "Document written");
        Ok(())
    }

    async fn delete(&self, scope: &Scope, key: &str) -> Result<(), DocumentStoreError> {
        self.check_writable(scope)?;
        let mut channels = self.lock()?;
        let removed =
            channel(&mut channels, scope).send_if_modified(|collection| collection.remove(key).is_some());
        debug!(scope = %scope, key, removed, "Document deleted");
        Ok(())
    }

    async fn subscribe(&self, scope: &Scope) -> Result<SnapshotStream, DocumentStoreError> {
        let rx = {
            let mut channels = self.lock()?;
            channel(&mut channels, scope).subscribe()
        };
        Ok(WatchStream::new(rx).map(Ok).boxed())
    }
}
