//! Anonymous identity provider.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::info;
use uuid::Uuid;

use repodeck_core::{AuthError, Identity, IdentityProvider};

/// Hands out a random identity per process, like an anonymous auth backend.
///
/// The first successful `sign_in` creates the identity; later calls return
/// the same one until `sign_out`.
#[derive(Clone)]
pub struct AnonymousIdentityProvider {
    current: Arc<watch::Sender<Option<Identity>>>,
    delay: Duration,
    reject: Arc<AtomicBool>,
}

impl Default for AnonymousIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AnonymousIdentityProvider {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            current: Arc::new(tx),
            delay: Duration::ZERO,
            reject: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simulated latency of the sign-in round trip.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    /// Forget the identity and notify observers.
    pub fn sign_out(&self) {
        if self.current.send_if_modified(|current| current.take().is_some()) {
            info!("Signed out");
        }
    }

    /// Switch to a specific identity and notify observers.
    pub fn sign_in_as(&self, identity: Identity) {
        self.current.send_if_modified(|current| {
            if current.as_ref() == Some(&identity) {
                return false;
            }
            info!(identity = %identity, "Switched identity");
            *current = Some(identity);
            true
        });
    }

    /// Reject every subsequent `sign_in` until reset.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn fail_sign_in(&self, fail: bool) {
        self.reject.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityProvider for AnonymousIdentityProvider {
    async fn sign_in(&self) -> Result<Identity, AuthError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.reject.load(Ordering::SeqCst) {
            return Err(AuthError::Rejected("anonymous sign-in is disabled".to_string()));
        }

        let mut identity = None;
        self.current.send_if_modified(|current| match current {
            Some(existing) => {
                identity = Some(existing.clone());
                false
            }
            None => {
                let fresh = Identity::new(Uuid::new_v4().to_string());
                info!(identity = %fresh, "Signed in anonymously");
                identity = Some(fresh.clone());
                *current = Some(fresh);
                true
            }
        });
        identity.ok_or_else(|| AuthError::Unavailable("no identity issued".to_string()))
    }

    fn watch(&self) -> BoxStream<'static, Option<Identity>> {
        WatchStream::new(self.current.subscribe()).boxed()
    }
}
