//! Identity provider port.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use thiserror::Error;

use crate::domain::Identity;

/// Errors from the identity provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The provider rejected the sign-in attempt.
    #[error("Authentication rejected: {0}")]
    Rejected(String),

    /// The provider could not be reached.
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Port for the anonymous/token-based identity provider.
///
/// # Design
///
/// - `sign_in` resolves after an unspecified delay or fails explicitly
/// - `watch` is the continuous observer; it yields the current identity
///   first and then every change (including sign-out as `None`) for as long
///   as the stream is held
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Obtain an identity, creating one if necessary.
    async fn sign_in(&self) -> Result<Identity, AuthError>;

    /// Observe identity changes.
    fn watch(&self) -> BoxStream<'static, Option<Identity>>;
}
