//! GitHub client for repository search.

mod search;

use crate::config::GithubClientConfig;
use crate::error::GithubResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::GithubConfig;
use url::Url;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default GitHub client using the reqwest HTTP backend.
pub type DefaultGithubClient = GithubClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the GitHub search API.
///
/// Generic over the HTTP backend so tests can inject a fake. Use
/// [`DefaultGithubClient`] in production code.
pub struct GithubClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: GithubConfig,
}

impl DefaultGithubClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails if the base URL does not parse or the HTTP client cannot be
    /// built.
    pub fn new(config: &GithubClientConfig) -> GithubResult<Self> {
        let internal_config = Self::to_internal_config(config)?;
        let backend = ReqwestBackend::new(&internal_config)?;
        Ok(Self {
            backend,
            config: internal_config,
        })
    }

    fn to_internal_config(config: &GithubClientConfig) -> GithubResult<GithubConfig> {
        Ok(GithubConfig {
            base_url: Url::parse(&config.base_url)?,
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            token: config.token.clone(),
            max_retries: config.max_retries,
            #[allow(clippy::cast_possible_truncation)] // Duration milliseconds won't exceed u64 in practice
            retry_base_delay_ms: config.retry_base_delay.as_millis() as u64,
        })
    }
}

impl<B: HttpBackend> GithubClient<B> {
    /// Create a new client with a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: GithubConfig, backend: B) -> Self {
        Self { backend, config }
    }
}
