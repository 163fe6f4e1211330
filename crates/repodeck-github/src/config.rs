//! Connection settings for the GitHub search adapter.
//!
//! Everything here maps onto how requests to the REST API are made: which
//! host to talk to, how to identify and authenticate, and how hard to
//! retry. Search semantics (query, sort, page size) live in core.

use std::time::Duration;

/// Default GitHub REST API root.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Upper bound on retries for 5xx and network failures.
pub const MAX_RETRIES: u8 = 10;

/// How the adapter reaches GitHub.
///
/// Anonymous search is limited to a handful of requests per minute; set a
/// token to lift that.
///
/// ```
/// use repodeck_github::GithubClientConfig;
/// use std::time::Duration;
///
/// let config = GithubClientConfig::new()
///     .with_base_url("https://github.example.com/api/v3")
///     .with_optional_token(std::env::var("GITHUB_TOKEN").ok())
///     .with_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct GithubClientConfig {
    pub(crate) base_url: String,
    /// GitHub rejects requests without a user agent.
    pub(crate) user_agent: String,
    pub(crate) timeout: Duration,
    /// Sent as a bearer token.
    pub(crate) token: Option<String>,
    pub(crate) max_retries: u8,
    /// First backoff delay; doubles per retry.
    pub(crate) retry_base_delay: Duration,
}

impl Default for GithubClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GITHUB_API_URL.to_string(),
            user_agent: concat!("repodeck-github/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            token: None,
            max_retries: 2,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl GithubClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API root, e.g. a GitHub Enterprise host.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Whole-request timeout, 30 seconds unless set.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an optional token; empty strings count as no token.
    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Retries after the first attempt, capped at [`MAX_RETRIES`].
    #[must_use]
    pub fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.min(MAX_RETRIES);
        self
    }

    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}
