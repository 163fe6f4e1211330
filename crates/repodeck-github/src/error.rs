//! Internal error types for GitHub operations.
//!
//! These errors are internal to `repodeck-github` and are mapped to the core
//! `SearchError` at the port boundary.

use thiserror::Error;

/// Result type alias for GitHub operations.
pub type GithubResult<T> = Result<T, GithubError>;

/// Errors related to GitHub API operations.
#[derive(Debug, Error)]
pub enum GithubError {
    /// API request failed with an HTTP error status.
    #[error("GitHub API request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The caller's search quota is exhausted.
    #[error("GitHub API rate limit exceeded")]
    RateLimited {
        /// Epoch seconds at which the quota resets, if the API said so
        reset_at: Option<u64>,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from GitHub API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
