//! Repository search port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Filters, RepositorySummary, SortOrder};

/// Default number of results per search (one page).
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Message shown when the search API rejects a request for rate limiting.
pub const RATE_LIMITED_MESSAGE: &str =
    "Search API rate limit exceeded. Please wait a minute and try again.";

/// Message shown for every other search failure.
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to fetch repositories. Please try again.";

/// Input to the search collaborator.
///
/// Equality doubles as the "same search" check used by the query controller:
/// two filter snapshots that produce equal requests never warrant a second call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Trimmed query text.
    pub query: String,
    pub sort: SortOrder,
    /// Trimmed language; empty means any.
    pub language: String,
    pub per_page: u32,
}

impl SearchRequest {
    /// Derive a request from a filter snapshot.
    pub fn from_filters(filters: &Filters, per_page: u32) -> Self {
        Self {
            query: filters.query.trim().to_string(),
            sort: filters.sort,
            language: filters.language.trim().to_string(),
            per_page,
        }
    }

    /// An empty query is answered locally with no results.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }
}

/// Errors from the search collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The API refused the request because the caller exceeded its quota.
    #[error("Rate limit exceeded, try again later")]
    RateLimited,

    /// Network or HTTP failure.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The API answered with something we could not interpret.
    #[error("Invalid API response: {message}")]
    InvalidResponse { message: String },

    /// The adapter is misconfigured (bad base URL, etc.).
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl SearchError {
    /// Text for the error slice. Rate limiting is distinguished; everything
    /// else collapses into one generic message.
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::RateLimited => RATE_LIMITED_MESSAGE,
            _ => SEARCH_FAILED_MESSAGE,
        }
    }
}

/// Port for the repository search API.
///
/// Returns one ordered page of results; the order is the API's and is kept
/// as-is all the way to the displayed list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchPort: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RepositorySummary>, SearchError>;
}
