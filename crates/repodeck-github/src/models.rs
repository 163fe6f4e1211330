//! Internal API types for the GitHub search endpoint.
//!
//! These types are internal to `repodeck-github` and are not exposed to
//! consumers, who see the core `RepositorySummary` instead.

use std::time::Duration;

use chrono::{DateTime, Utc};
use repodeck_core::SortOrder;
use serde::Deserialize;
use url::Url;

// ============================================================================
// Configuration (used internally, see config.rs for public config)
// ============================================================================

/// Internal configuration for the GitHub client.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Root of the REST API
    pub base_url: Url,
    pub user_agent: String,
    pub timeout: Duration,
    pub token: Option<String>,
    /// Maximum number of retry attempts for transient errors
    pub max_retries: u8,
    /// Base delay in milliseconds for exponential backoff
    pub retry_base_delay_ms: u64,
}

// ============================================================================
// Search Query
// ============================================================================

/// Parameters of one search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubSearchQuery {
    pub query: String,
    /// Empty means any language.
    pub language: String,
    pub sort: SortOrder,
    pub per_page: u32,
}

impl GithubSearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::new(),
            sort: SortOrder::default(),
            per_page: repodeck_core::DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub const fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GhOwner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhLicense {
    #[serde(default)]
    pub name: Option<String>,
}

/// One entry of the search response `items` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GhRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: GhOwner,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub license: Option<GhLicense>,
    pub updated_at: DateTime<Utc>,
}

/// One page of search results.
#[derive(Debug, Clone, Default)]
pub struct GhSearchPage {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<GhRepository>,
    /// Entries dropped because they did not parse.
    pub skipped: usize,
}
