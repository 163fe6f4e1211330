//! HTTP backend abstraction for the GitHub API.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation
//! uses reqwest with automatic retry logic for transient errors.

use crate::error::{GithubError, GithubResult};
use crate::models::GithubConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const RATE_REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RATE_RESET_HEADER: &str = "x-ratelimit-reset";
/// Longest single backoff sleep.
const MAX_RETRY_DELAY_MS: u64 = 60_000;

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that can fetch JSON from URLs.
///
/// This is an implementation detail - external code should use the
/// `SearchPort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch JSON from a URL and deserialize it.
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> GithubResult<T>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest with retry logic.
///
/// Implements exponential backoff for transient server errors (5xx)
/// and network errors. Client errors, rate limiting included, are never
/// retried.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay_ms: u64,
    auth_token: Option<String>,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &GithubConfig) -> GithubResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
            auth_token: config.token.clone(),
        })
    }

    /// Build a request with the GitHub headers and optional authentication.
    fn build_request(&self, url: &Url) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(url.as_str())
            .header(ACCEPT, GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION);
        if let Some(ref token) = self.auth_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        request
    }

    /// Fetch a URL with automatic retry for transient errors.
    async fn fetch_with_retry(&self, url: &Url) -> GithubResult<reqwest::Response> {
        let mut last_error: Option<GithubError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay_ms = backoff_delay_ms(self.retry_base_delay_ms, attempt);
                debug!(attempt, delay_ms, "Retrying GitHub request");
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }

            match self.build_request(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    if let Some(err) = rate_limit_error(status, response.headers()) {
                        warn!(status = status.as_u16(), "GitHub rate limit hit");
                        return Err(err);
                    }

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(GithubError::ApiRequestFailed {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                        continue;
                    }

                    // 4xx errors or final attempt - fail immediately
                    return Err(GithubError::ApiRequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < self.max_retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| GithubError::InvalidResponse {
            message: "Unknown error during fetch".to_string(),
        }))
    }
}

/// Exponential backoff before retry number `attempt` (1-based), saturating
/// at [`MAX_RETRY_DELAY_MS`].
fn backoff_delay_ms(base_ms: u64, attempt: u8) -> u64 {
    2u64.checked_pow(u32::from(attempt.saturating_sub(1)))
        .map_or(u64::MAX, |factor| base_ms.saturating_mul(factor))
        .min(MAX_RETRY_DELAY_MS)
}

/// Classify a non-success response as rate limiting.
///
/// GitHub answers 429 for secondary limits and 403 with a zero remaining
/// quota for the primary one. Any other 403 is a plain failure.
fn rate_limit_error(status: StatusCode, headers: &HeaderMap) -> Option<GithubError> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let exhausted = header(RATE_REMAINING_HEADER).is_some_and(|v| v.trim() == "0");

    if status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && exhausted) {
        let reset_at = header(RATE_RESET_HEADER).and_then(|v| v.trim().parse().ok());
        return Some(GithubError::RateLimited { reset_at });
    }
    None
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> GithubResult<T> {
        let response = self.fetch_with_retry(url).await?;
        let data: T = response.json().await?;
        Ok(data)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Canned outcome for the fake backend.
    #[derive(Clone)]
    pub enum CannedResponse {
        Json(serde_json::Value),
        Status(u16),
        RateLimited,
    }

    /// A fake HTTP backend that returns canned responses and records URLs.
    #[derive(Default)]
    pub struct FakeBackend {
        responses: Vec<(String, CannedResponse)>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a canned response for URLs containing `url_contains`.
        pub fn with_response(mut self, url_contains: &str, response: CannedResponse) -> Self {
            self.responses.push((url_contains.to_string(), response));
            self
        }

        pub fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> GithubResult<T> {
            self.requested.lock().unwrap().push(url.to_string());

            let response = self
                .responses
                .iter()
                .find(|(pattern, _)| url.as_str().contains(pattern.as_str()))
                .map(|(_, response)| response.clone())
                .unwrap_or(CannedResponse::Status(404));

            match response {
                CannedResponse::Json(json) => serde_json::from_value(json).map_err(Into::into),
                CannedResponse::Status(status) => Err(GithubError::ApiRequestFailed {
                    status,
                    url: url.to_string(),
                }),
                CannedResponse::RateLimited => Err(GithubError::RateLimited { reset_at: None }),
            }
        }
    }
}
