//! `SearchPort` implementation for `GithubClient`.
//!
//! Converts between the internal GitHub types and core DTOs and maps
//! `GithubError` onto `SearchError`.

use async_trait::async_trait;
use repodeck_core::{
    RepositoryId, RepositoryLicense, RepositoryOwner, RepositorySummary, SearchError, SearchPort,
    SearchRequest,
};
use tracing::warn;

use crate::client::GithubClient;
use crate::error::GithubError;
use crate::http::HttpBackend;
use crate::models::{GhRepository, GithubSearchQuery};

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `GithubError` to core `SearchError`.
fn map_error(err: GithubError) -> SearchError {
    match err {
        GithubError::RateLimited { .. } => SearchError::RateLimited,
        GithubError::ApiRequestFailed { status, url } => {
            if status == 429 {
                SearchError::RateLimited
            } else {
                SearchError::Network {
                    message: format!("API request failed with status {status}: {url}"),
                }
            }
        }
        GithubError::InvalidResponse { message } => SearchError::InvalidResponse { message },
        GithubError::Network(e) => SearchError::Network {
            message: e.to_string(),
        },
        GithubError::InvalidUrl(e) => SearchError::Configuration {
            message: e.to_string(),
        },
        GithubError::JsonParse(e) => SearchError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

// ============================================================================
// Type Conversions
// ============================================================================

fn to_summary(repo: GhRepository) -> RepositorySummary {
    RepositorySummary {
        id: RepositoryId(repo.id),
        name: repo.name,
        full_name: repo.full_name,
        owner: RepositoryOwner {
            login: repo.owner.login,
            avatar_url: repo.owner.avatar_url,
        },
        html_url: repo.html_url,
        description: repo.description,
        language: repo.language,
        stargazers_count: repo.stargazers_count,
        forks_count: repo.forks_count,
        open_issues_count: repo.open_issues_count,
        watchers_count: repo.watchers_count,
        license: repo
            .license
            .and_then(|license| license.name)
            .map(|name| RepositoryLicense { name }),
        updated_at: repo.updated_at,
    }
}

fn to_search_query(request: &SearchRequest) -> GithubSearchQuery {
    GithubSearchQuery::new(request.query.clone())
        .with_language(request.language.clone())
        .with_sort(request.sort)
        .with_per_page(request.per_page)
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend + Send + Sync> SearchPort for GithubClient<B> {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RepositorySummary>, SearchError> {
        let query = to_search_query(request);
        let page = self.search_repositories(&query).await.map_err(|err| {
            warn!(query = %request.query, error = %err, "GitHub search failed");
            map_error(err)
        })?;

        Ok(page.items.into_iter().map(to_summary).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_config;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use crate::parsing::tests::repo_json;
    use repodeck_core::{Filters, FiltersUpdate, RATE_LIMITED_MESSAGE, SEARCH_FAILED_MESSAGE};
    use serde_json::json;

    fn request(query: &str) -> SearchRequest {
        let filters = Filters::default().merged(&FiltersUpdate::query(query));
        SearchRequest::from_filters(&filters, 12)
    }

    #[tokio::test]
    async fn test_search_converts_items_in_api_order() {
        let items: Vec<_> = (0..12)
            .map(|i| repo_json(100 + i, &format!("org/repo-{i}"), 1000 - i * 10))
            .collect();
        let backend = FakeBackend::new().with_response(
            "q=react",
            CannedResponse::Json(json!({"total_count": 12, "items": items})),
        );
        let client = GithubClient::with_backend(test_config(), backend);

        let repos = client.search(&request("react")).await.unwrap();

        assert_eq!(repos.len(), 12);
        assert_eq!(repos[0].id, RepositoryId(100));
        assert_eq!(repos[0].full_name, "org/repo-0");
        assert_eq!(repos[0].license_name(), Some("MIT License"));
        assert!(repos.windows(2).all(|w| w[0].stargazers_count > w[1].stargazers_count));
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limited() {
        let backend = FakeBackend::new().with_response("search", CannedResponse::RateLimited);
        let client = GithubClient::with_backend(test_config(), backend);

        let err = client.search(&request("react")).await.unwrap_err();
        assert_eq!(err, SearchError::RateLimited);
        assert_eq!(err.user_message(), RATE_LIMITED_MESSAGE);
    }

    #[tokio::test]
    async fn test_server_error_maps_to_generic_failure() {
        let backend = FakeBackend::new().with_response("search", CannedResponse::Status(503));
        let client = GithubClient::with_backend(test_config(), backend);

        let err = client.search(&request("react")).await.unwrap_err();
        assert!(matches!(err, SearchError::Network { .. }));
        assert_eq!(err.user_message(), SEARCH_FAILED_MESSAGE);
    }

    #[test]
    fn test_map_error_variants() {
        assert_eq!(
            map_error(GithubError::ApiRequestFailed {
                status: 429,
                url: String::new()
            }),
            SearchError::RateLimited
        );
        assert!(matches!(
            map_error(GithubError::InvalidResponse {
                message: "x".to_string()
            }),
            SearchError::InvalidResponse { .. }
        ));
        let url_err = url::Url::parse("nope").unwrap_err();
        assert!(matches!(
            map_error(GithubError::InvalidUrl(url_err)),
            SearchError::Configuration { .. }
        ));
    }
}
