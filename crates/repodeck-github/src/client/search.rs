//! Search functionality for the GitHub client.

use tracing::debug;

use crate::error::GithubResult;
use crate::http::HttpBackend;
use crate::models::{GhSearchPage, GithubSearchQuery};
use crate::parsing::parse_search_response;
use crate::url::build_search_url;

use super::GithubClient;

impl<B: HttpBackend> GithubClient<B> {
    /// Fetch one page of repositories, in the order the API ranked them.
    pub(crate) async fn search_repositories(
        &self,
        query: &GithubSearchQuery,
    ) -> GithubResult<GhSearchPage> {
        let url = build_search_url(&self.config, query);
        debug!(url = %url, "Searching repositories");

        let json: serde_json::Value = self.backend.get_json(&url).await?;
        let page = parse_search_response(&json)?;

        debug!(
            total = page.total_count,
            returned = page.items.len(),
            skipped = page.skipped,
            incomplete = page.incomplete_results,
            "Search page received"
        );
        Ok(page)
    }
}
