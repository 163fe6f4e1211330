//! JSON parsing for GitHub search responses.
//!
//! Sync functions that turn the raw response into wire models. Items that
//! fail to parse are skipped so one odd repository never hides a page.

use serde_json::Value;
use tracing::debug;

use crate::error::{GithubError, GithubResult};
use crate::models::{GhRepository, GhSearchPage};

/// Parse a single entry of the `items` array.
pub fn parse_repository(json: &Value) -> Option<GhRepository> {
    match serde_json::from_value::<GhRepository>(json.clone()) {
        Ok(repo) => Some(repo),
        Err(err) => {
            let id = json.get("id").and_then(Value::as_u64);
            debug!(?id, error = %err, "Skipping unparseable search item");
            None
        }
    }
}

/// Parse a search response body.
///
/// A body without an `items` array is an invalid response.
pub fn parse_search_response(json: &Value) -> GithubResult<GhSearchPage> {
    let items = json
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| GithubError::InvalidResponse {
            message: "search response has no `items` array".to_string(),
        })?;

    let parsed: Vec<GhRepository> = items.iter().filter_map(parse_repository).collect();
    let skipped = items.len() - parsed.len();

    Ok(GhSearchPage {
        total_count: json.get("total_count").and_then(Value::as_u64).unwrap_or(0),
        incomplete_results: json
            .get("incomplete_results")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        items: parsed,
        skipped,
    })
}
