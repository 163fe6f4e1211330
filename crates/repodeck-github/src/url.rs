//! URL construction for the GitHub search API.

use crate::models::{GithubConfig, GithubSearchQuery};
use url::Url;

const SEARCH_PATH: &str = "search/repositories";

/// Build the `q` parameter: the free text plus a `language:` qualifier.
///
/// Already percent-encoded; the separator is a literal `+`.
fn build_q_param(query: &GithubSearchQuery) -> String {
    let mut q = urlencoding::encode(query.query.trim()).into_owned();
    let language = query.language.trim();
    if !language.is_empty() {
        q.push('+');
        q.push_str(&urlencoding::encode(&format!("language:{language}")));
    }
    q
}

/// Build a search URL with all required parameters.
pub fn build_search_url(config: &GithubConfig, query: &GithubSearchQuery) -> Url {
    let mut url = config.base_url.clone();

    let base_path = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{base_path}/{SEARCH_PATH}"));

    let query_string = format!(
        "q={}&sort={}&order=desc&per_page={}",
        build_q_param(query),
        query.sort.as_api_param(),
        query.per_page.clamp(1, 100),
    );
    url.set_query(Some(&query_string));

    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_config;
    use repodeck_core::SortOrder;

    #[test]
    fn test_build_search_url_default() {
        let url = build_search_url(&test_config(), &GithubSearchQuery::new("react"));
        assert_eq!(
            url.as_str(),
            "https://api.github.com/search/repositories?q=react&sort=stars&order=desc&per_page=12"
        );
    }

    #[test]
    fn test_language_qualifier_is_appended() {
        let query = GithubSearchQuery::new("web framework")
            .with_language("Rust")
            .with_sort(SortOrder::Updated);
        let url = build_search_url(&test_config(), &query);

        assert_eq!(url.path(), "/search/repositories");
        let q = url.query().unwrap();
        assert!(q.starts_with("q=web%20framework+language%3ARust&"));
        assert!(q.contains("sort=updated"));
        assert!(q.contains("order=desc"));
    }

    #[test]
    fn test_blank_language_is_ignored() {
        let query = GithubSearchQuery::new("tokio").with_language("   ");
        let url = build_search_url(&test_config(), &query);
        assert!(!url.query().unwrap().contains("language"));
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let mut config = test_config();
        config.base_url = Url::parse("https://ghe.example.com/api/v3/").unwrap();
        let url = build_search_url(&config, &GithubSearchQuery::new("x").with_per_page(500));

        assert_eq!(url.path(), "/api/v3/search/repositories");
        assert!(url.query().unwrap().ends_with("per_page=100"));
    }

    #[test]
    fn test_special_characters_are_encoded() {
        let url = build_search_url(&test_config(), &GithubSearchQuery::new("c++ & friends"));
        let q = url.query().unwrap();
        assert!(q.starts_with("q=c%2B%2B%20%26%20friends&"));
    }
}
