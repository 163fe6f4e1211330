//! Integration tests for the reqwest backend.
//!
//! A throwaway HTTP/1.1 listener on localhost serves canned responses, so
//! these tests exercise the real request headers, retries and rate-limit
//! detection without touching the network.

use std::time::Duration;

use repodeck_core::{
    Filters, FiltersUpdate, SearchError, SearchPort, SearchRequest, SortOrder,
};
use repodeck_github::{DefaultGithubClient, GithubClientConfig};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

struct Canned {
    status: u16,
    headers: Vec<(&'static str, &'static str)>,
    body: String,
}

impl Canned {
    fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }
}

/// Serve one canned response per connection, returning the raw requests.
async fn serve(responses: Vec<Canned>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for canned in responses {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            requests.push(String::from_utf8_lossy(&buf).into_owned());

            let mut response = format!(
                "HTTP/1.1 {} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n",
                canned.status,
                canned.body.len()
            );
            for (name, value) in &canned.headers {
                response.push_str(&format!("{name}: {value}\r\n"));
            }
            response.push_str("\r\n");
            response.push_str(&canned.body);

            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        requests
    });

    (base, handle)
}

fn client(base: &str) -> DefaultGithubClient {
    DefaultGithubClient::new(
        &GithubClientConfig::new()
            .with_base_url(base)
            .with_user_agent("repodeck-it/1.0")
            .with_token("ghp_test")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(1)
            .with_retry_delay(Duration::from_millis(1)),
    )
    .unwrap()
}

fn request(query: &str, language: &str) -> SearchRequest {
    let filters = Filters::default().merged(
        &FiltersUpdate::query(query)
            .with_language(language)
            .with_sort(SortOrder::Stars),
    );
    SearchRequest::from_filters(&filters, 12)
}

fn item(id: u64, full_name: &str, stars: u64) -> serde_json::Value {
    let (owner, name) = full_name.split_once('/').unwrap();
    json!({
        "id": id,
        "name": name,
        "full_name": full_name,
        "owner": {"login": owner, "avatar_url": "https://avatars.githubusercontent.com/u/1"},
        "html_url": format!("https://github.com/{full_name}"),
        "description": null,
        "language": "Rust",
        "stargazers_count": stars,
        "forks_count": 1,
        "open_issues_count": 2,
        "watchers_count": stars,
        "license": null,
        "updated_at": "2026-03-03T03:03:03Z"
    })
}

#[tokio::test]
async fn search_sends_github_headers_and_parses_items() {
    let body = json!({
        "total_count": 2,
        "incomplete_results": false,
        "items": [item(1, "tokio-rs/tokio", 30_000), item(2, "tokio-rs/axum", 20_000)]
    });
    let (base, server) = serve(vec![Canned::json(200, &body)]).await;

    let repos = client(&base).search(&request("async runtime", "Rust")).await.unwrap();

    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].full_name, "tokio-rs/tokio");
    assert_eq!(repos[1].stargazers_count, 20_000);

    let requests = server.await.unwrap();
    let raw = requests[0].to_lowercase();
    assert!(raw.starts_with(
        "get /search/repositories?q=async%20runtime+language%3arust&sort=stars&order=desc&per_page=12 "
    ));
    assert!(raw.contains("user-agent: repodeck-it/1.0"));
    assert!(raw.contains("accept: application/vnd.github+json"));
    assert!(raw.contains("authorization: bearer ghp_test"));
}

#[tokio::test]
async fn exhausted_quota_is_rate_limited_without_retry() {
    let (base, server) = serve(vec![
        Canned::json(403, &json!({"message": "API rate limit exceeded"}))
            .with_header("x-ratelimit-remaining", "0")
            .with_header("x-ratelimit-reset", "1700000000"),
    ])
    .await;

    let err = client(&base).search(&request("react", "")).await.unwrap_err();

    assert_eq!(err, SearchError::RateLimited);
    assert_eq!(server.await.unwrap().len(), 1);
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
    let (base, server) =
        serve(vec![Canned::json(429, &json!({"message": "secondary rate limit"}))]).await;

    let err = client(&base).search(&request("react", "")).await.unwrap_err();

    assert_eq!(err, SearchError::RateLimited);
    server.await.unwrap();
}

#[tokio::test]
async fn server_error_is_retried() {
    let ok = json!({"total_count": 1, "items": [item(9, "a/b", 5)]});
    let (base, server) = serve(vec![
        Canned::json(502, &json!({"message": "bad gateway"})),
        Canned::json(200, &ok),
    ])
    .await;

    let repos = client(&base).search(&request("b", "")).await.unwrap();

    assert_eq!(repos.len(), 1);
    assert_eq!(server.await.unwrap().len(), 2);
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let (base, server) =
        serve(vec![Canned::json(422, &json!({"message": "Validation Failed"}))]).await;

    let err = client(&base).search(&request("b", "")).await.unwrap_err();

    assert!(matches!(err, SearchError::Network { .. }));
    assert_eq!(server.await.unwrap().len(), 1);
}
