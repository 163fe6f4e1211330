//! Repository fixtures.

use chrono::{TimeZone, Utc};
use repodeck_core::{RepositoryId, RepositoryOwner, RepositorySummary};

pub fn repo(id: u64, stars: u64) -> RepositorySummary {
    RepositorySummary {
        id: RepositoryId(id),
        name: format!("project-{id}"),
        full_name: format!("acme/project-{id}"),
        owner: RepositoryOwner {
            login: "acme".to_string(),
            avatar_url: "https://avatars.example.com/u/42".to_string(),
        },
        html_url: format!("https://github.com/acme/project-{id}"),
        description: Some(format!("Project number {id}")),
        language: Some("TypeScript".to_string()),
        stargazers_count: stars,
        forks_count: stars / 10,
        open_issues_count: 3,
        watchers_count: stars,
        license: None,
        updated_at: Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap(),
    }
}

/// Twelve repositories in descending star order, as the API returns them.
pub fn page_by_stars() -> Vec<RepositorySummary> {
    (1..=12).map(|i| repo(100 + i, 10_000 - i * 500)).collect()
}
