//! Fixtures shared by unit tests.

use chrono::{TimeZone, Utc};

use crate::domain::{Note, RepositoryId, RepositoryOwner, RepositorySummary};

pub fn repo(id: u64) -> RepositorySummary {
    repo_with_stars(id, 0)
}

pub fn repo_with_stars(id: u64, stars: u64) -> RepositorySummary {
    RepositorySummary {
        id: RepositoryId(id),
        name: format!("repo-{id}"),
        full_name: format!("owner/repo-{id}"),
        owner: RepositoryOwner {
            login: "owner".to_string(),
            avatar_url: "https://avatars.example.com/u/1".to_string(),
        },
        html_url: format!("https://github.com/owner/repo-{id}"),
        description: None,
        language: Some("Rust".to_string()),
        stargazers_count: stars,
        forks_count: 0,
        open_issues_count: 0,
        watchers_count: stars,
        license: None,
        updated_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn note_at(content: &str, minute: u32) -> Note {
    Note::new(content, Utc.with_ymd_and_hms(2026, 2, 1, 10, minute, 0).unwrap())
}
