#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultGithubClient is meant to be used through the SearchPort trait, not
// its internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod parsing;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultGithubClient;

// Configuration
pub use config::{DEFAULT_GITHUB_API_URL, GithubClientConfig, MAX_RETRIES};

// Errors surfaced by client construction
pub use error::GithubError;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
