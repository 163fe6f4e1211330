//! Deployment configuration.
//!
//! Everything the adapters need that is not engine logic: API root, token
//! and the two timing knobs.

use std::time::Duration;

use anyhow::{Context, Result};
use repodeck_core::EngineConfig;
use repodeck_github::DEFAULT_GITHUB_API_URL;

pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_API_URL: &str = "REPODECK_GITHUB_API_URL";
pub const ENV_SEARCH_DEBOUNCE_MS: &str = "REPODECK_SEARCH_DEBOUNCE_MS";
pub const ENV_SYNCING_DELAY_MS: &str = "REPODECK_SYNCING_DELAY_MS";

/// Configuration for [`crate::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub engine: EngineConfig,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl BootstrapConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// Blank values count as unset. Numbers that do not parse are an error
    /// naming the variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.github_token = get(ENV_GITHUB_TOKEN);
        if let Some(url) = get(ENV_GITHUB_API_URL) {
            config.github_api_url = url.trim().to_string();
        }
        if let Some(ms) = get(ENV_SEARCH_DEBOUNCE_MS) {
            config.engine = config
                .engine
                .with_search_debounce(Duration::from_millis(parse_ms(ENV_SEARCH_DEBOUNCE_MS, &ms)?));
        }
        if let Some(ms) = get(ENV_SYNCING_DELAY_MS) {
            config.engine = config
                .engine
                .with_syncing_indicator(Duration::from_millis(parse_ms(ENV_SYNCING_DELAY_MS, &ms)?));
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}

fn parse_ms(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a whole number of milliseconds, got {value:?}"))
}
