//! Engine configuration.
//!
//! Pure data with defaults; adapters (bootstrap, tests) override individual
//! fields with the builder methods.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ports::DEFAULT_PAGE_SIZE;

/// Quiet period before a filter change triggers a search.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 600;

/// Minimum time the syncing indicator stays visible after a note write.
pub const DEFAULT_SYNCING_DELAY_MS: u64 = 500;

/// Timing and paging knobs for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Debounce window for filter changes, in milliseconds.
    pub search_debounce_ms: u64,
    /// Minimum visible duration of the syncing flag, in milliseconds.
    pub syncing_indicator_ms: u64,
    /// Results requested per search.
    pub page_size: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            syncing_indicator_ms: DEFAULT_SYNCING_DELAY_MS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce_ms = duration_ms(delay);
        self
    }

    #[must_use]
    pub const fn with_syncing_indicator(mut self, delay: Duration) -> Self {
        self.syncing_indicator_ms = duration_ms(delay);
        self
    }

    /// Set the page size. Clamped to the API's 1..=100 range.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, 100);
        self
    }

    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub const fn syncing_indicator(&self) -> Duration {
        Duration::from_millis(self.syncing_indicator_ms)
    }
}

#[allow(clippy::cast_possible_truncation)] // Durations beyond u64 milliseconds are not meaningful here
const fn duration_ms(delay: Duration) -> u64 {
    delay.as_millis() as u64
}
