#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod config;
mod logging;
mod wiring;

pub use config::{
    BootstrapConfig, ENV_GITHUB_API_URL, ENV_GITHUB_TOKEN, ENV_SEARCH_DEBOUNCE_MS,
    ENV_SYNCING_DELAY_MS,
};
pub use logging::{DEFAULT_LOG_FILTER, init_tracing};
pub use wiring::{Explorer, build_deps, start};

#[cfg(test)]
use tokio_test as _;
