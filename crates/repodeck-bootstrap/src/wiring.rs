//! Adapter wiring.

use std::sync::Arc;

use anyhow::{Context, Result};
use repodeck_core::{ExplorerCore, ExplorerDeps};
use repodeck_github::{DefaultGithubClient, GithubClientConfig};
use repodeck_local::{AnonymousIdentityProvider, MemoryDocumentStore};
use tracing::info;

use crate::config::BootstrapConfig;

/// A running engine plus the local adapters a shell may want to drive
/// directly (sign out, inspect stored documents).
pub struct Explorer {
    pub core: ExplorerCore,
    pub identity: AnonymousIdentityProvider,
    pub documents: MemoryDocumentStore,
}

/// Build the three collaborators from configuration.
pub fn build_deps(
    config: &BootstrapConfig,
    identity: &AnonymousIdentityProvider,
    documents: &MemoryDocumentStore,
) -> Result<ExplorerDeps> {
    let github = DefaultGithubClient::new(
        &GithubClientConfig::new()
            .with_base_url(&config.github_api_url)
            .with_optional_token(config.github_token.clone()),
    )
    .with_context(|| format!("Failed to build GitHub client for {}", config.github_api_url))?;

    Ok(ExplorerDeps::new(
        Arc::new(github),
        Arc::new(identity.clone()),
        Arc::new(documents.clone()),
    ))
}

/// Wire the adapters and start the engine.
///
/// Must be called from within a Tokio runtime.
pub fn start(config: BootstrapConfig) -> Result<Explorer> {
    tokio::runtime::Handle::try_current()
        .context("repodeck must be started inside a Tokio runtime")?;

    let identity = AnonymousIdentityProvider::new();
    let documents = MemoryDocumentStore::new();
    let deps = build_deps(&config, &identity, &documents)?;

    info!(
        api = %config.github_api_url,
        authenticated = config.github_token.is_some(),
        "Starting repodeck"
    );
    let core = ExplorerCore::start(deps, config.engine);

    Ok(Explorer {
        core,
        identity,
        documents,
    })
}
