//! Common test utilities.
//!
//! Fakes for the search port, repository fixtures and helpers for waiting
//! on engine state.

#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;

use std::time::Duration;

use repodeck_core::{ExplorerCore, ExplorerState};

/// Wait until the engine state satisfies `pred`.
pub async fn wait_for(
    core: &ExplorerCore,
    pred: impl FnMut(&ExplorerState) -> bool,
) -> ExplorerState {
    let mut rx = core.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(30), rx.wait_for(pred))
        .await
        .expect("timed out waiting for engine state")
        .expect("state store closed");
    state.clone()
}

/// Let spawned tasks run without advancing any timers meaningfully.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
