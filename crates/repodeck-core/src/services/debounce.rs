//! Single-slot cancellable timer.
//!
//! Holds at most one deadline. Arming replaces the previous deadline, so a
//! stale timer can never fire after a newer one has been armed.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Debounce timer owned by exactly one task.
#[derive(Debug)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Cancel any pending deadline and schedule a new one `delay` from now.
    pub fn rearm(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Drop the pending deadline, if any.
    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolve when the armed deadline passes, disarming the timer.
    ///
    /// Never resolves while disarmed.
    pub async fn expired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                sleep_until(deadline).await;
                self.deadline = None;
            }
            None => std::future::pending().await,
        }
    }
}
