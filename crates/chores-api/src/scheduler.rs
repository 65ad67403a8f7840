//! # Week Scheduler
//!
//! Background task that advances the rotation when the current week ends.
//!
//! The loop sleeps until the window's end, capped at [`MAX_SLEEP`] so that a
//! suspended host or a wall-clock jump is noticed within the hour, then asks
//! the shared rotation to advance *if stale*. Reads perform the same check,
//! and both paths go through one lock, so a boundary is crossed exactly once
//! no matter which trigger observes it first.
//!
//! A storage failure ends the loop with an error; the caller treats it as
//! fatal. There is no retry loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chores_state::{Advance, AdvanceTrigger, RotationError, SharedRotation};

use crate::clock::Clock;

/// Longest single sleep between staleness checks.
pub const MAX_SLEEP: Duration = Duration::from_secs(60 * 60);

/// Timer-driven advancement of the shared rotation.
#[derive(Debug, Clone)]
pub struct Scheduler {
    rotation: SharedRotation,
    clock: Arc<dyn Clock>,
    max_sleep: Duration,
}

impl Scheduler {
    /// Create a scheduler over `rotation`, reading time from `clock`.
    pub fn new(rotation: SharedRotation, clock: Arc<dyn Clock>) -> Self {
        Self {
            rotation,
            clock,
            max_sleep: MAX_SLEEP,
        }
    }

    /// Override the sleep cap.
    pub fn with_max_sleep(mut self, max_sleep: Duration) -> Self {
        self.max_sleep = max_sleep;
        self
    }

    /// How long to wait before the next check.
    pub fn next_sleep(&self) -> Duration {
        self.rotation
            .window()
            .remaining_at(&self.clock.now())
            .min(self.max_sleep)
    }

    /// Advance if the current window has ended.
    pub fn tick(&self) -> Result<Option<Advance>, RotationError> {
        self.rotation
            .advance_if_stale(&self.clock.now(), AdvanceTrigger::Timer)
    }

    /// Run until `shutdown` resolves or an advance fails.
    pub async fn run<F>(self, shutdown: F) -> Result<(), RotationError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::info!(max_sleep_secs = self.max_sleep.as_secs(), "scheduler started");
        loop {
            self.tick()?;
            let pause = self.next_sleep();
            tracing::debug!(sleep_secs = pause.as_secs(), "scheduler waiting");
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("scheduler stopped");
                    return Ok(());
                }
                _ = tokio::time::sleep(pause) => {}
            }
        }
    }
}
