//! # Shared Rotation Handle
//!
//! One `parking_lot::Mutex` guards the whole [`RotationState`]: index,
//! window, assignments, completion flags and identifier map. Every operation
//! (read, toggle, staleness check, advance) takes the same lock, so readers
//! never observe some zones on the new week and others on the old one, and
//! concurrent triggers observing the same stale window produce exactly one
//! advance: the first holder advances, the rest find the window current.
//!
//! All operations are synchronous and O(tasks); the lock is never held across
//! an `.await`. `parking_lot::Mutex` does not poison, so a panicking holder
//! cannot wedge the service.

use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use parking_lot::Mutex;

use chores_core::{RotationIndex, WeekWindow};

use crate::error::RotationError;
use crate::rotation::{Advance, AdvanceTrigger, Completion, RotationState, WeekView};
use crate::store::IndexStore;

/// Cloneable, thread-safe handle to the rotation state.
#[derive(Debug, Clone)]
pub struct SharedRotation {
    state: Arc<Mutex<RotationState>>,
    store: Arc<dyn IndexStore>,
}

impl SharedRotation {
    /// Wrap `state`, persisting future advances through `store`.
    pub fn new(state: RotationState, store: Arc<dyn IndexStore>) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            store,
        }
    }

    /// Current rotation index.
    pub fn index(&self) -> RotationIndex {
        self.state.lock().index()
    }

    /// Current week window.
    pub fn window(&self) -> WeekWindow {
        self.state.lock().window()
    }

    /// The current week, advancing first if its window has ended.
    ///
    /// The staleness check, the advance and the snapshot happen under one
    /// lock acquisition.
    pub fn current_view<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<WeekView, RotationError> {
        let mut state = self.state.lock();
        if state.is_stale_at(now) {
            advance_locked(&mut state, self.store.as_ref(), now, AdvanceTrigger::Lazy)?;
        }
        Ok(state.view())
    }

    /// Advance if the window has ended at `now`; otherwise do nothing.
    pub fn advance_if_stale<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        trigger: AdvanceTrigger,
    ) -> Result<Option<Advance>, RotationError> {
        let mut state = self.state.lock();
        if !state.is_stale_at(now) {
            return Ok(None);
        }
        advance_locked(&mut state, self.store.as_ref(), now, trigger).map(Some)
    }

    /// Advance immediately, regardless of the window.
    pub fn force_advance<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<Advance, RotationError> {
        let mut state = self.state.lock();
        advance_locked(&mut state, self.store.as_ref(), now, AdvanceTrigger::Manual)
    }

    /// Change the completion flag of the task addressed by `id`.
    pub fn toggle(&self, id: &str, change: Completion) -> Result<bool, RotationError> {
        let completed = self.state.lock().toggle(id, change)?;
        tracing::debug!(task = id, ?change, completed, "task completion updated");
        Ok(completed)
    }

    /// Write the current index to the store.
    pub fn persist(&self) -> Result<RotationIndex, RotationError> {
        let state = self.state.lock();
        self.store.store(state.index())?;
        Ok(state.index())
    }
}

/// Persist the next index, then make the next week visible.
///
/// If the write fails nothing changes in memory.
fn advance_locked<Tz: TimeZone>(
    state: &mut RotationState,
    store: &dyn IndexStore,
    now: &DateTime<Tz>,
    trigger: AdvanceTrigger,
) -> Result<Advance, RotationError> {
    let pending = state.prepare_advance(now)?;
    if let Err(e) = store.store(pending.index()) {
        tracing::error!(
            error = %e,
            index = %pending.index(),
            trigger = %trigger,
            "failed to persist rotation index; week not advanced"
        );
        return Err(e.into());
    }
    let advance = state.commit(pending);
    tracing::info!(
        from = %advance.from,
        to = %advance.to,
        trigger = %trigger,
        week_start = %advance.window.start_label(),
        week_end = %advance.window.end_label(),
        "rotation advanced"
    );
    Ok(advance)
}
