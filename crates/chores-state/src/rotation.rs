//! # Rotation State Machine
//!
//! Conceptually a single `Active(window)` state whose window, index and
//! assignments move forward together at each advance. Completion flags are
//! the only thing that changes in between.
//!
//! An advance is split into [`RotationState::prepare_advance`], which computes
//! the next week without touching `self`, and [`RotationState::commit`], which
//! swaps it in. The shared handle persists the new index between the two, so
//! a failed write leaves the current week fully intact.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use chores_core::{ConfigError, IdentityMap, RotationIndex, TaskId, WeekWindow, Zone};

use crate::error::RotationError;

/// Requested change to a task's completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Set the flag to the given value.
    Set(bool),
    /// Invert the flag.
    Flip,
}

/// What caused an advance. Recorded in logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceTrigger {
    /// The background timer fired at the end of the window.
    Timer,
    /// A read observed a window that had already ended.
    Lazy,
    /// An operator asked for an immediate rotation.
    Manual,
}

impl std::fmt::Display for AdvanceTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timer => f.write_str("timer"),
            Self::Lazy => f.write_str("lazy"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

/// Summary of a committed advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// Index before the advance.
    pub from: RotationIndex,
    /// Index after the advance.
    pub to: RotationIndex,
    /// Window after the advance.
    pub window: WeekWindow,
}

/// A fully computed next week, not yet visible to readers.
#[derive(Debug, Clone)]
pub struct PendingAdvance {
    index: RotationIndex,
    window: WeekWindow,
    zones: Vec<Zone>,
}

impl PendingAdvance {
    /// The index that must be persisted before committing.
    pub fn index(&self) -> RotationIndex {
        self.index
    }
}

/// Snapshot of the current week for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct WeekView {
    /// Current rotation index.
    pub index: RotationIndex,
    /// Current week window.
    pub window: WeekWindow,
    /// Zones with this week's assignments and completion flags.
    pub zones: Vec<Zone>,
}

/// The mutable rotation core.
#[derive(Debug, Clone)]
pub struct RotationState {
    index: RotationIndex,
    window: WeekWindow,
    zones: Vec<Zone>,
    ids: IdentityMap,
    shadowed: Vec<TaskId>,
}

impl RotationState {
    /// Materialize the week containing `now` for `index`.
    ///
    /// Fails if any zone cannot be distributed, which is a startup-time
    /// configuration error.
    pub fn new<Tz: TimeZone>(
        index: RotationIndex,
        mut zones: Vec<Zone>,
        now: &DateTime<Tz>,
    ) -> Result<Self, ConfigError> {
        for zone in &mut zones {
            zone.redistribute(index)?;
        }
        let (ids, shadowed) = IdentityMap::build(&zones);
        Ok(Self {
            index,
            window: WeekWindow::containing(now),
            zones,
            ids,
            shadowed,
        })
    }

    /// Current rotation index.
    pub fn index(&self) -> RotationIndex {
        self.index
    }

    /// Current week window.
    pub fn window(&self) -> WeekWindow {
        self.window
    }

    /// Zones in configuration order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Identifiers claimed by more than one task (content policy only).
    pub fn shadowed_ids(&self) -> &[TaskId] {
        &self.shadowed
    }

    /// Number of tasks reachable by identifier.
    pub fn addressable_tasks(&self) -> usize {
        self.ids.len()
    }

    /// Whether the current window has ended at `now`.
    pub fn is_stale_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.window.has_ended_at(now)
    }

    /// Compute the next week without changing the current one.
    pub fn prepare_advance<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<PendingAdvance, ConfigError> {
        let index = self.index.next()?;
        let mut zones = self.zones.clone();
        for zone in &mut zones {
            zone.redistribute(index)?;
        }
        Ok(PendingAdvance {
            index,
            window: WeekWindow::containing(now),
            zones,
        })
    }

    /// Make a prepared week current.
    ///
    /// Task positions never change across an advance, so the identifier map
    /// stays valid.
    pub fn commit(&mut self, pending: PendingAdvance) -> Advance {
        let from = self.index;
        self.index = pending.index;
        self.window = pending.window;
        self.zones = pending.zones;
        Advance {
            from,
            to: self.index,
            window: self.window,
        }
    }

    /// Advance unconditionally, without persistence.
    pub fn advance<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<Advance, ConfigError> {
        let pending = self.prepare_advance(now)?;
        Ok(self.commit(pending))
    }

    /// Apply `change` to the task addressed by `id`, returning the new flag.
    pub fn toggle(&mut self, id: &str, change: Completion) -> Result<bool, RotationError> {
        let target = self
            .ids
            .get(id)
            .ok_or_else(|| RotationError::UnknownTask(id.to_string()))?;
        let task = self
            .zones
            .get_mut(target.zone)
            .and_then(|zone| zone.task_mut(target.task))
            .ok_or_else(|| RotationError::UnknownTask(id.to_string()))?;
        Ok(match change {
            Completion::Set(done) => {
                task.set_completed(done);
                done
            }
            Completion::Flip => task.toggle(),
        })
    }

    /// Snapshot the current week.
    pub fn view(&self) -> WeekView {
        WeekView {
            index: self.index,
            window: self.window,
            zones: self.zones.clone(),
        }
    }
}
