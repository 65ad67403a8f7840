//! # chores-state: Rotation State Machine
//!
//! Holds the only mutable state of the service: the rotation index, the
//! current week window, per-zone assignments with their completion flags,
//! and the identifier → task index.
//!
//! ## Layers
//!
//! - [`RotationState`]: the plain state machine. Single-threaded semantics;
//!   every transition takes the current instant as an argument so tests can
//!   drive it with any clock.
//! - [`SharedRotation`]: a cloneable handle that guards one `RotationState`
//!   behind a single mutex and persists the index through an [`IndexStore`]
//!   before any advance becomes visible.
//!
//! ## Transitions
//!
//! ```text
//!            toggle(id, Set | Flip)
//!                 ┌──────┐
//!                 ▼      │
//!   ──new()──▶ Active(window) ──advance()──▶ Active(next window)
//!                                 (index + 1, redistribute, clear flags)
//! ```

pub mod error;
pub mod rotation;
pub mod shared;
pub mod store;

pub use error::{RotationError, StoreError};
pub use rotation::{Advance, AdvanceTrigger, Completion, PendingAdvance, RotationState, WeekView};
pub use shared::SharedRotation;
pub use store::{FileIndexStore, IndexStore, MemoryIndexStore};
