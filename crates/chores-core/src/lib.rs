#![deny(missing_docs)]

//! # chores-core: Foundational Types for the Chore Rotation Service
//!
//! This crate defines the pure building blocks every other crate in the
//! workspace depends on. It has no internal crate dependencies and performs
//! no I/O beyond drawing randomness for task identifiers.
//!
//! ## Components
//!
//! - [`WeekWindow`]: the canonical Monday-anchored week containing an instant.
//! - [`distribute`]: maps a rotation offset, a roster and a task list to an
//!   assignment. Pure and deterministic.
//! - [`TaskId`] / [`IdentityPolicy`]: the externally addressable handle of a
//!   task, either random per process or derived from the description.
//! - [`RotationIndex`]: the sole persisted counter driving the rotation.
//!
//! ## Design Principles
//!
//! 1. **Newtypes for domain primitives.** A [`TaskId`] cannot be confused with
//!    a user name, and a [`RotationIndex`] can never be negative.
//!
//! 2. **Configuration errors are values.** Every precondition violation is a
//!    [`ConfigError`] returned to the caller, who treats it as fatal at
//!    startup. Nothing in this crate panics or clamps silently.

pub mod digest;
pub mod error;
pub mod identity;
pub mod index;
pub mod roster;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use digest::{sha256_digest, ContentDigest};
pub use error::{ChoresError, ConfigError};
pub use identity::{IdentityMap, IdentityPolicy, TaskId, TaskRef};
pub use index::RotationIndex;
pub use roster::{assignment, distribute, Assignee, Task, Zone};
pub use temporal::{WeekWindow, DISPLAY_DATE_FORMAT, WEEK_LENGTH_DAYS};
