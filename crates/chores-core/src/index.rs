//! # Rotation Index
//!
//! The single persisted counter that drives the rotation. It only ever moves
//! forward by one, and it can never be negative: parsing rejects negative
//! values as [`ConfigError::NegativeIndex`] instead of clamping them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Non-negative rotation counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RotationIndex(u64);

impl RotationIndex {
    /// Wrap a raw counter value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw counter value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The index one week later.
    pub fn next(&self) -> Result<Self, ConfigError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(ConfigError::IndexOverflow(self.0))
    }

    /// Offset of this index within a cycle of `len` positions.
    ///
    /// `len` must be non-zero; callers check this before distributing.
    pub(crate) fn offset_in(&self, len: usize) -> usize {
        // Lossless: the remainder is strictly less than `len`.
        (self.0 % len as u64) as usize
    }
}

impl FromStr for RotationIndex {
    type Err = ConfigError;

    /// Parse the persisted text form: one decimal integer, surrounding
    /// whitespace allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<u64>() {
            Ok(v) => Ok(Self(v)),
            Err(unsigned_err) => match trimmed.parse::<i64>() {
                Ok(v) if v < 0 => Err(ConfigError::NegativeIndex(v)),
                _ => Err(ConfigError::MalformedIndex {
                    value: trimmed.to_string(),
                    reason: unsigned_err.to_string(),
                }),
            },
        }
    }
}

impl std::fmt::Display for RotationIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RotationIndex {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
