//! # Error Hierarchy
//!
//! Structured error types for the rotation engine, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Two families exist:
//!
//! - [`ConfigError`]: the configuration or persisted state is inconsistent.
//!   Always fatal: the service must not start (or keep running) on top of it.
//! - [`ChoresError`]: top-level wrapper that adds entropy failures raised
//!   while issuing random task identifiers.

use thiserror::Error;

/// Top-level error type for the chores stack.
#[derive(Error, Debug)]
pub enum ChoresError {
    /// Configuration or persisted state violates a precondition.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The operating system could not supply randomness for task identifiers.
    #[error("entropy source failure: {0}")]
    Entropy(String),
}

/// Precondition violations in configuration or persisted rotation state.
///
/// Each variant carries the offending input so that operators can fix the
/// configuration file or index file without guesswork.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Tasks were handed to the distributor with nobody to assign them to.
    #[error("cannot distribute {tasks} task(s) over an empty roster")]
    EmptyRoster {
        /// Number of tasks that could not be assigned.
        tasks: usize,
    },

    /// A configured zone lists tasks but no users.
    #[error("zone \"{zone}\" has {tasks} task(s) but no users")]
    ZoneWithoutUsers {
        /// The zone name from the configuration file.
        zone: String,
        /// Number of tasks configured for the zone.
        tasks: usize,
    },

    /// A configured zone has an empty or whitespace-only name.
    #[error("zone names must be non-empty")]
    EmptyZoneName,

    /// The persisted rotation index is negative.
    #[error("rotation index must not be negative, got {0}")]
    NegativeIndex(i64),

    /// The persisted rotation index is not an integer.
    #[error("malformed rotation index \"{value}\": {reason}")]
    MalformedIndex {
        /// The raw text that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The rotation index cannot be advanced any further.
    #[error("rotation index overflow at {0}")]
    IndexOverflow(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roster_display() {
        let err = ConfigError::EmptyRoster { tasks: 3 };
        assert!(format!("{err}").contains("3 task(s)"));
    }

    #[test]
    fn zone_without_users_names_the_zone() {
        let err = ConfigError::ZoneWithoutUsers {
            zone: "Kitchen".to_string(),
            tasks: 2,
        };
        let msg = format!("{err}");
        assert!(msg.contains("Kitchen"));
        assert!(msg.contains("no users"));
    }

    #[test]
    fn negative_index_display() {
        let err = ConfigError::NegativeIndex(-4);
        assert!(format!("{err}").contains("-4"));
    }

    #[test]
    fn malformed_index_display() {
        let err = ConfigError::MalformedIndex {
            value: "seven".to_string(),
            reason: "invalid digit".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("seven"));
        assert!(msg.contains("invalid digit"));
    }

    #[test]
    fn chores_error_wraps_config_error() {
        let err: ChoresError = ConfigError::EmptyZoneName.into();
        assert!(format!("{err}").starts_with("configuration error"));
    }

    #[test]
    fn chores_error_is_config_or_entropy() {
        let errors = [
            ChoresError::from(ConfigError::EmptyZoneName),
            ChoresError::Entropy("no randomness".to_string()),
        ];
        for err in errors {
            let prefix = match &err {
                ChoresError::Config(_) => "configuration",
                ChoresError::Entropy(_) => "entropy",
            };
            assert!(err.to_string().starts_with(prefix));
        }
    }

    #[test]
    fn chores_error_entropy_display() {
        let err = ChoresError::Entropy("getrandom unavailable".to_string());
        assert!(format!("{err}").contains("getrandom unavailable"));
    }
}
