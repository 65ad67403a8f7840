//! # Rotation Errors
//!
//! [`RotationError::UnknownTask`] is the only recoverable, per-request
//! failure. Everything else means the configuration or the durable index can
//! no longer be trusted and the service must stop.

use std::path::PathBuf;

use chores_core::ConfigError;
use thiserror::Error;

/// Errors raised by rotation state transitions.
#[derive(Error, Debug)]
pub enum RotationError {
    /// No task carries the given external identifier. State is unchanged.
    #[error("unknown task identifier: {0}")]
    UnknownTask(String),

    /// A distribution precondition failed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The rotation index could not be made durable.
    #[error("rotation index storage failed: {0}")]
    Storage(#[from] StoreError),
}

impl RotationError {
    /// Whether the service can keep running after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnknownTask(_))
    }
}

/// Errors reading or writing the persisted rotation index.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("{op} {path}: {source}")]
    Io {
        /// What was being attempted ("read", "write", "rename").
        op: &'static str,
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The stored text is not a valid rotation index.
    #[error("invalid index in {path}: {source}")]
    Invalid {
        /// The file that was read.
        path: PathBuf,
        /// The parse failure.
        #[source]
        source: ConfigError,
    },

    /// The backing store refused the write.
    #[error("write rejected: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unknown_task_is_recoverable() {
        assert!(RotationError::UnknownTask("abc".into()).is_recoverable());
        assert!(!RotationError::Config(ConfigError::EmptyZoneName).is_recoverable());
        assert!(!RotationError::Storage(StoreError::Rejected("disk full".into())).is_recoverable());
    }

    #[test]
    fn io_error_names_path_and_operation() {
        let err = StoreError::Io {
            op: "write",
            path: PathBuf::from("/var/chores/index.int"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("write"));
        assert!(msg.contains("/var/chores/index.int"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn invalid_index_carries_parse_reason() {
        let err = StoreError::Invalid {
            path: PathBuf::from("index.int"),
            source: ConfigError::NegativeIndex(-1),
        };
        assert!(err.to_string().contains("-1"));
    }
}
