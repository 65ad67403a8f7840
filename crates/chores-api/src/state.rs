//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor.
//!
//! Everything mutable lives behind [`SharedRotation`]; this struct only adds
//! the clock, the static configuration and the fatal-error signal that lets
//! a request handler or the scheduler bring the whole process down.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chores_state::SharedRotation;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::clock::Clock;

/// Default location of the zone configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/usr/local/share/chores/config.json";

/// Default directory holding `index.html` and `static/`.
pub const DEFAULT_WEB_ROOT: &str = "/usr/local/share/chores/web";

/// Default location of the persisted rotation index.
pub const DEFAULT_INDEX_PATH: &str = "/var/chores/index.int";

/// Default listen address.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Zone configuration file (JSON or YAML).
    pub config_path: PathBuf,
    /// Directory served at `/` and `/static`.
    pub web_root: PathBuf,
    /// Persisted rotation index file.
    pub index_path: PathBuf,
    /// Address to bind the HTTP server to.
    pub listen: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            web_root: PathBuf::from(DEFAULT_WEB_ROOT),
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// One-shot "the service must stop" flag.
///
/// The first reason raised wins; later ones are logged by their callers but
/// not recorded.
#[derive(Debug, Clone, Default)]
pub struct FatalSignal {
    notify: Arc<Notify>,
    reason: Arc<Mutex<Option<String>>>,
}

impl FatalSignal {
    /// Record `reason` and wake whoever is waiting in [`FatalSignal::raised`].
    pub fn raise(&self, reason: impl Into<String>) {
        {
            let mut slot = self.reason.lock();
            if slot.is_none() {
                *slot = Some(reason.into());
            }
        }
        self.notify.notify_one();
    }

    /// Whether a fatal error has been raised.
    pub fn is_raised(&self) -> bool {
        self.reason.lock().is_some()
    }

    /// The first recorded reason, if any.
    pub fn reason(&self) -> Option<String> {
        self.reason.lock().clone()
    }

    /// Resolve once a fatal error has been raised.
    pub async fn raised(&self) {
        if self.is_raised() {
            return;
        }
        self.notify.notified().await;
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The rotation: index, window, assignments and completion flags.
    pub rotation: SharedRotation,
    /// Source of "now" for staleness checks.
    pub clock: Arc<dyn Clock>,
    /// Static configuration.
    pub config: AppConfig,
    /// Raised on unrecoverable runtime errors.
    pub fatal: FatalSignal,
}

impl AppState {
    /// Assemble application state around an already-built rotation.
    pub fn new(rotation: SharedRotation, clock: Arc<dyn Clock>, config: AppConfig) -> Self {
        Self {
            rotation,
            clock,
            config,
            fatal: FatalSignal::default(),
        }
    }
}
