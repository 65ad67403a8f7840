//! # Service Bootstrap
//!
//! Reads the zone configuration and the persisted rotation index at startup
//! and assembles the application state.
//!
//! ## Bootstrap Sequence
//!
//! 1. **Load zone configuration**: JSON or YAML, chosen by file extension.
//! 2. **Materialize zones**: validate each zone and issue task identifiers.
//! 3. **Load rotation index**: from the index file; missing, negative or
//!    malformed values abort startup.
//! 4. **Distribute**: build the current week for the loaded index.
//! 5. **Log banner**: per-zone summary, starting index and window.
//!
//! Every failure here is fatal: the service never starts on a configuration
//! it cannot honour.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chores_core::{ChoresError, ConfigError, IdentityPolicy, Zone};
use chores_state::{FileIndexStore, IndexStore, RotationState, SharedRotation, StoreError};
use serde::Deserialize;

use crate::clock::Clock;
use crate::state::{AppConfig, AppState};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors during service bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON/YAML of the expected shape.
    #[error("failed to parse configuration {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// A zone or the loaded index violates a precondition.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Task identifiers could not be issued.
    #[error("failed to materialize zones: {0}")]
    Roster(#[from] ChoresError),

    /// The rotation index could not be loaded.
    #[error("failed to load rotation index: {0}")]
    Index(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Configuration file
// ---------------------------------------------------------------------------

/// On-disk encoding of the zone configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// `.yaml` and `.yml` are YAML; everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Top-level zone configuration.
///
/// Keys are accepted in snake_case or the legacy PascalCase spelling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChoresConfig {
    #[serde(default, alias = "IdentityPolicy")]
    pub identity_policy: IdentityPolicy,
    #[serde(default, alias = "Zones")]
    pub zones: Vec<ZoneConfig>,
}

/// One zone as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZoneConfig {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Users")]
    pub users: Vec<String>,
    #[serde(default, alias = "Tasks")]
    pub tasks: Vec<TaskConfig>,
}

/// One task as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskConfig {
    #[serde(alias = "Description")]
    pub description: String,
}

impl ChoresConfig {
    /// Parse configuration text in the given format.
    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        }
    }

    /// Validate every zone and issue task identifiers.
    pub fn into_zones(self) -> Result<Vec<Zone>, BootstrapError> {
        let policy = self.identity_policy;
        self.zones
            .into_iter()
            .map(|zone| {
                Zone::materialize(
                    zone.name,
                    zone.users,
                    zone.tasks.into_iter().map(|t| t.description),
                    policy,
                )
                .map_err(|e| match e {
                    ChoresError::Config(c) => BootstrapError::Config(c),
                    other => BootstrapError::Roster(other),
                })
            })
            .collect()
    }
}

/// Read and parse the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<ChoresConfig, BootstrapError> {
    let text = std::fs::read_to_string(path).map_err(|source| BootstrapError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ChoresConfig::parse(&text, ConfigFormat::from_path(path)).map_err(|reason| {
        BootstrapError::Parse {
            path: path.to_path_buf(),
            reason,
        }
    })
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

/// Load everything named by `config` and build the application state.
pub fn bootstrap(config: AppConfig, clock: Arc<dyn Clock>) -> Result<AppState, BootstrapError> {
    let chores = load_config(&config.config_path)?;
    tracing::info!(path = %config.config_path.display(), zones = chores.zones.len(), "configuration loaded");
    let store = FileIndexStore::new(&config.index_path);
    assemble(config, chores, Arc::new(store), clock)
}

/// Build the application state from already-loaded parts.
pub fn assemble(
    config: AppConfig,
    chores: ChoresConfig,
    store: Arc<dyn IndexStore>,
    clock: Arc<dyn Clock>,
) -> Result<AppState, BootstrapError> {
    let policy = chores.identity_policy;
    let zones = chores.into_zones()?;
    let index = store.load()?;
    let rotation = RotationState::new(index, zones, &clock.now())?;

    for id in rotation.shadowed_ids() {
        tracing::warn!(
            id = %id,
            "duplicate task description; only the last task with this identifier can be toggled"
        );
    }
    log_banner(&config, &rotation, policy);

    let shared = SharedRotation::new(rotation, store);
    Ok(AppState::new(shared, clock, config))
}

fn log_banner(config: &AppConfig, rotation: &RotationState, policy: IdentityPolicy) {
    for zone in rotation.zones() {
        tracing::info!(
            zone = %zone.name(),
            users = ?zone.users(),
            tasks = zone.tasks().len(),
            "zone loaded"
        );
    }
    let window = rotation.window();
    tracing::info!(
        index = %rotation.index(),
        week_start = %window.start_label(),
        week_end = %window.end_label(),
        identity_policy = %policy,
        addressable_tasks = rotation.addressable_tasks(),
        "rotation bootstrap complete"
    );

    println!("┌──────────────────────────────────────────────────┐");
    println!("│  Chores Rotation Server v{:<24}│", env!("CARGO_PKG_VERSION"));
    println!("├──────────────────────────────────────────────────┤");
    println!("│  Zones:         {:<33}│", rotation.zones().len());
    println!("│  Index:         {:<33}│", rotation.index().to_string());
    println!(
        "│  Week:          {:<33}│",
        format!("{} .. {}", window.start_label(), window.end_label())
    );
    println!("│  Task IDs:      {:<33}│", policy.as_str());
    println!("│  Listen:        {:<33}│", config.listen.to_string());
    println!("└──────────────────────────────────────────────────┘");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
