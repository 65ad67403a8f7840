//! # Task Identifiers
//!
//! Every task carries an external identifier that clients use to toggle its
//! completion flag. The identifier belongs to the *task*, not to the weekly
//! assignment: it is issued once when tasks are materialized and survives
//! every rotation.
//!
//! ## Policies
//!
//! | Policy                     | Stable across restarts | Unforgeable | Duplicates |
//! |----------------------------|------------------------|-------------|------------|
//! | [`IdentityPolicy::Random`]  | no                     | yes         | never      |
//! | [`IdentityPolicy::Content`] | yes                    | no          | identical descriptions share one id |
//!
//! Under the content policy two tasks with the same description hash to the
//! same identifier. The [`IdentityMap`] keeps a single entry per identifier
//! and the later task wins, so the earlier task can no longer be toggled.
//! This is a known limitation of the policy; [`IdentityMap::build`] reports
//! every shadowed identifier so the caller can warn about it.

use std::borrow::Borrow;
use std::collections::HashMap;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::digest::sha256_digest;
use crate::error::ChoresError;
use crate::roster::Zone;

/// Number of random bytes behind a [`IdentityPolicy::Random`] identifier.
pub const RANDOM_ID_BYTES: usize = 16;

/// Opaque, externally addressable handle of a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Draw a fresh identifier from the operating system's CSPRNG.
    ///
    /// Fails only if the entropy source is unavailable, which callers must
    /// treat as fatal.
    pub fn random() -> Result<Self, ChoresError> {
        let mut bytes = [0u8; RANDOM_ID_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| ChoresError::Entropy(e.to_string()))?;
        Ok(Self(bytes.iter().map(|b| format!("{b:02x}")).collect()))
    }

    /// Derive the identifier from a task description.
    pub fn from_description(description: &str) -> Self {
        Self(sha256_digest(description.as_bytes()).to_hex())
    }

    /// The identifier as it appears in URLs.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How task identifiers are issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityPolicy {
    /// 16 random bytes per task, hex-encoded. Valid until the process exits.
    #[default]
    Random,
    /// SHA-256 of the task description, hex-encoded.
    Content,
}

impl IdentityPolicy {
    /// Issue the identifier for a task with the given description.
    pub fn issue(&self, description: &str) -> Result<TaskId, ChoresError> {
        match self {
            Self::Random => TaskId::random(),
            Self::Content => Ok(TaskId::from_description(description)),
        }
    }

    /// Whether identifiers issued under this policy survive a restart.
    pub fn is_stable_across_restarts(&self) -> bool {
        matches!(self, Self::Content)
    }

    /// Return the configuration name of this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Content => "content",
        }
    }
}

impl std::fmt::Display for IdentityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a task: zone index, then task index within the zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskRef {
    /// Index into the zone list.
    pub zone: usize,
    /// Index into that zone's task list.
    pub task: usize,
}

/// Identifier → task lookup table.
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    entries: HashMap<TaskId, TaskRef>,
}

impl IdentityMap {
    /// Index every task of every zone by its identifier.
    ///
    /// Returns the map together with the identifiers that were claimed by
    /// more than one task; for those the last task in zone order wins.
    pub fn build(zones: &[Zone]) -> (Self, Vec<TaskId>) {
        let mut entries = HashMap::new();
        let mut shadowed = Vec::new();
        for (zone_idx, zone) in zones.iter().enumerate() {
            for (task_idx, task) in zone.tasks().iter().enumerate() {
                let target = TaskRef {
                    zone: zone_idx,
                    task: task_idx,
                };
                if entries.insert(task.id().clone(), target).is_some() {
                    shadowed.push(task.id().clone());
                }
            }
        }
        (Self { entries }, shadowed)
    }

    /// Look up a task by its external identifier.
    pub fn get(&self, id: &str) -> Option<TaskRef> {
        self.entries.get(id).copied()
    }

    /// Number of addressable tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no task is addressable.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn zone(name: &str, descriptions: &[&str], policy: IdentityPolicy) -> Zone {
        Zone::materialize(
            name,
            vec!["Alice".to_string()],
            descriptions.iter().copied(),
            policy,
        )
        .unwrap()
    }

    #[test]
    fn random_ids_are_32_hex_chars() {
        let id = TaskId::random().unwrap();
        assert_eq!(id.as_str().len(), RANDOM_ID_BYTES * 2);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn random_ids_are_unique() {
        let ids: HashSet<TaskId> = (0..256).map(|_| TaskId::random().unwrap()).collect();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn content_ids_are_stable() {
        assert_eq!(
            TaskId::from_description("Vacuum"),
            TaskId::from_description("Vacuum")
        );
        assert_ne!(
            TaskId::from_description("Vacuum"),
            TaskId::from_description("Mop")
        );
    }

    #[test]
    fn policy_names_and_stability() {
        assert_eq!(IdentityPolicy::default(), IdentityPolicy::Random);
        assert!(!IdentityPolicy::Random.is_stable_across_restarts());
        assert!(IdentityPolicy::Content.is_stable_across_restarts());
        assert_eq!(IdentityPolicy::Content.to_string(), "content");
    }

    #[test]
    fn policy_deserializes_from_config_names() {
        let p: IdentityPolicy = serde_json::from_str("\"content\"").unwrap();
        assert_eq!(p, IdentityPolicy::Content);
        let p: IdentityPolicy = serde_json::from_str("\"random\"").unwrap();
        assert_eq!(p, IdentityPolicy::Random);
    }

    #[test]
    fn map_resolves_every_task() {
        let zones = vec![
            zone("Kitchen", &["Dishes", "Floor"], IdentityPolicy::Random),
            zone("Garden", &["Mow"], IdentityPolicy::Random),
        ];
        let (map, shadowed) = IdentityMap::build(&zones);
        assert!(shadowed.is_empty());
        assert_eq!(map.len(), 3);
        let mow = zones[1].tasks()[0].id();
        assert_eq!(map.get(mow.as_str()), Some(TaskRef { zone: 1, task: 0 }));
        assert_eq!(map.get("not-an-id"), None);
    }

    #[test]
    fn duplicate_descriptions_collapse_under_content_policy() {
        let zones = vec![
            zone("Upstairs", &["Bathroom"], IdentityPolicy::Content),
            zone("Downstairs", &["Bathroom"], IdentityPolicy::Content),
        ];
        let (map, shadowed) = IdentityMap::build(&zones);
        assert_eq!(map.len(), 1);
        assert_eq!(shadowed, vec![TaskId::from_description("Bathroom")]);
        // The later task owns the identifier.
        assert_eq!(
            map.get(TaskId::from_description("Bathroom").as_str()),
            Some(TaskRef { zone: 1, task: 0 })
        );
    }
}
