//! # Roster and Distribution
//!
//! Zones, tasks, and the round-robin distributor that assigns users to tasks
//! for a given rotation index.
//!
//! ## Algorithm
//!
//! Every task is first reset to [`Assignee::Anyone`] and marked incomplete.
//! Then the user at roster position `i` is assigned to the task at position
//! `(offset + i) mod |tasks|`.
//!
//! - More users than tasks: several users land on the same slot and the later
//!   user in roster order wins. Earlier users in that slot get no task.
//! - Fewer users than tasks: slots nobody lands on stay `Anyone`.
//! - Exactly one task: the slot arithmetic degenerates, so the *user* rotates
//!   instead and the task goes to `users[offset mod |users|]`.
//!
//! The whole pass is computed before any task is touched, so a precondition
//! failure leaves the tasks exactly as they were.

use serde::{Serialize, Serializer};

use crate::error::{ChoresError, ConfigError};
use crate::identity::{IdentityPolicy, TaskId};
use crate::index::RotationIndex;

/// Who a task is assigned to this week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Assignee {
    /// No user landed on this task.
    #[default]
    Anyone,
    /// A named user from the zone roster.
    User(String),
}

impl Assignee {
    /// Display text for an unassigned task.
    pub const ANYONE_LABEL: &'static str = "Anyone";

    /// The assigned user's name, if any.
    pub fn user(&self) -> Option<&str> {
        match self {
            Self::Anyone => None,
            Self::User(name) => Some(name),
        }
    }
}

impl std::fmt::Display for Assignee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anyone => f.write_str(Self::ANYONE_LABEL),
            Self::User(name) => f.write_str(name),
        }
    }
}

impl Serialize for Assignee {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A chore: fixed description and identifier, weekly assignee and completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    description: String,
    #[serde(rename = "assigned")]
    assignee: Assignee,
    completed: bool,
}

impl Task {
    /// Create an unassigned, incomplete task.
    pub fn new(id: TaskId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            assignee: Assignee::Anyone,
            completed: false,
        }
    }

    /// External identifier.
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// Display text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// This week's assignee.
    pub fn assignee(&self) -> &Assignee {
        &self.assignee
    }

    /// Whether the task has been marked done this week.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Set the completion flag.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Flip the completion flag, returning the new value.
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}

/// Compute the assignee of every task slot for `offset`.
///
/// Pure: identical inputs always yield identical output. An empty task list
/// yields an empty assignment regardless of the roster.
pub fn assignment(
    offset: RotationIndex,
    users: &[String],
    task_count: usize,
) -> Result<Vec<Assignee>, ConfigError> {
    let mut slots = vec![Assignee::Anyone; task_count];
    if task_count == 0 {
        return Ok(slots);
    }
    if users.is_empty() {
        return Err(ConfigError::EmptyRoster { tasks: task_count });
    }

    if task_count == 1 {
        slots[0] = Assignee::User(users[offset.offset_in(users.len())].clone());
        return Ok(slots);
    }

    let base = offset.offset_in(task_count);
    for (i, user) in users.iter().enumerate() {
        // Later users overwrite earlier ones on the same slot.
        slots[(base + i % task_count) % task_count] = Assignee::User(user.clone());
    }
    Ok(slots)
}

/// Reassign `tasks` for `offset` and clear every completion flag.
pub fn distribute(
    offset: RotationIndex,
    users: &[String],
    tasks: &mut [Task],
) -> Result<(), ConfigError> {
    let slots = assignment(offset, users, tasks.len())?;
    for (task, assignee) in tasks.iter_mut().zip(slots) {
        task.assignee = assignee;
        task.completed = false;
    }
    Ok(())
}

/// An independent rotation domain: its own roster and task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zone {
    name: String,
    users: Vec<String>,
    tasks: Vec<Task>,
}

impl Zone {
    /// Build a zone from already-identified tasks.
    ///
    /// Rejects an empty name and a non-empty task list without users.
    pub fn new(
        name: impl Into<String>,
        users: Vec<String>,
        tasks: Vec<Task>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyZoneName);
        }
        if users.is_empty() && !tasks.is_empty() {
            return Err(ConfigError::ZoneWithoutUsers {
                zone: name,
                tasks: tasks.len(),
            });
        }
        Ok(Self { name, users, tasks })
    }

    /// Build a zone from task descriptions, issuing identifiers with `policy`.
    pub fn materialize<D: Into<String>>(
        name: impl Into<String>,
        users: Vec<String>,
        descriptions: impl IntoIterator<Item = D>,
        policy: IdentityPolicy,
    ) -> Result<Self, ChoresError> {
        let tasks = descriptions
            .into_iter()
            .map(|d| {
                let description = d.into();
                policy
                    .issue(&description)
                    .map(|id| Task::new(id, description))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(name, users, tasks)?)
    }

    /// Zone name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Roster in rotation order.
    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Tasks in configuration order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Mutable access to a single task.
    pub fn task_mut(&mut self, index: usize) -> Option<&mut Task> {
        self.tasks.get_mut(index)
    }

    /// Run the distributor over this zone's tasks.
    pub fn redistribute(&mut self, offset: RotationIndex) -> Result<(), ConfigError> {
        distribute(offset, &self.users, &mut self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn users(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn labels(slots: &[Assignee]) -> Vec<String> {
        slots.iter().map(|a| a.to_string()).collect()
    }

    fn tasks(descriptions: &[&str]) -> Vec<Task> {
        descriptions
            .iter()
            .map(|d| Task::new(TaskId::from_description(d), *d))
            .collect()
    }

    #[test]
    fn round_robin_with_more_tasks_than_users() {
        let roster = users(&["A", "B", "C"]);
        let at0 = assignment(RotationIndex::new(0), &roster, 4).unwrap();
        assert_eq!(labels(&at0), ["A", "B", "C", "Anyone"]);
        let at1 = assignment(RotationIndex::new(1), &roster, 4).unwrap();
        assert_eq!(labels(&at1), ["Anyone", "A", "B", "C"]);
    }

    #[test]
    fn offset_wraps_around_task_count() {
        let roster = users(&["A", "B", "C"]);
        let at5 = assignment(RotationIndex::new(5), &roster, 4).unwrap();
        assert_eq!(labels(&at5), ["Anyone", "A", "B", "C"]);
        let at3 = assignment(RotationIndex::new(3), &roster, 4).unwrap();
        assert_eq!(labels(&at3), ["B", "C", "Anyone", "A"]);
    }

    #[test]
    fn single_task_rotates_the_user() {
        let roster = users(&["A", "B"]);
        for (offset, expected) in [(0, "A"), (1, "B"), (2, "A")] {
            let slots = assignment(RotationIndex::new(offset), &roster, 1).unwrap();
            assert_eq!(labels(&slots), [expected], "offset {offset}");
        }
    }

    #[test]
    fn more_users_than_tasks_is_last_write_wins() {
        let roster = users(&["A", "B", "C"]);
        // A→0, B→1, C→0 overwrites A.
        let slots = assignment(RotationIndex::new(0), &roster, 2).unwrap();
        assert_eq!(labels(&slots), ["C", "B"]);
        // A→1, B→0, C→1 overwrites A.
        let slots = assignment(RotationIndex::new(1), &roster, 2).unwrap();
        assert_eq!(labels(&slots), ["B", "C"]);
    }

    #[test]
    fn empty_task_list_is_a_no_op() {
        assert!(assignment(RotationIndex::new(3), &[], 0).unwrap().is_empty());
        let mut none: Vec<Task> = Vec::new();
        distribute(RotationIndex::new(3), &users(&["A"]), &mut none).unwrap();
    }

    #[test]
    fn empty_roster_with_tasks_is_rejected() {
        assert_eq!(
            assignment(RotationIndex::new(0), &[], 2).unwrap_err(),
            ConfigError::EmptyRoster { tasks: 2 }
        );
    }

    #[test]
    fn distribute_resets_completion_and_assigns() {
        let mut list = tasks(&["Dishes", "Floor", "Bins"]);
        list[1].set_completed(true);
        list[2].set_completed(true);
        distribute(RotationIndex::new(1), &users(&["A", "B"]), &mut list).unwrap();

        assert!(list.iter().all(|t| !t.is_completed()));
        assert_eq!(list[0].assignee(), &Assignee::Anyone);
        assert_eq!(list[1].assignee().user(), Some("A"));
        assert_eq!(list[2].assignee().user(), Some("B"));
    }

    #[test]
    fn failed_distribution_leaves_tasks_untouched() {
        let mut list = tasks(&["Dishes"]);
        list[0].set_completed(true);
        let before = list.clone();
        assert!(distribute(RotationIndex::new(0), &[], &mut list).is_err());
        assert_eq!(list, before);
    }

    #[test]
    fn assignee_serializes_as_display_text() {
        let json = serde_json::to_string(&Assignee::Anyone).unwrap();
        assert_eq!(json, "\"Anyone\"");
        let json = serde_json::to_string(&Assignee::User("Bo".into())).unwrap();
        assert_eq!(json, "\"Bo\"");
    }

    #[test]
    fn task_toggle_flips_and_returns_new_state() {
        let mut task = Task::new(TaskId::from_description("x"), "x");
        assert!(task.toggle());
        assert!(!task.toggle());
    }

    #[test]
    fn zone_requires_users_when_it_has_tasks() {
        let err = Zone::new("Garage", vec![], tasks(&["Sweep"])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ZoneWithoutUsers {
                zone: "Garage".to_string(),
                tasks: 1
            }
        );
        assert!(Zone::new("Empty", vec![], vec![]).is_ok());
    }

    #[test]
    fn zone_requires_a_name() {
        assert_eq!(
            Zone::new("  ", users(&["A"]), vec![]).unwrap_err(),
            ConfigError::EmptyZoneName
        );
    }

    #[test]
    fn zone_materialize_issues_one_id_per_task() {
        let zone = Zone::materialize(
            "Kitchen",
            users(&["A"]),
            ["Dishes", "Floor"],
            IdentityPolicy::Content,
        )
        .unwrap();
        assert_eq!(zone.tasks().len(), 2);
        assert_eq!(zone.tasks()[0].id(), &TaskId::from_description("Dishes"));
        assert_eq!(zone.tasks()[1].description(), "Floor");
    }

    proptest! {
        #[test]
        fn assignment_is_deterministic(
            offset in any::<u64>(),
            roster in proptest::collection::vec("[a-z]{1,6}", 1..8),
            count in 0usize..10,
        ) {
            let idx = RotationIndex::new(offset);
            prop_assert_eq!(
                assignment(idx, &roster, count).unwrap(),
                assignment(idx, &roster, count).unwrap()
            );
        }

        #[test]
        fn advancing_rotates_by_exactly_one_slot(
            offset in 0u64..1_000_000,
            roster in proptest::collection::vec("[a-z]{1,6}", 1..8),
            count in 2usize..10,
        ) {
            let now = assignment(RotationIndex::new(offset), &roster, count).unwrap();
            let next = assignment(RotationIndex::new(offset + 1), &roster, count).unwrap();
            for j in 0..count {
                prop_assert_eq!(&next[(j + 1) % count], &now[j]);
            }
        }

        #[test]
        fn every_slot_is_filled_when_roster_covers_tasks(
            offset in any::<u64>(),
            count in 1usize..8,
            extra in 0usize..5,
        ) {
            let roster: Vec<String> = (0..count + extra).map(|i| format!("u{i}")).collect();
            let slots = assignment(RotationIndex::new(offset), &roster, count).unwrap();
            prop_assert!(slots.iter().all(|a| *a != Assignee::Anyone));
        }

        #[test]
        fn each_user_gets_at_most_one_task_when_tasks_cover_roster(
            offset in any::<u64>(),
            roster_len in 1usize..6,
            extra in 1usize..5,
        ) {
            let roster: Vec<String> = (0..roster_len).map(|i| format!("u{i}")).collect();
            let count = roster_len + extra;
            let slots = assignment(RotationIndex::new(offset), &roster, count).unwrap();
            for user in &roster {
                let hits = slots.iter().filter(|a| a.user() == Some(user.as_str())).count();
                prop_assert_eq!(hits, 1);
            }
        }
    }
}
