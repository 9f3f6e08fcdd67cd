//! Snapshot domain model.
//!
//! # Responsibility
//! - Define task/stage records and the snapshot that groups them.
//! - Provide the status cycle used by interaction handlers.
//!
//! # Invariants
//! - Task and stage IDs are opaque strings assigned by the document.
//! - `TaskStatus::next` cycles `not-started -> in-progress -> completed`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Stable identifier of a task element in the document.
pub type TaskId = String;

/// Stable identifier of a stage (section) element in the document.
pub type StageId = String;

/// Completion state of one task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Work has not begun.
    #[default]
    NotStarted,
    /// Work is underway.
    InProgress,
    /// Work is done.
    Completed,
}

impl TaskStatus {
    /// All statuses in cycle order.
    pub const ALL: [TaskStatus; 3] = [Self::NotStarted, Self::InProgress, Self::Completed];

    /// Returns the status that follows `self` in the click cycle.
    pub fn next(self) -> Self {
        match self {
            Self::NotStarted => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed => Self::NotStarted,
        }
    }

    /// Wire name used in the persisted snapshot.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Parses a wire name; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "not-started" => Some(Self::NotStarted),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted state of one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub status: TaskStatus,
    pub notes: String,
}

impl TaskRecord {
    pub fn new(status: TaskStatus, notes: impl Into<String>) -> Self {
        Self {
            status,
            notes: notes.into(),
        }
    }
}

/// Persisted state of one stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub collapsed: bool,
}

/// Complete persistable state: every tracked task and stage.
///
/// Keys are kept ordered so the encoded form is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: BTreeMap<TaskId, TaskRecord>,
    #[serde(default)]
    pub stages: BTreeMap<StageId, StageRecord>,
}

impl Snapshot {
    /// Returns an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::TaskStatus;

    #[test]
    fn status_after_n_cycles_follows_fixed_order() {
        let mut status = TaskStatus::NotStarted;
        for n in 0..30 {
            assert_eq!(status, TaskStatus::ALL[n % 3], "after {n} cycles");
            status = status.next();
        }
    }

    #[test]
    fn wire_names_parse_back() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("done"), None);
        assert_eq!(TaskStatus::parse("Completed"), None);
    }
}
