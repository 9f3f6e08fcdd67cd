//! JSON codec for the persisted snapshot.
//!
//! # Responsibility
//! - Encode a snapshot to the single JSON document stored under the slot key.
//! - Decode stored text best-effort, separating "not JSON" from "odd shape".
//!
//! # Invariants
//! - Invalid JSON and non-object roots are decode errors.
//! - Structurally parseable values never fail: extra fields are ignored and
//!   unusable task fields decode as absent, so the caller decides what
//!   fills them.

use crate::model::snapshot::{Snapshot, StageId, StageRecord, TaskId, TaskRecord, TaskStatus};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure to turn stored text into a snapshot.
#[derive(Debug)]
pub enum SnapshotDecodeError {
    /// Stored text is not JSON at all.
    InvalidJson(serde_json::Error),
    /// Stored text is JSON but not an object.
    NotAnObject(&'static str),
}

impl Display for SnapshotDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(err) => write!(f, "stored snapshot is not valid JSON: {err}"),
            Self::NotAnObject(kind) => {
                write!(f, "stored snapshot root must be an object, found {kind}")
            }
        }
    }
}

impl Error for SnapshotDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidJson(err) => Some(err),
            Self::NotAnObject(_) => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotDecodeError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidJson(value)
    }
}

/// Stored task entry; `None` marks a field missing or unusable in storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub status: Option<TaskStatus>,
    pub notes: Option<String>,
}

impl TaskPatch {
    /// Builds a record, taking absent fields from `current_*` and then from
    /// the record defaults.
    pub fn into_record(
        self,
        current_status: Option<TaskStatus>,
        current_notes: Option<String>,
    ) -> TaskRecord {
        TaskRecord::new(
            self.status.or(current_status).unwrap_or_default(),
            self.notes.or(current_notes).unwrap_or_default(),
        )
    }
}

/// Decoded slot contents before absent task fields are resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSnapshot {
    pub tasks: BTreeMap<TaskId, TaskPatch>,
    pub stages: BTreeMap<StageId, StageRecord>,
}

impl StoredSnapshot {
    /// Resolves every absent field to the record default.
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            tasks: self
                .tasks
                .into_iter()
                .map(|(task_id, patch)| (task_id, patch.into_record(None, None)))
                .collect(),
            stages: self.stages,
        }
    }
}

/// Encodes a snapshot into its persisted JSON text.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(snapshot)
}

/// Decodes persisted JSON text.
///
/// # Errors
/// - `InvalidJson` when `raw` does not parse.
/// - `NotAnObject` when the root value is not a JSON object.
pub fn decode_snapshot(raw: &str) -> Result<StoredSnapshot, SnapshotDecodeError> {
    let root: Value = serde_json::from_str(raw)?;
    let Value::Object(root) = root else {
        return Err(SnapshotDecodeError::NotAnObject(value_kind(&root)));
    };

    let mut snapshot = StoredSnapshot::default();
    for (task_id, entry) in object_entries(&root, "tasks") {
        snapshot.tasks.insert(task_id.clone(), decode_task(entry));
    }
    for (stage_id, entry) in object_entries(&root, "stages") {
        snapshot.stages.insert(stage_id.clone(), decode_stage(entry));
    }
    Ok(snapshot)
}

fn object_entries<'a>(
    root: &'a Map<String, Value>,
    field: &str,
) -> impl Iterator<Item = (&'a String, &'a Value)> {
    root.get(field)
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|map| map.iter())
}

fn decode_task(entry: &Value) -> TaskPatch {
    TaskPatch {
        status: entry
            .get("status")
            .and_then(Value::as_str)
            .and_then(TaskStatus::parse),
        notes: entry
            .get("notes")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

fn decode_stage(entry: &Value) -> StageRecord {
    StageRecord {
        collapsed: entry
            .get("collapsed")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_snapshot, encode_snapshot, SnapshotDecodeError, TaskPatch};
    use crate::model::snapshot::{Snapshot, StageRecord, TaskRecord, TaskStatus};

    #[test]
    fn encode_uses_kebab_case_statuses_and_fixed_shape() {
        let mut snapshot = Snapshot::new();
        snapshot.tasks.insert(
            "t1".into(),
            TaskRecord::new(TaskStatus::InProgress, "draft map"),
        );
        snapshot
            .stages
            .insert("stage-1".into(), StageRecord { collapsed: true });

        let encoded = encode_snapshot(&snapshot).unwrap();
        assert_eq!(
            encoded,
            r#"{"tasks":{"t1":{"status":"in-progress","notes":"draft map"}},"stages":{"stage-1":{"collapsed":true}}}"#
        );
        assert_eq!(decode_snapshot(&encoded).unwrap().into_snapshot(), snapshot);
    }

    #[test]
    fn decode_marks_missing_fields_absent_and_ignores_extras() {
        let decoded = decode_snapshot(
            r#"{
                "version": 7,
                "tasks": {
                    "a": {"status": "completed"},
                    "b": {"notes": "only notes", "color": "red"},
                    "c": {"status": "done", "notes": 12},
                    "d": 5
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            decoded.tasks["a"],
            TaskPatch {
                status: Some(TaskStatus::Completed),
                notes: None,
            }
        );
        assert_eq!(decoded.tasks["b"].status, None);
        assert_eq!(decoded.tasks["b"].notes.as_deref(), Some("only notes"));
        assert_eq!(decoded.tasks["c"], TaskPatch::default());
        assert_eq!(decoded.tasks["d"], TaskPatch::default());
        assert!(decoded.stages.is_empty());

        let resolved = decoded.into_snapshot();
        assert_eq!(resolved.tasks["a"], TaskRecord::new(TaskStatus::Completed, ""));
        assert_eq!(resolved.tasks["d"], TaskRecord::default());
    }

    #[test]
    fn decode_rejects_non_json_and_non_object_roots() {
        assert!(matches!(
            decode_snapshot("{not json"),
            Err(SnapshotDecodeError::InvalidJson(_))
        ));
        assert!(matches!(
            decode_snapshot("[1, 2]"),
            Err(SnapshotDecodeError::NotAnObject("array"))
        ));
        assert!(matches!(
            decode_snapshot("null"),
            Err(SnapshotDecodeError::NotAnObject("null"))
        ));
    }
}
