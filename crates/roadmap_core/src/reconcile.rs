//! Snapshot reconciliation against the observable document.
//!
//! # Responsibility
//! - Own the process-wide tracked snapshot and expose narrow accessors.
//! - Build defaults from the document, restore persisted state, push state
//!   onto the document, and re-derive state from the document before saves.
//!
//! # Invariants
//! - After `apply`, every snapshot key names an element present in the
//!   document. `apply` is the only place entries are purged.
//! - `initialize_default` never overwrites an existing entry.
//! - `capture_for_save` adds or overwrites entries but never removes them.

use crate::document::{Document, NotesPanel, StagePresentation, StatusIndicator};
use crate::model::codec::{decode_snapshot, StoredSnapshot};
use crate::model::snapshot::{Snapshot, StageRecord, TaskRecord, TaskStatus};
use crate::store::kv::KeyValueStore;
use crate::store::snapshot_store::SnapshotStore;
use log::{debug, error, info, warn};

/// How `Reconciler::load` established the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Slot was empty; defaults were derived from the document.
    Defaulted,
    /// Stored snapshot decoded and replaced in-memory state.
    Restored,
    /// Stored value was unreadable; it was cleared and defaults derived.
    RecoveredFromCorrupt,
}

/// Entries removed by `apply` because the document no longer has them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriftReport {
    pub purged_tasks: Vec<String>,
    pub purged_stages: Vec<String>,
}

impl DriftReport {
    pub fn is_clean(&self) -> bool {
        self.purged_tasks.is_empty() && self.purged_stages.is_empty()
    }
}

/// Owner of the tracked snapshot.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    snapshot: Snapshot,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing snapshot, e.g. after an out-of-band import.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Inserts a default record for every document element not yet tracked.
    ///
    /// Returns the number of inserted entries.
    pub fn initialize_default<D: Document + ?Sized>(&mut self, document: &D) -> usize {
        let mut inserted = 0;
        for task_id in document.task_ids() {
            if self.snapshot.tasks.contains_key(&task_id) {
                continue;
            }
            let notes = document.notes_text(&task_id).unwrap_or_default();
            self.snapshot
                .tasks
                .insert(task_id, TaskRecord::new(TaskStatus::NotStarted, notes));
            inserted += 1;
        }
        for stage_id in document.stage_ids() {
            if self.snapshot.stages.contains_key(&stage_id) {
                continue;
            }
            self.snapshot.stages.insert(stage_id, StageRecord::default());
            inserted += 1;
        }

        debug!(
            "event=snapshot_default_init module=reconcile status=ok inserted={} tasks={} stages={}",
            inserted,
            self.snapshot.tasks.len(),
            self.snapshot.stages.len()
        );
        inserted
    }

    /// Establishes the snapshot from the persisted slot, or from defaults.
    ///
    /// Task fields absent from a stored entry take what the document shows,
    /// so `apply` leaves those elements as they are. A corrupt stored value
    /// is removed so later loads do not trip on it.
    pub fn load<D, S>(&mut self, document: &D, store: &mut SnapshotStore<S>) -> LoadOutcome
    where
        D: Document + ?Sized,
        S: KeyValueStore,
    {
        let Some(raw) = store.load_raw() else {
            info!("event=snapshot_load module=reconcile status=absent");
            self.snapshot = Snapshot::new();
            self.initialize_default(document);
            return LoadOutcome::Defaulted;
        };

        match decode_snapshot(&raw) {
            Ok(stored) => {
                info!(
                    "event=snapshot_load module=reconcile status=ok tasks={} stages={}",
                    stored.tasks.len(),
                    stored.stages.len()
                );
                self.snapshot = resolve_stored(stored, document);
                LoadOutcome::Restored
            }
            Err(err) => {
                error!(
                    "event=snapshot_load module=reconcile status=error error_code=parse_failed bytes={} error={}",
                    raw.len(),
                    err
                );
                self.snapshot = Snapshot::new();
                self.initialize_default(document);
                store.clear();
                LoadOutcome::RecoveredFromCorrupt
            }
        }
    }

    /// Pushes tracked state onto the document and purges entries whose
    /// element is gone.
    ///
    /// Every present task's notes area is reset to hidden. Expanded stages
    /// receive `expanded_max_height_px`.
    pub fn apply<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        expanded_max_height_px: u32,
    ) -> DriftReport {
        let mut report = DriftReport::default();

        self.snapshot.tasks.retain(|task_id, record| {
            if !document.has_task(task_id) {
                warn!(
                    "event=drift_cleanup module=reconcile status=purged kind=task id={task_id}"
                );
                report.purged_tasks.push(task_id.clone());
                return false;
            }
            document.render_status(task_id, StatusIndicator::for_status(record.status));
            document.set_notes_text(task_id, &record.notes);
            document.set_notes_panel(task_id, NotesPanel::Hidden);
            true
        });

        self.snapshot.stages.retain(|stage_id, record| {
            if !document.has_stage(stage_id) {
                warn!(
                    "event=drift_cleanup module=reconcile status=purged kind=stage id={stage_id}"
                );
                report.purged_stages.push(stage_id.clone());
                return false;
            }
            let presentation = if record.collapsed {
                StagePresentation::collapsed()
            } else {
                StagePresentation::expanded(expanded_max_height_px)
            };
            document.render_stage(stage_id, presentation);
            true
        });

        report
    }

    /// Re-derives every record from the live document and returns the result.
    ///
    /// Tasks without an indicator are recorded as not started; tasks without
    /// a notes input keep their tracked notes.
    pub fn capture_for_save<D: Document + ?Sized>(&mut self, document: &D) -> &Snapshot {
        for task_id in document.task_ids() {
            let status = document.task_status(&task_id).unwrap_or_default();
            let notes = document.notes_text(&task_id);
            let record = self.snapshot.tasks.entry(task_id).or_default();
            record.status = status;
            if let Some(notes) = notes {
                record.notes = notes;
            }
        }
        for stage_id in document.stage_ids() {
            let collapsed = document.stage_collapsed(&stage_id).unwrap_or(false);
            self.snapshot.stages.entry(stage_id).or_default().collapsed = collapsed;
        }
        &self.snapshot
    }

    /// Records a new status; creates the entry when it was missing.
    ///
    /// Returns `false` when the entry had to be created.
    pub fn set_task_status(&mut self, task_id: &str, status: TaskStatus) -> bool {
        if let Some(record) = self.snapshot.tasks.get_mut(task_id) {
            record.status = status;
            return true;
        }
        self.snapshot
            .tasks
            .insert(task_id.to_string(), TaskRecord::new(status, ""));
        false
    }

    /// Records new notes text for a tracked task.
    ///
    /// Returns `false` and changes nothing when the task is untracked.
    pub fn set_task_notes(&mut self, task_id: &str, notes: &str) -> bool {
        match self.snapshot.tasks.get_mut(task_id) {
            Some(record) => {
                notes.clone_into(&mut record.notes);
                true
            }
            None => false,
        }
    }

    /// Records a stage's collapsed flag; creates the entry when it was missing.
    ///
    /// Returns `false` when the entry had to be created.
    pub fn set_stage_collapsed(&mut self, stage_id: &str, collapsed: bool) -> bool {
        if let Some(record) = self.snapshot.stages.get_mut(stage_id) {
            record.collapsed = collapsed;
            return true;
        }
        self.snapshot
            .stages
            .insert(stage_id.to_string(), StageRecord { collapsed });
        false
    }
}

fn resolve_stored<D: Document + ?Sized>(stored: StoredSnapshot, document: &D) -> Snapshot {
    let tasks = stored
        .tasks
        .into_iter()
        .map(|(task_id, patch)| {
            let record =
                patch.into_record(document.task_status(&task_id), document.notes_text(&task_id));
            (task_id, record)
        })
        .collect();
    Snapshot {
        tasks,
        stages: stored.stages,
    }
}

#[cfg(test)]
mod tests {
    use super::Reconciler;
    use crate::document::{Document, DocumentLayout, MemoryDocument, StageLayout, TaskLayout};
    use crate::model::snapshot::{TaskRecord, TaskStatus};

    fn doc() -> MemoryDocument {
        MemoryDocument::from_layout(&DocumentLayout {
            stages: vec![StageLayout::new(
                "s1",
                vec![
                    TaskLayout::new("a").with_notes("seed text"),
                    TaskLayout::new("b"),
                ],
            )],
        })
    }

    #[test]
    fn initialize_default_uses_inline_notes_and_is_idempotent() {
        let doc = doc();
        let mut reconciler = Reconciler::new();

        assert_eq!(reconciler.initialize_default(&doc), 3);
        let once = reconciler.snapshot().clone();
        assert_eq!(reconciler.initialize_default(&doc), 0);

        assert_eq!(reconciler.snapshot(), &once);
        assert_eq!(once.tasks["a"], TaskRecord::new(TaskStatus::NotStarted, "seed text"));
        assert!(!once.stages["s1"].collapsed);
    }

    #[test]
    fn initialize_default_keeps_existing_entries() {
        let doc = doc();
        let mut reconciler = Reconciler::new();
        reconciler.set_task_status("a", TaskStatus::Completed);

        reconciler.initialize_default(&doc);
        assert_eq!(reconciler.snapshot().tasks["a"].status, TaskStatus::Completed);
        assert_eq!(reconciler.snapshot().tasks["b"].status, TaskStatus::NotStarted);
    }

    #[test]
    fn capture_for_save_prefers_live_document_state() {
        let mut doc = doc();
        let mut reconciler = Reconciler::new();
        reconciler.initialize_default(&doc);

        doc.render_status(
            "b",
            crate::document::StatusIndicator::for_status(TaskStatus::InProgress),
        );
        doc.set_notes_text("b", "typed but never recorded");

        let captured = reconciler.capture_for_save(&doc);
        assert_eq!(captured.tasks["b"].status, TaskStatus::InProgress);
        assert_eq!(captured.tasks["b"].notes, "typed but never recorded");
    }

    #[test]
    fn set_task_notes_ignores_untracked_tasks() {
        let mut reconciler = Reconciler::new();
        assert!(!reconciler.set_task_notes("ghost", "text"));
        assert!(reconciler.snapshot().tasks.is_empty());
    }
}
