//! Snapshot slot persistence.
//!
//! # Responsibility
//! - Serialize whole snapshots into one well-known key.
//! - Return the raw stored text for the reconciler to decode.
//! - Remove the slot after a corrupt value was detected.
//!
//! # Invariants
//! - `save` never returns an error: failures are logged and dropped.
//! - A failed write does not retry and does not touch in-memory state.

use crate::model::codec::encode_snapshot;
use crate::model::snapshot::Snapshot;
use crate::store::kv::KeyValueStore;
use log::{debug, error, info, warn};
use std::time::Instant;

/// Owner of the single persisted snapshot slot.
pub struct SnapshotStore<S: KeyValueStore> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Writes `snapshot` to the slot.
    ///
    /// Returns `true` when the value reached the backend.
    pub fn save(&mut self, snapshot: &Snapshot) -> bool {
        let started_at = Instant::now();
        debug!(
            "event=snapshot_save module=store status=start tasks={} stages={}",
            snapshot.tasks.len(),
            snapshot.stages.len()
        );

        let encoded = match encode_snapshot(snapshot) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(
                    "event=snapshot_save module=store status=error error_code=encode_failed error={err}"
                );
                return false;
            }
        };

        match self.backend.set(&self.key, &encoded) {
            Ok(()) => {
                info!(
                    "event=snapshot_save module=store status=ok bytes={} duration_ms={}",
                    encoded.len(),
                    started_at.elapsed().as_millis()
                );
                true
            }
            Err(err) => {
                error!(
                    "event=snapshot_save module=store status=error error_code=write_failed error={err}"
                );
                false
            }
        }
    }

    /// Returns the stored text, or `None` when the slot is empty.
    ///
    /// A backend read failure is logged and reported as an empty slot.
    pub fn load_raw(&self) -> Option<String> {
        match self.backend.get(&self.key) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=snapshot_read module=store status=error error_code=read_failed error={err}"
                );
                None
            }
        }
    }

    /// Removes the slot.
    pub fn clear(&mut self) {
        match self.backend.remove(&self.key) {
            Ok(()) => info!("event=snapshot_clear module=store status=ok"),
            Err(err) => warn!(
                "event=snapshot_clear module=store status=error error_code=remove_failed error={err}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SnapshotStore;
    use crate::model::snapshot::{Snapshot, TaskRecord, TaskStatus};
    use crate::store::kv::{KeyValueStore, MemoryKeyValueStore};

    fn sample() -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot
            .tasks
            .insert("t1".into(), TaskRecord::new(TaskStatus::Completed, "done"));
        snapshot
    }

    #[test]
    fn save_writes_under_the_configured_key() {
        let mut store = SnapshotStore::new(MemoryKeyValueStore::new(), "slot");
        assert!(store.save(&sample()));

        let raw = store.backend().get("slot").unwrap().unwrap();
        assert!(raw.contains("\"completed\""));
        assert_eq!(store.load_raw(), Some(raw));
    }

    #[test]
    fn save_reports_failure_without_panicking() {
        let mut store = SnapshotStore::new(MemoryKeyValueStore::with_quota(8), "slot");
        assert!(!store.save(&sample()));
        assert_eq!(store.load_raw(), None);
    }

    #[test]
    fn clear_removes_slot() {
        let mut store = SnapshotStore::new(MemoryKeyValueStore::new(), "slot");
        store.save(&sample());
        store.clear();
        assert_eq!(store.load_raw(), None);
    }
}
