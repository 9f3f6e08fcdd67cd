//! Core logic for the roadmap progress tracker.
//! Keeps tracked task/stage state, the visible document and the persisted
//! snapshot consistent with each other.

pub mod config;
pub mod db;
pub mod document;
pub mod logging;
pub mod model;
pub mod progress;
pub mod reconcile;
pub mod schedule;
pub mod service;
pub mod store;

pub use config::{TrackerConfig, DEFAULT_STORAGE_KEY};
pub use document::{
    Document, DocumentLayout, MemoryDocument, NotesPanel, StageLayout, StagePresentation,
    StatusIndicator, TaskLayout,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::codec::{
    decode_snapshot, encode_snapshot, SnapshotDecodeError, StoredSnapshot, TaskPatch,
};
pub use model::snapshot::{Snapshot, StageId, StageRecord, TaskId, TaskRecord, TaskStatus};
pub use reconcile::{DriftReport, LoadOutcome, Reconciler};
pub use schedule::debounce::Debouncer;
pub use service::events::{ClickTarget, UiEvent};
pub use service::tracker::{StartReport, Tracker};
pub use store::kv::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};
pub use store::snapshot_store::SnapshotStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
