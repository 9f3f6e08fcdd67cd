//! Durable key-value storage for the persisted snapshot.
//!
//! # Responsibility
//! - Define the key-value contract the snapshot store writes through.
//! - Provide SQLite-backed and in-memory implementations.
//! - Wrap one well-known key with non-raising save/load/clear semantics.
//!
//! # Invariants
//! - Only `SnapshotStore` touches the snapshot slot.
//! - Snapshot writes never surface errors to callers.

pub mod kv;
pub mod snapshot_store;
