//! Tracked-state model for roadmap progress.
//!
//! # Responsibility
//! - Define the canonical records kept for every task and stage.
//! - Define the persisted snapshot shape and its JSON codec.
//!
//! # Invariants
//! - Task status is always one of exactly three values.
//! - A snapshot holds only strings and booleans, so it always serializes.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod codec;
pub mod snapshot;
