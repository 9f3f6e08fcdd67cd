//! Tracker use-case services.
//!
//! # Responsibility
//! - Turn user interactions into document updates, snapshot updates,
//!   debounced saves and progress refreshes.
//! - Keep embedding shells decoupled from reconciliation and storage.

pub mod events;
pub mod tracker;
