//! Time-driven primitives for the single-threaded tracker loop.
//!
//! # Responsibility
//! - Coalesce bursts of save requests into one trailing write.
//! - Hold one-shot deferred actions until their deadline.
//!
//! # Invariants
//! - Nothing here reads the clock: callers pass `now`, so the embedding
//!   event loop owns time and tests stay deterministic.

pub mod debounce;
pub mod timer;
