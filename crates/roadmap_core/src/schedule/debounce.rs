//! Cancel-and-reschedule debouncer.

use std::time::{Duration, Instant};

/// Trailing-edge debouncer.
///
/// Every `request` replaces the pending deadline with `now + window`; the
/// action is due only once a full quiet window has elapsed after the last
/// request.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Cancels any pending deadline and schedules a new one.
    pub fn request(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once when the pending deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drops the pending deadline; returns whether one existed.
    pub fn take_pending(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
