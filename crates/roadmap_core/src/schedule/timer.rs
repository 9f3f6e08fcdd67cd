//! One-shot deferred actions keyed by deadline.

use std::time::{Duration, Instant};

/// Queue of payloads released once their deadline passes.
///
/// Payloads with equal deadlines are released in scheduling order.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: Vec<(Instant, T)>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) {
        let deadline = now + delay;
        let index = self
            .entries
            .partition_point(|(existing, _)| *existing <= deadline);
        self.entries.insert(index, (deadline, payload));
    }

    /// Removes and returns every payload whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Vec<T> {
        let due = self
            .entries
            .partition_point(|(deadline, _)| *deadline <= now);
        self.entries
            .drain(..due)
            .map(|(_, payload)| payload)
            .collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.first().map(|(deadline, _)| *deadline)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::TimerQueue;
    use std::time::{Duration, Instant};

    #[test]
    fn releases_due_payloads_in_deadline_order() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule(start, Duration::from_millis(300), "late");
        timers.schedule(start, Duration::from_millis(150), "early");
        timers.schedule(start, Duration::from_millis(150), "early-second");

        assert!(timers.pop_due(start + Duration::from_millis(100)).is_empty());
        assert_eq!(
            timers.pop_due(start + Duration::from_millis(150)),
            vec!["early", "early-second"]
        );
        assert_eq!(timers.next_deadline(), Some(start + Duration::from_millis(300)));
        assert_eq!(timers.pop_due(start + Duration::from_secs(1)), vec!["late"]);
        assert!(timers.is_empty());
    }
}
