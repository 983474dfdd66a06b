//! Time-ordered queue of deferred steps.

use std::time::Duration;

/// Steps keyed by the page-clock time they become due.
///
/// Steps due at the same instant come out in the order they were
/// scheduled.
#[derive(Debug)]
pub struct Timeline<T> {
    entries: Vec<(Duration, u64, T)>,
    next_seq: u64,
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, at: Duration, step: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let index = self
            .entries
            .partition_point(|(due, s, _)| (*due, *s) <= (at, seq));
        self.entries.insert(index, (at, seq, step));
    }

    /// Remove and return every step due at or before `now`.
    pub fn due(&mut self, now: Duration) -> Vec<T> {
        let count = self.entries.partition_point(|(due, _, _)| *due <= now);
        self.entries.drain(..count).map(|(_, _, step)| step).collect()
    }

    /// Remove and return every step regardless of time.
    pub fn drain_all(&mut self) -> Vec<T> {
        self.entries.drain(..).map(|(_, _, step)| step).collect()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.first().map(|(due, _, _)| *due)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}
