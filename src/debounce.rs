//! Trailing-edge debounce on top of host timeouts.

use crate::host::{Host, TimerHandle};
use std::time::Duration;

/// Collapses a burst of events into one action after a quiet window.
///
/// Each [`Debouncer::trigger`] disarms the pending timeout and arms a new
/// one, so at most one timeout is ever pending. Only the handle of that
/// last timeout is accepted by [`Debouncer::fire`].
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<TimerHandle>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    /// Restart the quiet window.
    pub fn trigger<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(old) = self.pending.take() {
            host.clear_timeout(old);
        }
        self.pending = Some(host.set_timeout(self.delay));
    }

    /// Returns `true` if `handle` is the pending timeout, consuming it.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(old) = self.pending.take() {
            host.clear_timeout(old);
        }
    }
}
