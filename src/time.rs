//! Frame accounting for the backdrop loop.
//!
//! `web_time::Instant` is `std::time::Instant` on native targets and
//! `performance.now()` in the browser, so the same clock works in both.

use std::time::Duration;
use web_time::Instant;

/// How long an FPS sample runs before the figure is refreshed.
pub const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Frames counted since a window opened.
#[derive(Debug, Clone, Copy)]
struct FpsWindow {
    opened: Instant,
    frames: u32,
}

impl FpsWindow {
    fn open(at: Instant) -> Self {
        Self { opened: at, frames: 0 }
    }

    /// Count one frame. Returns the rate once the window has run its length.
    fn record(&mut self, at: Instant) -> Option<f32> {
        self.frames += 1;
        let span = at.duration_since(self.opened);
        if span < FPS_WINDOW {
            return None;
        }
        let rate = self.frames as f32 / span.as_secs_f32();
        *self = Self::open(at);
        Some(rate)
    }
}

/// Drawn-frame counter with a pause flag and a periodically refreshed rate.
///
/// Paused time is excluded: [`FrameClock::resume`] opens a fresh FPS window
/// so a hidden page does not drag the figure towards zero.
#[derive(Debug)]
pub struct FrameClock {
    frames: u64,
    fps: f32,
    window: FpsWindow,
    paused: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frames: 0,
            fps: 0.0,
            window: FpsWindow::open(Instant::now()),
            paused: false,
        }
    }

    /// Count a drawn frame. A no-op while paused.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        self.frames += 1;
        if let Some(rate) = self.window.record(Instant::now()) {
            self.fps = rate;
        }
    }

    pub fn frame(&self) -> u64 {
        self.frames
    }

    /// Frames per second over the last complete window; 0 before the first.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if std::mem::replace(&mut self.paused, false) {
            self.window = FpsWindow::open(Instant::now());
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
