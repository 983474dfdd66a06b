//! Host environment capabilities.
//!
//! The animator never talks to a browser or a window directly. It asks a
//! [`Host`] for the viewport and for scheduled callbacks, and the host
//! binding calls back into the animator when a frame or timer fires.

use std::time::Duration;

/// Largest device pixel ratio honoured when sizing the backing store.
pub const MAX_PIXEL_SCALE: f64 = 2.0;

/// Viewport size in CSS pixels plus the display's device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Backing-store scale: the device pixel ratio capped at
    /// [`MAX_PIXEL_SCALE`]. Missing or nonsensical ratios count as 1.
    pub fn pixel_scale(&self) -> f64 {
        let dpr = self.device_pixel_ratio;
        if dpr.is_finite() && dpr > 0.0 {
            dpr.min(MAX_PIXEL_SCALE)
        } else {
            1.0
        }
    }
}

/// Identifies one requested display frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u32);

/// Identifies one armed timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u32);

/// Scheduling and environment queries provided by the hosting page or window.
pub trait Host {
    fn viewport(&self) -> Viewport;

    /// The OS-level "reduce motion" accessibility preference.
    fn prefers_reduced_motion(&self) -> bool;

    /// Ask for one callback on the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a requested frame. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle;

    /// Disarm a timeout. Unknown or already-fired handles are ignored.
    fn clear_timeout(&mut self, handle: TimerHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_scale_is_capped() {
        assert_eq!(Viewport::new(1.0, 1.0, 3.0).pixel_scale(), 2.0);
        assert_eq!(Viewport::new(1.0, 1.0, 1.5).pixel_scale(), 1.5);
    }

    #[test]
    fn pixel_scale_defaults_to_one() {
        assert_eq!(Viewport::new(1.0, 1.0, 0.0).pixel_scale(), 1.0);
        assert_eq!(Viewport::new(1.0, 1.0, f64::NAN).pixel_scale(), 1.0);
    }
}
