//! Lifecycle of the animated backdrop.
//!
//! [`Animator`] owns the drawing surface, the particle field, the live frame
//! handle and the resize debounce timer. It is an explicit state machine:
//!
//! ```text
//!  create ──► Idle ──start──► Running ◄──visible── Paused
//!              ▲                │  ▲                 ▲
//!              └──────stop──────┘  └─frame─┘         │
//!                               └──────hidden────────┘
//!  any state ──dispose──► Disposed (terminal, all events ignored)
//! ```
//!
//! The host binding forwards frames, timers, resizes and visibility
//! changes; the animator asks the host for the next frame only from
//! inside a frame callback or when (re)starting, so at most one frame is
//! ever pending.

use crate::config::FieldConfig;
use crate::debounce::Debouncer;
use crate::field::ParticleField;
use crate::host::{FrameHandle, Host, TimerHandle};
use crate::spawn::SpawnContext;
use crate::surface::Surface;
use crate::time::FrameClock;
use glam::UVec2;
use std::fmt;
use std::time::Duration;

/// Quiet window after the last resize event before the field is rebuilt.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(120);

/// Where the animation loop currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorState {
    /// Created or stopped; no frame pending.
    Idle,
    /// A frame is pending under this handle.
    Running(FrameHandle),
    /// The page is hidden; resumes when it becomes visible again.
    Paused,
    /// Torn down.
    Disposed,
}

/// Why the backdrop was not created.
///
/// None of these are failures: the page simply renders without the
/// backdrop. Callers log them at debug level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitSkip {
    /// The page has no drawing surface element.
    NoSurface,
    /// The user asked the OS to reduce motion.
    ReducedMotion,
    /// The element exists but no 2D context could be obtained.
    NoContext,
}

impl fmt::Display for InitSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitSkip::NoSurface => write!(f, "no backdrop surface element"),
            InitSkip::ReducedMotion => write!(f, "reduced motion requested"),
            InitSkip::NoContext => write!(f, "2D drawing context unavailable"),
        }
    }
}

/// The particle backdrop bound to one drawing surface.
pub struct Animator<S: Surface> {
    surface: S,
    field: ParticleField,
    spawn: SpawnContext,
    scale: f64,
    state: AnimatorState,
    resize: Debouncer,
    time: FrameClock,
}

impl<S: Surface> Animator<S> {
    /// Build an animator, or explain why the backdrop is skipped.
    ///
    /// Checks run in order: the surface element must exist, reduced motion
    /// must be off, and `acquire` must produce a drawing context from the
    /// element. `acquire` is never called if an earlier check fails. The
    /// pixel scale is read from the host once, here.
    pub fn create<H, E, F>(
        host: &H,
        element: Option<E>,
        acquire: F,
        config: FieldConfig,
    ) -> Result<Self, InitSkip>
    where
        H: Host + ?Sized,
        F: FnOnce(E) -> Option<S>,
    {
        let element = element.ok_or(InitSkip::NoSurface)?;
        if host.prefers_reduced_motion() {
            return Err(InitSkip::ReducedMotion);
        }
        let surface = acquire(element).ok_or(InitSkip::NoContext)?;

        let scale = host.viewport().pixel_scale();
        let spawn = SpawnContext::for_config(&config);
        Ok(Self {
            surface,
            field: ParticleField::new(config),
            spawn,
            scale,
            state: AnimatorState::Idle,
            resize: Debouncer::new(RESIZE_DEBOUNCE),
            time: FrameClock::new(),
        })
    }

    /// Size the surface and begin the frame schedule.
    ///
    /// Restarting a running animator cancels its pending frame first.
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) {
        match self.state {
            AnimatorState::Disposed => return,
            AnimatorState::Running(handle) => host.cancel_frame(handle),
            AnimatorState::Idle | AnimatorState::Paused => {}
        }
        self.apply_resize(host);
        self.time.resume();
        self.schedule(host);
    }

    /// Cancel the frame schedule. Visibility changes will not restart it.
    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) {
        match self.state {
            AnimatorState::Disposed | AnimatorState::Idle => return,
            AnimatorState::Running(handle) => host.cancel_frame(handle),
            AnimatorState::Paused => {}
        }
        self.time.pause();
        self.state = AnimatorState::Idle;
    }

    /// Release the schedule, the pending resize and the particles.
    pub fn dispose<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let AnimatorState::Running(handle) = self.state {
            host.cancel_frame(handle);
        }
        self.resize.cancel(host);
        self.field.clear();
        self.time.pause();
        self.state = AnimatorState::Disposed;
        log::debug!("backdrop disposed");
    }

    /// A display frame fired. Frames other than the live one are stale and
    /// ignored.
    pub fn frame<H: Host + ?Sized>(&mut self, host: &mut H, handle: FrameHandle) {
        if self.state != AnimatorState::Running(handle) {
            log::trace!("ignoring stale frame {:?} in {:?}", handle, self.state);
            return;
        }
        self.field.step(&mut self.surface);
        self.surface.present();
        self.time.tick();
        self.schedule(host);
    }

    /// The page became hidden (`true`) or visible (`false`).
    pub fn visibility_changed<H: Host + ?Sized>(&mut self, host: &mut H, hidden: bool) {
        match (self.state, hidden) {
            (AnimatorState::Running(handle), true) => {
                host.cancel_frame(handle);
                self.time.pause();
                self.state = AnimatorState::Paused;
            }
            (AnimatorState::Paused, false) => {
                self.time.resume();
                self.schedule(host);
            }
            // Already paused, already running, stopped, or disposed.
            _ => {}
        }
    }

    /// The viewport changed size. The field is rebuilt once the resize
    /// events have been quiet for [`RESIZE_DEBOUNCE`].
    pub fn resized<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.state == AnimatorState::Disposed {
            return;
        }
        self.resize.trigger(host);
    }

    /// A timeout fired. Returns `true` if it was this animator's pending
    /// resize and the field was rebuilt.
    pub fn timer_fired<H: Host + ?Sized>(&mut self, host: &mut H, handle: TimerHandle) -> bool {
        if self.state == AnimatorState::Disposed || !self.resize.fire(handle) {
            return false;
        }
        self.apply_resize(host);
        true
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, AnimatorState::Running(_))
    }

    /// Handle of the pending frame, if any.
    pub fn live_frame(&self) -> Option<FrameHandle> {
        match self.state {
            AnimatorState::Running(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn pending_resize(&self) -> Option<TimerHandle> {
        self.resize.pending()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Backing-store scale fixed at creation.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn time(&self) -> &FrameClock {
        &self.time
    }

    fn schedule<H: Host + ?Sized>(&mut self, host: &mut H) {
        let handle = host.request_frame();
        self.state = AnimatorState::Running(handle);
    }

    fn apply_resize<H: Host + ?Sized>(&mut self, host: &mut H) {
        let viewport = host.viewport();
        let width = viewport.width.max(0.0).floor();
        let height = viewport.height.max(0.0).floor();

        let backing = UVec2::new(
            (width * self.scale).floor() as u32,
            (height * self.scale).floor() as u32,
        );
        self.surface.resize(backing, UVec2::new(width as u32, height as u32));
        self.surface.set_transform(self.scale as f32);

        self.field.resize(width as f32, height as f32, &mut self.spawn);
        log::debug!(
            "backdrop resized to {}x{} @{}x, {} particles",
            width,
            height,
            self.scale,
            self.field.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DrawCommand, ManualHost, RecordingSurface};

    fn running(host: &mut ManualHost) -> Animator<RecordingSurface> {
        let mut animator = Animator::create(
            &*host,
            Some(()),
            |_| Some(RecordingSurface::new()),
            FieldConfig::default().with_seed(5),
        )
        .unwrap();
        animator.start(host);
        animator
    }

    #[test]
    fn start_sizes_surface_with_capped_scale() {
        let mut host = ManualHost::new(1000.5, 500.9).with_pixel_ratio(3.0);
        let animator = running(&mut host);

        let commands = animator.surface().commands();
        assert_eq!(
            commands[0],
            DrawCommand::Resize {
                backing: UVec2::new(2000, 1000),
                css: UVec2::new(1000, 500),
            }
        );
        assert_eq!(commands[1], DrawCommand::Transform(2.0));
        assert_eq!(animator.field().len(), 42);
        assert_eq!(host.pending_frames().len(), 1);
    }

    #[test]
    fn frame_draws_and_reschedules() {
        let mut host = ManualHost::new(800.0, 600.0);
        let mut animator = running(&mut host);
        animator.surface_mut().take_commands();

        let handle = host.take_frame().unwrap();
        animator.frame(&mut host, handle);

        let commands = animator.surface().commands();
        assert_eq!(commands.first(), Some(&DrawCommand::Clear { width: 800.0, height: 600.0 }));
        assert_eq!(commands.last(), Some(&DrawCommand::Present));
        assert_eq!(host.pending_frames().len(), 1);
        assert_eq!(animator.time().frame(), 1);
    }

    #[test]
    fn stale_frame_is_ignored() {
        let mut host = ManualHost::new(800.0, 600.0);
        let mut animator = running(&mut host);
        let handle = host.take_frame().unwrap();
        animator.visibility_changed(&mut host, true);
        animator.surface_mut().take_commands();

        animator.frame(&mut host, handle);
        assert!(animator.surface().commands().is_empty());
        assert_eq!(animator.state(), AnimatorState::Paused);
    }

    #[test]
    fn restart_cancels_previous_frame() {
        let mut host = ManualHost::new(800.0, 600.0);
        let mut animator = running(&mut host);
        animator.start(&mut host);
        assert_eq!(host.pending_frames().len(), 1);
        assert_eq!(host.frames_requested(), 2);
    }

    #[test]
    fn stopped_animator_ignores_visibility() {
        let mut host = ManualHost::new(800.0, 600.0);
        let mut animator = running(&mut host);
        animator.stop(&mut host);
        animator.visibility_changed(&mut host, true);
        animator.visibility_changed(&mut host, false);
        assert_eq!(animator.state(), AnimatorState::Idle);
        assert!(host.pending_frames().is_empty());
    }

    #[test]
    fn init_skip_messages() {
        assert_eq!(InitSkip::ReducedMotion.to_string(), "reduced motion requested");
    }
}
