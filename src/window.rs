//! Native preview window.
//!
//! Runs the backdrop in a `winit` window drawn by [`GpuSurface`]. The
//! window stands in for the page: its size is the viewport, its scale
//! factor the device pixel ratio, and occlusion the page visibility.

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::animator::Animator;
use crate::config::PreviewConfig;
use crate::error::PreviewError;
use crate::gpu::GpuSurface;
use crate::host::{FrameHandle, Host, TimerHandle, Viewport};

const FPS_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// [`Host`] backed by a window and the event loop's wake-up deadlines.
///
/// Frames map to redraw requests; timeouts are kept here and fired from
/// [`ApplicationHandler::about_to_wait`].
pub struct NativeHost {
    window: Arc<Window>,
    reduced_motion: bool,
    next_handle: u32,
    frames: Vec<FrameHandle>,
    timers: Vec<(Instant, TimerHandle)>,
}

impl NativeHost {
    pub fn new(window: Arc<Window>, reduced_motion: bool) -> Self {
        Self {
            window,
            reduced_motion,
            next_handle: 1,
            frames: Vec::new(),
            timers: Vec::new(),
        }
    }

    /// Frames requested since the last redraw.
    pub fn take_frames(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.frames)
    }

    /// Remove and return timers due at `now`, earliest first.
    pub fn take_due_timers(&mut self, now: Instant) -> Vec<TimerHandle> {
        let mut due: Vec<(Instant, TimerHandle)> =
            self.timers.iter().copied().filter(|(at, _)| *at <= now).collect();
        self.timers.retain(|(at, _)| *at > now);
        due.sort_by_key(|(at, handle)| (*at, handle.0));
        due.into_iter().map(|(_, handle)| handle).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|(at, _)| *at).min()
    }

    fn next(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle = self.next_handle.wrapping_add(1);
        handle
    }
}

impl Host for NativeHost {
    fn viewport(&self) -> Viewport {
        let size = self.window.inner_size();
        let scale = self.window.scale_factor();
        Viewport::new(
            size.width as f64 / scale,
            size.height as f64 / scale,
            scale,
        )
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next());
        self.frames.push(handle);
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|h| *h != handle);
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next());
        self.timers.push((Instant::now() + delay, handle));
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.retain(|(_, h)| *h != handle);
    }
}

/// The preview application.
pub struct App {
    config: PreviewConfig,
    window: Option<Arc<Window>>,
    host: Option<NativeHost>,
    animator: Option<Animator<GpuSurface>>,
    error: Option<PreviewError>,
    last_fps_log: Instant,
}

impl App {
    pub fn new(config: PreviewConfig) -> Self {
        Self {
            config,
            window: None,
            host: None,
            animator: None,
            error: None,
            last_fps_log: Instant::now(),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), PreviewError> {
        let window_attrs = Window::default_attributes()
            .with_title("pagefx preview")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let mut host = NativeHost::new(window.clone(), self.config.reduced_motion);

        // The GPU is only brought up once reduced motion has been ruled out.
        let mut gpu_error = None;
        let created = Animator::create(
            &host,
            Some(window.clone()),
            |window| match pollster::block_on(GpuSurface::new(window)) {
                Ok(surface) => Some(surface),
                Err(e) => {
                    gpu_error = Some(e);
                    None
                }
            },
            self.config.field.clone(),
        );
        if let Some(e) = gpu_error {
            return Err(e.into());
        }

        match created {
            Ok(mut animator) => {
                animator.start(&mut host);
                log::info!("backdrop running with {} particles", animator.field().len());
                self.animator = Some(animator);
            }
            Err(skip) => log::info!("backdrop skipped: {}", skip),
        }

        self.window = Some(window);
        self.host = Some(host);
        Ok(())
    }

    fn log_fps(&mut self) {
        if self.last_fps_log.elapsed() < FPS_LOG_INTERVAL {
            return;
        }
        self.last_fps_log = Instant::now();
        if let Some(animator) = &self.animator {
            log::debug!(
                "{:.1} fps, frame {}",
                animator.time().fps(),
                animator.time().frame()
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let (Some(host), Some(animator)) = (self.host.as_mut(), self.animator.as_mut()) else {
            if let WindowEvent::CloseRequested = event {
                event_loop.exit();
            }
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                animator.dispose(host);
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                animator.resized(host);
            }
            WindowEvent::Occluded(hidden) => {
                animator.visibility_changed(host, hidden);
            }
            WindowEvent::RedrawRequested => {
                for frame in host.take_frames() {
                    animator.frame(host, frame);
                }
                self.log_fps();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(host) = self.host.as_mut() else {
            return;
        };
        if let Some(animator) = self.animator.as_mut() {
            for timer in host.take_due_timers(Instant::now()) {
                animator.timer_fired(host, timer);
            }
        }
        match host.next_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

/// Open the preview window and run until it is closed.
pub fn run(config: PreviewConfig) -> Result<(), PreviewError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
