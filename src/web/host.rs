//! [`Host`] over the browser window.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::host::{FrameHandle, Host, TimerHandle, Viewport};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// A scheduled callback coming back from the browser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    Frame(FrameHandle),
    Timer(TimerHandle),
}

/// Maps our handles to browser ids and routes fired callbacks to `dispatch`.
pub struct WebHost {
    window: web_sys::Window,
    dispatch: Rc<dyn Fn(HostEvent)>,
    next_handle: u32,
    frames: HashMap<FrameHandle, i32>,
    timers: HashMap<TimerHandle, i32>,
}

impl WebHost {
    pub fn new(window: web_sys::Window, dispatch: Rc<dyn Fn(HostEvent)>) -> Self {
        Self {
            window,
            dispatch,
            next_handle: 1,
            frames: HashMap::new(),
            timers: HashMap::new(),
        }
    }

    /// Forget a callback that has fired; its browser id is spent.
    pub fn fired(&mut self, event: HostEvent) {
        match event {
            HostEvent::Frame(handle) => {
                self.frames.remove(&handle);
            }
            HostEvent::Timer(handle) => {
                self.timers.remove(&handle);
            }
        }
    }

    fn next(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle = self.next_handle.wrapping_add(1);
        handle
    }

    fn callback(&self, event: HostEvent) -> JsValue {
        let dispatch = self.dispatch.clone();
        Closure::once_into_js(move || dispatch(event))
    }
}

impl Host for WebHost {
    fn viewport(&self) -> Viewport {
        let dimension = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
            self.window.device_pixel_ratio(),
        )
    }

    fn prefers_reduced_motion(&self) -> bool {
        match self.window.match_media(REDUCED_MOTION_QUERY) {
            Ok(Some(query)) => query.matches(),
            _ => false,
        }
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next());
        let callback = self.callback(HostEvent::Frame(handle));
        match self.window.request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => {
                self.frames.insert(handle, id);
            }
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(id) = self.frames.remove(&handle) {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next());
        let callback = self.callback(HostEvent::Timer(handle));
        let millis = delay.as_millis().min(i32::MAX as u128) as i32;
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            Ok(id) => {
                self.timers.insert(handle, id);
            }
            Err(e) => log::warn!("setTimeout failed: {:?}", e),
        }
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        if let Some(id) = self.timers.remove(&handle) {
            self.window.clear_timeout_with_handle(id);
        }
    }
}
