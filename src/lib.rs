//! # pagefx - animated backdrop and page behaviours for a portfolio site
//!
//! A drifting field of small dots, joined by faint lines when close,
//! drawn behind the page content. Alongside it live the small page
//! behaviours the site needs: a mobile nav toggle, smooth anchor
//! scrolling, one-shot section reveal, animated category tabs and the
//! footer year.
//!
//! ## Quick Start
//!
//! In the browser the crate wires itself up on load (see the `web`
//! module, built for `wasm32`). Anywhere else, drive an [`Animator`]
//! through a [`Host`] and a [`Surface`]:
//!
//! ```ignore
//! use pagefx::prelude::*;
//! use pagefx::testing::{ManualHost, RecordingSurface};
//!
//! let mut host = ManualHost::new(1280.0, 720.0);
//! let mut animator = Animator::create(
//!     &host,
//!     Some(()),
//!     |_| Some(RecordingSurface::new()),
//!     FieldConfig::default(),
//! )?;
//! animator.start(&mut host);
//!
//! while let Some(frame) = host.take_frame() {
//!     animator.frame(&mut host, frame);
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Field
//!
//! [`ParticleField`] holds the particles for the current viewport. Its size
//! follows the viewport area, clamped to
//! [`MIN_PARTICLES`](field::MIN_PARTICLES)..=[`MAX_PARTICLES`](field::MAX_PARTICLES).
//! Each step moves every particle by its velocity, wraps it around the
//! edges with a small margin, and draws links then dots.
//!
//! ### Animator
//!
//! [`Animator`] is the lifecycle state machine around a field: it owns the
//! drawing surface, the live frame handle and the resize debounce, and
//! reacts to frames, timers, resizes and visibility changes forwarded by
//! the host binding.
//!
//! ### Page behaviours
//!
//! The [`page`] module implements each behaviour against the [`Document`]
//! trait, so the same code runs over `web-sys` and over the in-memory
//! document used in tests.
//!
//! ## Targets
//!
//! | Target | Host | Surface | Document |
//! |--------|------|---------|----------|
//! | `wasm32` | `web::WebHost` | `web::CanvasSurface` | `web::WebDocument` |
//! | native | [`window::NativeHost`] | [`gpu::GpuSurface`] | n/a |
//! | tests | [`testing::ManualHost`] | [`testing::RecordingSurface`] | [`testing::MemoryDocument`] |

pub mod animator;
pub mod config;
pub mod connections;
mod debounce;
pub mod field;
pub mod host;
pub mod page;
pub mod particle;
mod spawn;
pub mod surface;
pub mod testing;
pub mod time;
pub mod visuals;

#[cfg(not(target_arch = "wasm32"))]
pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod gpu;
#[cfg(not(target_arch = "wasm32"))]
pub mod window;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use animator::{Animator, AnimatorState, InitSkip, RESIZE_DEBOUNCE};
pub use config::{FieldConfig, PreviewConfig};
pub use connections::Link;
pub use debounce::Debouncer;
pub use field::ParticleField;
pub use glam::{UVec2, Vec2};
pub use host::{FrameHandle, Host, TimerHandle, Viewport};
pub use page::Document;
pub use particle::Particle;
pub use spawn::SpawnContext;
pub use surface::Surface;
pub use visuals::{Rgb, Rgba};

#[cfg(not(target_arch = "wasm32"))]
pub use error::{GpuError, PreviewError};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use pagefx::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animator::{Animator, AnimatorState, InitSkip};
    pub use crate::config::FieldConfig;
    pub use crate::field::ParticleField;
    pub use crate::host::{FrameHandle, Host, TimerHandle, Viewport};
    pub use crate::page::{
        CategoryTabs, Document, NavToggle, ScrollReveal, BACKDROP_CANVAS_ID,
    };
    pub use crate::surface::Surface;
    pub use crate::time::FrameClock;
    pub use crate::visuals::{Rgb, Rgba};
    pub use crate::{UVec2, Vec2};
}
