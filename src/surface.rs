//! Canvas-like drawing target.

use crate::visuals::Rgba;
use glam::{UVec2, Vec2};

/// The drawing primitives the backdrop needs.
///
/// Implemented by the browser's 2D canvas context, the native wgpu
/// preview, and [`RecordingSurface`](crate::testing::RecordingSurface)
/// for tests. Coordinates passed to the drawing calls are CSS pixels;
/// the transform set by [`Surface::set_transform`] maps them to the
/// backing store.
pub trait Surface {
    /// Resize the backing store to `backing` device pixels and the
    /// displayed size to `css` pixels.
    fn resize(&mut self, backing: UVec2, css: UVec2);

    /// Uniform scale from CSS pixels to backing pixels.
    fn set_transform(&mut self, scale: f32);

    /// Clear the rectangle `(0, 0, width, height)`.
    fn clear(&mut self, width: f32, height: f32);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Called once a frame has been fully drawn. Immediate-mode targets
    /// like the 2D canvas need nothing here.
    fn present(&mut self) {}
}
