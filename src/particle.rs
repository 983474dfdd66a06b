//! A single backdrop dot.

use glam::Vec2;

/// Distance past each viewport edge a particle may drift before it wraps.
pub const WRAP_MARGIN: f32 = 10.0;

/// A dot moving in a straight line across the viewport.
///
/// Coordinates are CSS pixels; velocity is pixels per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Advance one frame, wrapping toroidally with a [`WRAP_MARGIN`] overscan.
    pub fn advance(&mut self, width: f32, height: f32) {
        self.position += self.velocity;
        self.position.x = wrap(self.position.x, width);
        self.position.y = wrap(self.position.y, height);
    }
}

/// Leaving past `-margin` re-enters at `extent + margin`, and the reverse.
#[inline]
fn wrap(mut value: f32, extent: f32) -> f32 {
    if value < -WRAP_MARGIN {
        value = extent + WRAP_MARGIN;
    }
    if value > extent + WRAP_MARGIN {
        value = -WRAP_MARGIN;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_by_velocity() {
        let mut p = Particle::new(Vec2::new(50.0, 50.0), Vec2::new(0.25, -0.1), 1.0);
        p.advance(100.0, 100.0);
        assert!((p.position.x - 50.25).abs() < 1e-5);
        assert!((p.position.y - 49.9).abs() < 1e-5);
    }

    #[test]
    fn wraps_left_edge_to_right_overscan() {
        let mut p = Particle::new(Vec2::new(-9.9, 40.0), Vec2::new(-0.2, 0.0), 1.0);
        p.advance(300.0, 200.0);
        assert_eq!(p.position.x, 310.0);
    }

    #[test]
    fn wraps_bottom_edge_to_top_overscan() {
        let mut p = Particle::new(Vec2::new(40.0, 209.9), Vec2::new(0.0, 0.2), 1.0);
        p.advance(300.0, 200.0);
        assert_eq!(p.position.y, -10.0);
    }

    #[test]
    fn exact_margin_does_not_wrap() {
        let mut p = Particle::new(Vec2::new(-10.0, 210.0), Vec2::ZERO, 1.0);
        p.advance(300.0, 200.0);
        assert_eq!(p.position, Vec2::new(-10.0, 210.0));
    }

    #[test]
    fn far_outside_after_shrink_comes_back_in_one_step() {
        let mut p = Particle::new(Vec2::new(1500.0, -400.0), Vec2::new(0.1, 0.1), 1.0);
        p.advance(800.0, 600.0);
        assert_eq!(p.position, Vec2::new(-10.0, 610.0));
    }
}
