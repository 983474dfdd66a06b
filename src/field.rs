//! The particle population and its per-frame update.

use crate::config::FieldConfig;
use crate::connections::{links, Link};
use crate::particle::Particle;
use crate::spawn::SpawnContext;
use crate::surface::Surface;
use glam::Vec2;

/// Population floor, regardless of viewport area.
pub const MIN_PARTICLES: usize = 18;
/// Population ceiling; bounds the O(n²) link pass.
pub const MAX_PARTICLES: usize = 120;

/// Population for a `width` x `height` viewport:
/// `clamp(18, 120, floor(width * height * density))`.
pub fn target_count(width: f32, height: f32, density: f64) -> usize {
    let raw = (width as f64 * height as f64 * density).floor();
    // NaN and negatives saturate to 0, infinities to usize::MAX.
    (raw as usize).clamp(MIN_PARTICLES, MAX_PARTICLES)
}

/// Dots drifting across a viewport, joined by proximity links.
#[derive(Debug)]
pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    width: f32,
    height: f32,
}

impl ParticleField {
    /// An empty field. Call [`ParticleField::resize`] to populate it.
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Current viewport size in CSS pixels.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Adopt a new viewport and move the population toward its target count.
    ///
    /// Particles already present keep their slot, position and velocity;
    /// growth appends freshly spawned particles and shrinking truncates.
    pub fn resize(&mut self, width: f32, height: f32, spawn: &mut SpawnContext) {
        self.width = width;
        self.height = height;

        let target = target_count(width, height, self.config.density);
        if target <= self.particles.len() {
            self.particles.truncate(target);
        } else {
            let missing = target - self.particles.len();
            self.particles.reserve(missing);
            for _ in 0..missing {
                let p = spawn.spawn(width, height, &self.config);
                self.particles.push(p);
            }
        }
    }

    /// Drop the whole population.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Move every particle one frame, wrapping at the viewport edges.
    pub fn advance(&mut self) {
        let (w, h) = (self.width, self.height);
        for p in &mut self.particles {
            p.advance(w, h);
        }
    }

    /// Links for the current positions.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        links(
            &self.particles,
            self.config.link_distance,
            self.config.link_alpha,
        )
    }

    /// Draw the current state: clear, links, then dots on top.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let tint = self.config.tint;
        surface.clear(self.width, self.height);

        for link in self.links() {
            surface.stroke_line(link.from, link.to, 1.0, tint.with_alpha(link.alpha));
        }

        let dot = tint.with_alpha(self.config.dot_alpha);
        for p in &self.particles {
            surface.fill_circle(p.position, p.radius, dot);
        }
    }

    /// One animation tick: advance then render.
    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.advance();
        self.render(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DrawCommand, RecordingSurface};

    fn field(width: f32, height: f32) -> (ParticleField, SpawnContext) {
        let mut spawn = SpawnContext::seeded(1);
        let mut field = ParticleField::new(FieldConfig::default());
        field.resize(width, height, &mut spawn);
        (field, spawn)
    }

    #[test]
    fn count_formula_and_clamp() {
        let d = FieldConfig::default().density;
        assert_eq!(target_count(0.0, 0.0, d), MIN_PARTICLES);
        assert_eq!(target_count(320.0, 240.0, d), 18); // floor(6.528) = 6 -> 18
        assert_eq!(target_count(1000.0, 500.0, d), 42); // floor(42.5)
        assert_eq!(target_count(1920.0, 1080.0, d), 120); // floor(176.256) -> 120
        assert_eq!(target_count(f32::NAN, 10.0, d), MIN_PARTICLES);
        assert_eq!(target_count(f32::INFINITY, 10.0, d), MAX_PARTICLES);
    }

    #[test]
    fn count_matches_clamped_floor_over_sizes() {
        let d = FieldConfig::default().density;
        for w in (0..3000).step_by(137) {
            for h in (0..2000).step_by(91) {
                let expected = ((w as f64 * h as f64 * d).floor() as usize).clamp(18, 120);
                assert_eq!(target_count(w as f32, h as f32, d), expected, "{w}x{h}");
            }
        }
    }

    #[test]
    fn grow_appends_without_touching_existing() {
        let (mut field, mut spawn) = field(1000.0, 500.0);
        let before = field.particles().to_vec();
        field.resize(1400.0, 800.0, &mut spawn);
        assert_eq!(field.len(), 95); // floor(95.2)
        assert_eq!(&field.particles()[..before.len()], &before[..]);
    }

    #[test]
    fn shrink_truncates_to_prefix() {
        let (mut field, mut spawn) = field(1920.0, 1080.0);
        let before = field.particles().to_vec();
        field.resize(1000.0, 500.0, &mut spawn);
        assert_eq!(field.len(), 42);
        for (kept, old) in field.particles().iter().zip(&before) {
            assert_eq!(kept.velocity, old.velocity);
            assert_eq!(kept.radius, old.radius);
        }
    }

    #[test]
    fn advance_keeps_everything_inside_overscan() {
        let (mut field, mut spawn) = field(1920.0, 1080.0);
        // Shrink hard so many retained particles start far outside.
        field.resize(300.0, 200.0, &mut spawn);
        field.advance();
        for p in field.particles() {
            assert!((-10.0..=310.0).contains(&p.position.x), "{:?}", p);
            assert!((-10.0..=210.0).contains(&p.position.y), "{:?}", p);
        }
    }

    #[test]
    fn render_order_is_clear_links_dots() {
        let mut field = ParticleField::new(FieldConfig::default());
        field.particles = vec![
            Particle::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 2.0),
            Particle::new(Vec2::new(20.0, 10.0), Vec2::ZERO, 1.0),
        ];
        field.width = 100.0;
        field.height = 50.0;

        let mut surface = RecordingSurface::new();
        field.render(&mut surface);
        let commands = surface.take_commands();

        assert_eq!(commands.len(), 4);
        assert_eq!(commands[0], DrawCommand::Clear { width: 100.0, height: 50.0 });
        assert!(matches!(commands[1], DrawCommand::Line { width, .. } if width == 1.0));
        assert!(matches!(commands[2], DrawCommand::Circle { radius, .. } if radius == 2.0));
        assert!(matches!(commands[3], DrawCommand::Circle { color, .. } if color.alpha == 0.62));
    }
}
