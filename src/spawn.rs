//! Random particle spawning.
//!
//! New particles get a uniform position inside the viewport, a speed drawn
//! from the configured range with an independent random sign per axis, and
//! a uniform radius.

use crate::config::FieldConfig;
use crate::particle::Particle;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// RNG wrapper with the helpers the field needs when it grows.
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Deterministic context for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seed from the config when it has one, otherwise from the wall clock.
    pub fn for_config(config: &FieldConfig) -> Self {
        Self::seeded(config.seed.unwrap_or_else(clock_seed))
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Uniform value in `[min, max)`. Equal bounds return `min`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.random() * (max - min) + min
    }

    /// `-1.0` or `1.0` with equal probability.
    #[inline]
    pub fn random_sign(&mut self) -> f32 {
        if self.random() < 0.5 {
            -1.0
        } else {
            1.0
        }
    }

    /// Spawn a fresh particle somewhere in a `width` x `height` viewport.
    pub fn spawn(&mut self, width: f32, height: f32, config: &FieldConfig) -> Particle {
        let x = self.random_range(0.0, width);
        let y = self.random_range(0.0, height);
        let vx = self.random_range(config.min_speed, config.max_speed) * self.random_sign();
        let vy = self.random_range(config.min_speed, config.max_speed) * self.random_sign();
        let radius = self.random_range(config.min_radius, config.max_radius);
        Particle::new(Vec2::new(x, y), Vec2::new(vx, vy), radius)
    }
}

fn clock_seed() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}
