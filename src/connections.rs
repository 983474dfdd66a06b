//! Proximity links between nearby particles.
//!
//! Every unordered pair closer than the link distance is joined by a line
//! whose alpha fades linearly from the configured maximum at distance 0
//! to nothing at the threshold. The pass is O(n²); the field caps the
//! population at 120, so a frame checks at most 7140 pairs.

use crate::particle::Particle;
use glam::Vec2;

/// A line segment to stroke between two particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub from: Vec2,
    pub to: Vec2,
    pub alpha: f32,
}

/// Alpha for a pair at squared distance `distance_sq`, or `None` when the
/// pair is farther apart than `max_distance`.
#[inline]
pub fn link_alpha(distance_sq: f32, max_distance: f32, max_alpha: f32) -> Option<f32> {
    if max_distance <= 0.0 || distance_sq > max_distance * max_distance {
        return None;
    }
    let t = 1.0 - distance_sq.sqrt() / max_distance;
    Some(max_alpha * t)
}

/// Iterate the links of every unordered pair `(i, j)` with `i < j`.
pub fn links(
    particles: &[Particle],
    max_distance: f32,
    max_alpha: f32,
) -> impl Iterator<Item = Link> + '_ {
    particles.iter().enumerate().flat_map(move |(i, a)| {
        particles[i + 1..].iter().filter_map(move |b| {
            let d2 = a.position.distance_squared(b.position);
            link_alpha(d2, max_distance, max_alpha).map(|alpha| Link {
                from: a.position,
                to: b.position,
                alpha,
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, 1.0)
    }

    #[test]
    fn alpha_is_zero_at_threshold() {
        assert_eq!(link_alpha(140.0 * 140.0, 140.0, 0.075), Some(0.0));
    }

    #[test]
    fn alpha_is_max_at_zero_distance() {
        assert_eq!(link_alpha(0.0, 140.0, 0.075), Some(0.075));
    }

    #[test]
    fn alpha_is_linear_in_distance() {
        let alpha = link_alpha(70.0 * 70.0, 140.0, 0.1).unwrap();
        assert!((alpha - 0.05).abs() < 1e-6);
    }

    #[test]
    fn beyond_threshold_is_skipped() {
        assert_eq!(link_alpha(140.01 * 140.01, 140.0, 0.075), None);
    }

    #[test]
    fn zero_threshold_links_nothing() {
        assert_eq!(link_alpha(0.0, 0.0, 1.0), None);
    }

    #[test]
    fn each_close_pair_is_linked_once() {
        let particles = [dot(0.0, 0.0), dot(10.0, 0.0), dot(500.0, 500.0), dot(0.0, 20.0)];
        let found: Vec<Link> = links(&particles, 140.0, 1.0).collect();
        // (0,1), (0,3), (1,3); the far particle links to nothing.
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|l| l.from != Vec2::new(500.0, 500.0)));
        assert!(found.iter().all(|l| l.to != Vec2::new(500.0, 500.0)));
    }

    #[test]
    fn full_population_bounds_pair_count() {
        let particles: Vec<Particle> = (0..120).map(|_| dot(1.0, 1.0)).collect();
        assert_eq!(links(&particles, 140.0, 1.0).count(), 7140);
    }
}
