//! Tunables for the particle backdrop.

use crate::visuals::Rgb;
use serde::{Deserialize, Serialize};

/// Immutable configuration of a particle field.
///
/// Fixed when the animator is created. Use the `with_*` methods to
/// override individual values:
///
/// ```ignore
/// let config = FieldConfig::default()
///     .with_link_distance(110.0)
///     .with_tint(Rgb::new(236, 72, 153));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Particles spawned per square CSS pixel.
    pub density: f64,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Speed bounds in CSS pixels per frame, applied per axis.
    pub min_speed: f32,
    pub max_speed: f32,
    /// Particles closer than this are joined by a line.
    pub link_distance: f32,
    /// Line alpha at zero distance; fades linearly to 0 at `link_distance`.
    pub link_alpha: f32,
    pub dot_alpha: f32,
    pub tint: Rgb,
    /// Seed for reproducible fields. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density: 0.000085,
            min_radius: 0.9,
            max_radius: 2.6,
            min_speed: 0.08,
            max_speed: 0.28,
            link_distance: 140.0,
            link_alpha: 0.075,
            dot_alpha: 0.62,
            tint: Rgb::new(99, 102, 241),
            seed: None,
        }
    }
}

impl FieldConfig {
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_radius(mut self, min: f32, max: f32) -> Self {
        self.min_radius = min;
        self.max_radius = max;
        self
    }

    pub fn with_speed(mut self, min: f32, max: f32) -> Self {
        self.min_speed = min;
        self.max_speed = max;
        self
    }

    pub fn with_link_distance(mut self, distance: f32) -> Self {
        self.link_distance = distance;
        self
    }

    pub fn with_link_alpha(mut self, alpha: f32) -> Self {
        self.link_alpha = alpha;
        self
    }

    pub fn with_dot_alpha(mut self, alpha: f32) -> Self {
        self.dot_alpha = alpha;
        self
    }

    pub fn with_tint(mut self, tint: Rgb) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Settings for the native preview window.
///
/// ```json
/// { "field": { "link_distance": 110.0 }, "reduced_motion": false, "width": 1280, "height": 720 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub field: FieldConfig,
    /// Stand-in for the OS accessibility preference.
    pub reduced_motion: bool,
    /// Initial window size in logical pixels.
    pub width: u32,
    pub height: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            reduced_motion: false,
            width: 1280,
            height: 720,
        }
    }
}

impl PreviewConfig {
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: FieldConfig =
            serde_json::from_str(r#"{ "link_distance": 90.0, "seed": 7 }"#).unwrap();
        assert_eq!(config.link_distance, 90.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.density, FieldConfig::default().density);
        assert_eq!(config.tint, Rgb::new(99, 102, 241));
    }

    #[test]
    fn builder_overrides() {
        let config = FieldConfig::default()
            .with_speed(0.5, 1.0)
            .with_tint(Rgb::new(1, 2, 3));
        assert_eq!((config.min_speed, config.max_speed), (0.5, 1.0));
        assert_eq!(config.tint, Rgb::new(1, 2, 3));
    }

    #[test]
    fn preview_config_nests_field_settings() {
        let config =
            PreviewConfig::from_json(r#"{ "field": { "dot_alpha": 0.4 }, "reduced_motion": true }"#)
                .unwrap();
        assert!(config.reduced_motion);
        assert_eq!(config.field.dot_alpha, 0.4);
        assert_eq!((config.width, config.height), (1280, 720));
    }

    #[test]
    fn preview_config_rejects_wrong_types() {
        assert!(PreviewConfig::from_json(r#"{ "width": "wide" }"#).is_err());
    }
}
