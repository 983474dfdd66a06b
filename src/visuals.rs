//! Colour types shared by every drawing backend.

use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB tint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an alpha value (clamped to `0.0..=1.0`).
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

/// A tint with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    /// CSS colour string, e.g. `rgba(99, 102, 241, 0.075)`.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }

    /// Normalised `[r, g, b, a]` floats for GPU vertex data.
    pub fn to_array(&self) -> [f32; 4] {
        [
            self.rgb.r as f32 / 255.0,
            self.rgb.g as f32 / 255.0,
            self.rgb.b as f32 / 255.0,
            self.alpha,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_string_matches_canvas_syntax() {
        let c = Rgb::new(99, 102, 241).with_alpha(0.62);
        assert_eq!(c.to_css(), "rgba(99, 102, 241, 0.62)");
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(Rgb::new(0, 0, 0).with_alpha(3.0).alpha, 1.0);
        assert_eq!(Rgb::new(0, 0, 0).with_alpha(-1.0).alpha, 0.0);
    }

    #[test]
    fn array_is_normalised() {
        let a = Rgb::new(255, 0, 51).with_alpha(0.5).to_array();
        assert_eq!(a, [1.0, 0.0, 0.2, 0.5]);
    }
}
