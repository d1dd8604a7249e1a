//! RGBA colours as consumed by the rendering surface.

use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// `0.0..=1.0`.
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same channels with alpha replaced (clamped to `0..=1`).
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: super::clamp_opacity(alpha),
            ..self
        }
    }

    /// CSS `rgba(...)` form.
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl Display for Rgba {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::Rgba;

    #[test]
    fn css_form_carries_alpha() {
        assert_eq!(Rgba::rgb(255, 170, 0).with_alpha(0.5).to_css(), "rgba(255, 170, 0, 0.5)");
        assert_eq!(Rgba::rgb(1, 2, 3).with_alpha(7.0).a, 1.0);
    }
}
