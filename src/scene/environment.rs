//! Fog - 纯数据结构
//!
//! Exponential-squared distance fog blended toward a flat color.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::hex_to_linear;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fog {
    /// sRGB hex color
    pub color: u32,
    pub density: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: 0x0a_0a1a,
            density: 0.015,
        }
    }
}

impl Fog {
    #[must_use]
    pub fn new(color: u32, density: f32) -> Self {
        Self { color, density }
    }

    #[must_use]
    pub fn linear_color(&self) -> Vec3 {
        hex_to_linear(self.color)
    }

    /// Fraction of the fog color mixed in at `distance`: `1 - exp(-(d * density)^2)`.
    #[must_use]
    pub fn factor(&self, distance: f32) -> f32 {
        let d = self.density * distance;
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }
}
