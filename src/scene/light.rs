use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::hex_to_linear;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightKind {
    Ambient,
    Directional { position: Vec3 },
    Point { position: Vec3, range: f32 },
}

/// Static light. Colors are sRGB hex, intensities are unitless multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub color: u32,
    pub intensity: f32,
}

impl Light {
    #[must_use]
    pub fn new_ambient(color: u32, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
        }
    }

    /// Directional light shining from `position` toward the origin.
    #[must_use]
    pub fn new_directional(color: u32, intensity: f32, position: Vec3) -> Self {
        Self {
            kind: LightKind::Directional { position },
            color,
            intensity,
        }
    }

    #[must_use]
    pub fn new_point(color: u32, intensity: f32, position: Vec3, range: f32) -> Self {
        Self {
            kind: LightKind::Point { position, range },
            color,
            intensity,
        }
    }

    /// Linear RGB color premultiplied by intensity.
    #[must_use]
    pub fn radiance(&self) -> Vec3 {
        hex_to_linear(self.color) * self.intensity
    }

    /// Ambient, key light from above and two colored point lights flanking the field.
    #[must_use]
    pub fn default_rig() -> Vec<Light> {
        vec![
            Self::new_ambient(0x20_40ff, 0.4),
            Self::new_directional(0x00_ccff, 0.6, Vec3::new(10.0, 20.0, 10.0)),
            Self::new_point(0x8b_5cf6, 1.5, Vec3::new(-20.0, 15.0, 0.0), 100.0),
            Self::new_point(0x00_d4ff, 1.5, Vec3::new(20.0, 15.0, 0.0), 100.0),
        ]
    }
}
