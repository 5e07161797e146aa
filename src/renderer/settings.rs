//! Render Settings
//!
//! Pure data describing the post-processing chain and the output surface.
//! The pipeline reads these when it builds passes and every time it extracts
//! a frame; nothing here touches the device.

use serde::{Deserialize, Serialize};

use crate::scene::Fog;

/// Bloom post-processing parameters.
///
/// Bright regions above `threshold` (linear luminance) are extracted,
/// blurred down a mip chain, upsampled back with a tent filter of `radius`
/// and added to the scene color scaled by `strength`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
    /// Maximum number of mip levels in the blur chain.
    ///
    /// The actual count is clamped to what the render target size allows.
    pub mip_levels: u32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            strength: 0.5,
            radius: 0.3,
            threshold: 0.9,
            mip_levels: 5,
        }
    }
}

impl BloomSettings {
    /// Mip levels actually allocated for a `width` × `height` target.
    #[must_use]
    pub fn effective_mip_levels(&self, width: u32, height: u32) -> u32 {
        let smallest = width.min(height).max(1);
        // Level 0 is already half resolution.
        let possible = (u32::BITS - smallest.leading_zeros()).saturating_sub(1).max(1);
        self.mip_levels.clamp(1, possible)
    }
}

/// Tone-mapping operator applied when the HDR scene is resolved to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToneMapping {
    Linear,
    Reinhard,
    #[default]
    AcesFilmic,
}

impl ToneMapping {
    /// Numeric mode understood by the composite shader.
    #[must_use]
    pub fn shader_mode(self) -> u32 {
        match self {
            Self::Linear => 0,
            Self::Reinhard => 1,
            Self::AcesFilmic => 2,
        }
    }
}

/// Output and post-processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub bloom: BloomSettings,
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
    pub fog: Fog,
    /// Linear RGBA clear color. Fully transparent lets page content show through.
    pub clear_color: [f32; 4],
    /// Upper bound for the device pixel ratio used to size render targets.
    pub max_pixel_ratio: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            bloom: BloomSettings::default(),
            tone_mapping: ToneMapping::AcesFilmic,
            exposure: 1.0,
            fog: Fog::default(),
            clear_color: [0.0, 0.0, 0.0, 0.0],
            max_pixel_ratio: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mip_levels_clamp_to_target_size() {
        let bloom = BloomSettings {
            mip_levels: 8,
            ..Default::default()
        };
        assert_eq!(bloom.effective_mip_levels(1920, 1080), 8);
        assert_eq!(bloom.effective_mip_levels(16, 16), 4);
        assert_eq!(bloom.effective_mip_levels(1, 1), 1);
    }
}
