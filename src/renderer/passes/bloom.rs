//! Bloom Pass
//!
//! Owns the blur mip chain. Level 0 is half the surface resolution and every
//! further level halves again, down to `BloomSettings::effective_mip_levels`.
//! The device does the actual bright-pass, downsample and tent upsample.

use crate::renderer::device::{RenderTargetDesc, ResourceId, TargetFormat};
use crate::renderer::frame::PassDesc;
use crate::renderer::settings::BloomSettings;

use super::RenderPass;

#[derive(Debug)]
pub struct BloomPass {
    settings: BloomSettings,
    mips: Vec<ResourceId>,
}

impl BloomPass {
    #[must_use]
    pub fn new(settings: BloomSettings) -> Self {
        Self {
            settings,
            mips: Vec::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &BloomSettings {
        &self.settings
    }

    /// Size of mip `level` for a surface of `width` × `height`.
    #[must_use]
    pub fn mip_size(width: u32, height: u32, level: u32) -> (u32, u32) {
        ((width >> (level + 1)).max(1), (height >> (level + 1)).max(1))
    }
}

impl RenderPass for BloomPass {
    fn name(&self) -> &'static str {
        "bloom"
    }

    fn target_descs(&self, width: u32, height: u32) -> Vec<RenderTargetDesc> {
        (0..self.settings.effective_mip_levels(width, height))
            .map(|level| {
                let (w, h) = Self::mip_size(width, height, level);
                RenderTargetDesc::new(format!("bloom_mip_{level}"), w, h, TargetFormat::HdrColor)
            })
            .collect()
    }

    fn install_targets(&mut self, targets: Vec<ResourceId>) -> Vec<ResourceId> {
        log::debug!("Bloom mip chain: {} levels", targets.len());
        std::mem::replace(&mut self.mips, targets)
    }

    fn targets(&self) -> &[ResourceId] {
        &self.mips
    }

    fn describe(&self) -> Option<PassDesc> {
        if self.mips.is_empty() {
            return None;
        }
        Some(PassDesc::Bloom {
            mips: self.mips.clone(),
            settings: self.settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_halves_from_half_resolution() {
        let pass = BloomPass::new(BloomSettings::default());
        let descs = pass.target_descs(1280, 720);
        assert_eq!(descs.len(), 5);
        assert_eq!((descs[0].width, descs[0].height), (640, 360));
        assert_eq!((descs[4].width, descs[4].height), (40, 22));
    }
}
