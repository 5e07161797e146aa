use crate::renderer::device::{RenderTargetDesc, ResourceId, TargetFormat};
use crate::renderer::frame::PassDesc;

use super::RenderPass;

/// Draws cubes and particles into an HDR color target with depth.
#[derive(Debug, Default)]
pub struct ScenePass {
    targets: Vec<ResourceId>,
}

impl ScenePass {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderPass for ScenePass {
    fn name(&self) -> &'static str {
        "scene"
    }

    fn target_descs(&self, width: u32, height: u32) -> Vec<RenderTargetDesc> {
        vec![
            RenderTargetDesc::new("scene_color", width, height, TargetFormat::HdrColor),
            RenderTargetDesc::new("scene_depth", width, height, TargetFormat::Depth),
        ]
    }

    fn install_targets(&mut self, targets: Vec<ResourceId>) -> Vec<ResourceId> {
        std::mem::replace(&mut self.targets, targets)
    }

    fn targets(&self) -> &[ResourceId] {
        &self.targets
    }

    fn describe(&self) -> Option<PassDesc> {
        match self.targets.as_slice() {
            [color, depth] => Some(PassDesc::Scene {
                color: *color,
                depth: *depth,
            }),
            _ => None,
        }
    }
}
