//! 渲染 Pass 链
//!
//! The pipeline owns an ordered list of passes. Each pass declares the
//! render targets it needs for a given physical size; the pipeline allocates
//! them (atomically, through a [`ResourceScope`](crate::renderer::ResourceScope))
//! and installs them. Passes never talk to the device themselves.

mod bloom;
mod scene;

pub use bloom::BloomPass;
pub use scene::ScenePass;

use crate::renderer::device::{RenderTargetDesc, ResourceId};
use crate::renderer::frame::PassDesc;

pub trait RenderPass {
    /// 节点名称，用于调试
    fn name(&self) -> &'static str;

    /// Targets this pass needs at `width` × `height` physical pixels.
    fn target_descs(&self, width: u32, height: u32) -> Vec<RenderTargetDesc>;

    /// Swaps in freshly allocated targets (in `target_descs` order) and
    /// returns the previous ones so the caller can release them.
    fn install_targets(&mut self, targets: Vec<ResourceId>) -> Vec<ResourceId>;

    fn targets(&self) -> &[ResourceId];

    /// Frame description of this pass, or `None` while it owns no targets.
    fn describe(&self) -> Option<PassDesc>;

    /// Removes and returns every owned target.
    fn take_targets(&mut self) -> Vec<ResourceId> {
        self.install_targets(Vec::new())
    }
}
