use crate::errors::Result;
use crate::renderer::device::{
    GeometryDesc, MaterialDesc, RenderDevice, RenderTargetDesc, ResourceId,
};

/// Collects every resource acquired through it and releases them all on drop
/// unless [`commit`](Self::commit) was called.
///
/// Building the pool or a pass chain goes through a scope so that a failure
/// halfway leaves the device exactly as it was.
pub struct ResourceScope<'a> {
    device: &'a mut dyn RenderDevice,
    acquired: Vec<ResourceId>,
    committed: bool,
}

impl<'a> ResourceScope<'a> {
    pub fn new(device: &'a mut dyn RenderDevice) -> Self {
        Self {
            device,
            acquired: Vec::new(),
            committed: false,
        }
    }

    pub fn create_geometry(&mut self, desc: &GeometryDesc) -> Result<ResourceId> {
        let id = self.device.create_geometry(desc)?;
        self.acquired.push(id);
        Ok(id)
    }

    pub fn create_material(&mut self, desc: &MaterialDesc) -> Result<ResourceId> {
        let id = self.device.create_material(desc)?;
        self.acquired.push(id);
        Ok(id)
    }

    pub fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<ResourceId> {
        let id = self.device.create_render_target(desc)?;
        self.acquired.push(id);
        Ok(id)
    }

    /// Device access for operations that do not allocate.
    pub fn device(&mut self) -> &mut dyn RenderDevice {
        &mut *self.device
    }

    #[must_use]
    pub fn acquired(&self) -> &[ResourceId] {
        &self.acquired
    }

    /// Keeps everything acquired so far and hands the ids back in acquisition order.
    pub fn commit(mut self) -> Vec<ResourceId> {
        self.committed = true;
        std::mem::take(&mut self.acquired)
    }
}

impl Drop for ResourceScope<'_> {
    fn drop(&mut self) {
        if self.committed || self.acquired.is_empty() {
            return;
        }
        log::debug!("Rolling back {} resources", self.acquired.len());
        for id in self.acquired.drain(..).rev() {
            self.device.release(id);
        }
    }
}
