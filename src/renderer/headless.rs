//! Headless Render Device
//!
//! Tracks resource lifetimes and records submitted frames without touching a
//! GPU. Tests, benchmarks and the `cubefield-headless` binary run on it.

use slotmap::SlotMap;

use crate::errors::{FieldError, Result};
use crate::renderer::device::{
    GeometryDesc, MaterialDesc, RenderDevice, RenderTargetDesc, ResourceId, ResourceKind,
};
use crate::renderer::frame::Frame;

#[derive(Debug, Clone)]
struct ResourceRecord {
    kind: ResourceKind,
    label: String,
}

/// What the last submitted frame looked like.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub cube_count: usize,
    pub particle_count: usize,
    pub pass_names: Vec<&'static str>,
    pub target_count: usize,
    pub surface_size: (u32, u32),
    /// Smallest and largest instance alpha, if any cubes were drawn.
    pub alpha_range: Option<(f32, f32)>,
}

#[derive(Debug, Default)]
pub struct HeadlessDevice {
    resources: SlotMap<ResourceId, ResourceRecord>,
    budget: Option<usize>,
    surface_size: (u32, u32),
    frames_submitted: u64,
    last_frame: Option<FrameSummary>,
    fail_submissions: bool,
}

impl HeadlessDevice {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Device that refuses to hold more than `limit` live resources.
    #[must_use]
    pub fn with_budget(limit: usize) -> Self {
        Self {
            budget: Some(limit),
            ..Self::default()
        }
    }

    pub fn set_budget(&mut self, limit: Option<usize>) {
        self.budget = limit;
    }

    /// Makes every subsequent [`submit`](RenderDevice::submit) fail.
    pub fn set_fail_submissions(&mut self, fail: bool) {
        self.fail_submissions = fail;
    }

    #[must_use]
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&FrameSummary> {
        self.last_frame.as_ref()
    }

    /// Live resources of one kind.
    #[must_use]
    pub fn live_of_kind(&self, kind: ResourceKind) -> usize {
        self.resources.values().filter(|r| r.kind == kind).count()
    }

    #[must_use]
    pub fn label_of(&self, id: ResourceId) -> Option<&str> {
        self.resources.get(id).map(|r| r.label.as_str())
    }

    fn allocate(&mut self, kind: ResourceKind, label: &str) -> Result<ResourceId> {
        if let Some(limit) = self.budget
            && self.resources.len() >= limit
        {
            return Err(FieldError::ResourceBudgetExceeded { kind, limit });
        }
        Ok(self.resources.insert(ResourceRecord {
            kind,
            label: label.to_string(),
        }))
    }
}

impl RenderDevice for HeadlessDevice {
    fn create_geometry(&mut self, desc: &GeometryDesc) -> Result<ResourceId> {
        self.allocate(ResourceKind::Geometry, desc.label())
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> Result<ResourceId> {
        self.allocate(ResourceKind::Material, desc.label())
    }

    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<ResourceId> {
        self.allocate(ResourceKind::RenderTarget, &desc.label)
    }

    fn release(&mut self, id: ResourceId) -> bool {
        self.resources.remove(id).is_some()
    }

    fn is_live(&self, id: ResourceId) -> bool {
        self.resources.contains_key(id)
    }

    fn live_resources(&self) -> usize {
        self.resources.len()
    }

    fn configure_surface(&mut self, width: u32, height: u32) -> Result<()> {
        self.surface_size = (width, height);
        Ok(())
    }

    fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    fn submit(&mut self, frame: &Frame<'_>) -> Result<()> {
        if self.fail_submissions {
            return Err(FieldError::UnknownResource("submission disabled".to_string()));
        }
        if frame.cube_materials.len() != frame.cubes.len() {
            return Err(FieldError::UnknownResource(format!(
                "{} cube instances but {} materials",
                frame.cubes.len(),
                frame.cube_materials.len()
            )));
        }
        if let Some(id) = frame.referenced_resources().find(|id| !self.is_live(*id)) {
            return Err(FieldError::UnknownResource(format!("{id:?}")));
        }

        let alpha_range = frame.cubes.iter().map(|c| c.alpha()).fold(None, |acc, a| {
            Some(match acc {
                None => (a, a),
                Some((lo, hi)) => (f32::min(lo, a), f32::max(hi, a)),
            })
        });

        self.frames_submitted += 1;
        self.last_frame = Some(FrameSummary {
            cube_count: frame.cubes.len(),
            particle_count: frame.particles.len(),
            pass_names: frame.passes.iter().map(|p| p.name()).collect(),
            target_count: frame.passes.iter().map(|p| p.targets().len()).sum(),
            surface_size: self.surface_size,
            alpha_range,
        });
        log::trace!("Headless frame #{} recorded", self.frames_submitted);
        Ok(())
    }
}
