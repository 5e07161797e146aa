//! Render Device Abstraction
//!
//! [`RenderDevice`] is the seam between the field and whatever actually owns
//! GPU memory. Everything above it (pool, pipeline, engine) only ever holds
//! opaque [`ResourceId`]s and must hand each one back through
//! [`RenderDevice::release`] exactly once.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::renderer::frame::Frame;

slotmap::new_key_type! {
    /// Handle to a device-owned geometry, material or render target.
    pub struct ResourceId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Geometry,
    Material,
    RenderTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryDesc {
    /// Axis-aligned box centered on the origin.
    Cube { size: f32 },
    /// Point cloud whose positions are streamed every frame.
    Points { count: usize },
}

impl GeometryDesc {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cube { .. } => "cube_geometry",
            Self::Points { .. } => "particle_geometry",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blending {
    #[default]
    Normal,
    Additive,
}

/// Material description. Colors are linear RGB.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialDesc {
    Standard {
        color: Vec3,
        emissive: Vec3,
        emissive_intensity: f32,
        metalness: f32,
        roughness: f32,
        opacity: f32,
        transparent: bool,
    },
    Points {
        size: f32,
        opacity: f32,
        blending: Blending,
        size_attenuation: bool,
        vertex_colors: bool,
    },
}

impl MaterialDesc {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard { .. } => "cube_material",
            Self::Points { .. } => "particle_material",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    /// `Rgba16Float` scene color.
    HdrColor,
    /// `Depth32Float`.
    Depth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTargetDesc {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub format: TargetFormat,
}

impl RenderTargetDesc {
    #[must_use]
    pub fn new(label: impl Into<String>, width: u32, height: u32, format: TargetFormat) -> Self {
        Self {
            label: label.into(),
            width: width.max(1),
            height: height.max(1),
            format,
        }
    }
}

/// Owner of every GPU-backed resource the field uses.
///
/// Implementations must make [`release`](Self::release) idempotent: releasing
/// an unknown or already released id returns `false` and does nothing else.
pub trait RenderDevice {
    fn create_geometry(&mut self, desc: &GeometryDesc) -> Result<ResourceId>;

    fn create_material(&mut self, desc: &MaterialDesc) -> Result<ResourceId>;

    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<ResourceId>;

    /// Frees a resource. Returns whether anything was freed.
    fn release(&mut self, id: ResourceId) -> bool;

    fn is_live(&self, id: ResourceId) -> bool;

    /// Number of resources currently allocated.
    fn live_resources(&self) -> usize;

    /// Resizes the presentation surface, in physical pixels.
    fn configure_surface(&mut self, width: u32, height: u32) -> Result<()>;

    fn surface_size(&self) -> (u32, u32);

    /// Draws (or records) one frame.
    fn submit(&mut self, frame: &Frame<'_>) -> Result<()>;
}
