//! Frame Extraction
//!
//! A [`Frame`] is the read-only snapshot the pipeline hands to the device:
//! camera matrices, the static light rig, packed per-cube instance data, the
//! particle tables and the ordered pass chain with the targets each pass owns.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::renderer::device::ResourceId;
use crate::renderer::settings::{BloomSettings, ToneMapping};
use crate::scene::{Fog, Light};

/// Per-cube instance data, laid out for a vertex buffer with instance step mode.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct CubeInstance {
    pub model: [[f32; 4]; 4],
    /// Linear base color, alpha in `w`.
    pub color: [f32; 4],
    /// Linear emissive color, intensity in `w`.
    pub emissive: [f32; 4],
    /// `x`: metalness, `y`: roughness.
    pub surface: [f32; 4],
}

impl CubeInstance {
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.color[3]
    }
}

/// Render-target usage of one pass in the chain.
#[derive(Debug, Clone, PartialEq)]
pub enum PassDesc {
    Scene {
        color: ResourceId,
        depth: ResourceId,
    },
    Bloom {
        mips: Vec<ResourceId>,
        settings: BloomSettings,
    },
}

impl PassDesc {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scene { .. } => "scene",
            Self::Bloom { .. } => "bloom",
        }
    }

    /// Every target id this pass reads or writes.
    #[must_use]
    pub fn targets(&self) -> Vec<ResourceId> {
        match self {
            Self::Scene { color, depth } => vec![*color, *depth],
            Self::Bloom { mips, .. } => mips.clone(),
        }
    }
}

/// Flat particle tables, borrowed from the pool.
#[derive(Debug, Clone, Copy)]
pub struct ParticleView<'a> {
    pub geometry: ResourceId,
    pub material: ResourceId,
    pub positions: &'a [f32],
    pub colors: &'a [f32],
    pub sizes: &'a [f32],
}

impl ParticleView<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub view_projection: Mat4,
    pub camera_position: Vec3,
    pub lights: &'a [Light],
    pub fog: Fog,
    pub clear_color: [f32; 4],
    pub exposure: f32,
    pub tone_mapping: ToneMapping,
    pub cube_geometry: ResourceId,
    /// One material per instance, in the same order as `cubes`.
    pub cube_materials: &'a [ResourceId],
    pub cubes: &'a [CubeInstance],
    pub particles: ParticleView<'a>,
    pub passes: &'a [PassDesc],
}

impl Frame<'_> {
    /// Ids of every resource the frame references.
    pub fn referenced_resources(&self) -> impl Iterator<Item = ResourceId> + '_ {
        [
            self.cube_geometry,
            self.particles.geometry,
            self.particles.material,
        ]
        .into_iter()
        .chain(self.cube_materials.iter().copied())
        .chain(self.passes.iter().flat_map(PassDesc::targets))
    }
}
