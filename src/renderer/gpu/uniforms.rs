//! GPU-side data layouts. Every struct here mirrors a WGSL struct byte for byte.

use bytemuck::{Pod, Zeroable};

use crate::renderer::frame::Frame;
use crate::scene::{Light, LightKind};

pub const MAX_LIGHTS: usize = 8;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct GpuLight {
    /// Directional: direction toward the light. Point: position, range in `w`.
    pub position_range: [f32; 4],
    /// Linear radiance, kind in `w` (0 ambient, 1 directional, 2 point).
    pub color_kind: [f32; 4],
}

impl GpuLight {
    fn from_light(light: &Light) -> Self {
        let radiance = light.radiance();
        let (position_range, kind) = match light.kind {
            LightKind::Ambient => ([0.0; 4], 0.0),
            LightKind::Directional { position } => {
                let dir = position.normalize_or_zero();
                ([dir.x, dir.y, dir.z, 0.0], 1.0)
            }
            LightKind::Point { position, range } => ([position.x, position.y, position.z, range], 2.0),
        };
        Self {
            position_range,
            color_kind: [radiance.x, radiance.y, radiance.z, kind],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// Linear fog color, density in `w`.
    pub fog: [f32; 4],
    /// Physical viewport width and height in `xy`.
    pub viewport: [f32; 4],
    /// Point size, opacity, size attenuation flag.
    pub particle: [f32; 4],
    pub light_count: [u32; 4],
    pub lights: [GpuLight; MAX_LIGHTS],
}

impl FrameUniforms {
    pub fn new(frame: &Frame<'_>, viewport: (u32, u32), particle: [f32; 4]) -> Self {
        let mut lights = [GpuLight::default(); MAX_LIGHTS];
        let count = frame.lights.len().min(MAX_LIGHTS);
        for (slot, light) in lights.iter_mut().zip(frame.lights) {
            *slot = GpuLight::from_light(light);
        }
        let fog = frame.fog.linear_color();
        Self {
            view_proj: frame.view_projection.to_cols_array_2d(),
            camera_pos: frame.camera_position.extend(1.0).to_array(),
            fog: [fog.x, fog.y, fog.z, frame.fog.density],
            viewport: [viewport.0 as f32, viewport.1 as f32, 0.0, 0.0],
            particle,
            light_count: [count as u32, 0, 0, 0],
            lights,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct BloomUniforms {
    pub threshold: f32,
    pub knee: f32,
    pub radius: f32,
    pub strength: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct CompositeUniforms {
    pub exposure: f32,
    pub bloom_strength: f32,
    pub tone_mapping: u32,
    /// 1 when the surface format does not encode sRGB itself.
    pub encode_srgb: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// 24 vertices (flat normals per face) and 36 indices for a cube of edge `size`.
pub fn cube_mesh(size: f32) -> (Vec<CubeVertex>, Vec<u16>) {
    let h = size * 0.5;
    // (normal, u axis, v axis)
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (n, u, v) in faces {
        let base = vertices.len() as u16;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = [
                (n[0] + u[0] * su + v[0] * sv) * h,
                (n[1] + u[1] * su + v[1] * sv) * h,
                (n[2] + u[2] * su + v[2] * sv) * h,
            ];
            vertices.push(CubeVertex { position, normal: n });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}
