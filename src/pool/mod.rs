//! Entity Pool
//!
//! Owns every cube and particle record together with the device resources
//! they render with:
//!
//! - one shared cube geometry
//! - one template material per palette entry
//! - one cloned material per cube, so opacity and emissive animate independently
//! - the particle geometry and its additive point material
//!
//! Cubes live in a flat `Vec` addressed by index. The pool is built once at
//! mount, fully populated before the first tick, and disposed at unmount.

mod cube;
mod particles;

pub use cube::{CubeEntity, CubeMotion};
pub use particles::ParticleTable;

pub(crate) use cube::sample_ticks;

use crate::config::{FieldConfig, PaletteEntry};
use crate::errors::Result;
use crate::math::FieldRng;
use crate::renderer::device::{Blending, GeometryDesc, MaterialDesc, RenderDevice, ResourceId};
use crate::renderer::tracked::ResourceScope;

#[derive(Debug, Clone)]
struct PoolResources {
    cube_geometry: ResourceId,
    templates: Vec<ResourceId>,
    particle_geometry: ResourceId,
    particle_material: ResourceId,
    /// Every id above plus the per-cube clones, in acquisition order.
    owned: Vec<ResourceId>,
}

#[derive(Debug)]
pub struct EntityPool {
    cubes: Vec<CubeEntity>,
    particles: ParticleTable,
    resources: Option<PoolResources>,
}

impl EntityPool {
    /// Creates all entities and their resources.
    ///
    /// Either everything is acquired or nothing is: on the first failed
    /// allocation every resource created so far is released before the
    /// error is returned.
    pub fn build(
        config: &FieldConfig,
        rng: &mut FieldRng,
        device: &mut dyn RenderDevice,
    ) -> Result<Self> {
        let mut scope = ResourceScope::new(device);

        let cube_geometry = scope.create_geometry(&GeometryDesc::Cube {
            size: config.cube_size,
        })?;

        let template_descs: Vec<MaterialDesc> = config
            .palette
            .iter()
            .map(|entry| cube_material_desc(config, entry))
            .collect();
        let mut templates = Vec::with_capacity(template_descs.len());
        for desc in &template_descs {
            templates.push(scope.create_material(desc)?);
        }

        let mut cubes = Vec::with_capacity(config.cube_count);
        for id in 0..config.cube_count {
            let palette_index = rng.index(config.palette.len());
            let material = scope.create_material(&template_descs[palette_index])?;
            cubes.push(CubeEntity::spawn(id, config, palette_index, material, rng));
        }

        let particles =
            ParticleTable::new(config.particle_count, &config.particles, &config.palette, rng);
        let particle_geometry = scope.create_geometry(&GeometryDesc::Points {
            count: particles.len(),
        })?;
        let particle_material = scope.create_material(&MaterialDesc::Points {
            size: config.particles.point_size,
            opacity: config.particles.opacity,
            blending: Blending::Additive,
            size_attenuation: true,
            vertex_colors: true,
        })?;

        let owned = scope.commit();
        log::info!(
            "Entity pool built: {} cubes, {} particles, {} resources",
            cubes.len(),
            particles.len(),
            owned.len()
        );

        Ok(Self {
            cubes,
            particles,
            resources: Some(PoolResources {
                cube_geometry,
                templates,
                particle_geometry,
                particle_material,
                owned,
            }),
        })
    }

    /// Releases every owned resource. Returns how many were released; a
    /// second call releases nothing.
    pub fn dispose(&mut self, device: &mut dyn RenderDevice) -> usize {
        let Some(resources) = self.resources.take() else {
            return 0;
        };
        let released = resources
            .owned
            .iter()
            .rev()
            .filter(|id| device.release(**id))
            .count();
        log::debug!("Entity pool disposed ({released} resources)");
        released
    }

    #[inline]
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.resources.is_none()
    }

    /// Number of device resources still owned.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.as_ref().map_or(0, |r| r.owned.len())
    }

    #[must_use]
    pub fn cube_geometry(&self) -> Option<ResourceId> {
        self.resources.as_ref().map(|r| r.cube_geometry)
    }

    #[must_use]
    pub fn template_materials(&self) -> &[ResourceId] {
        self.resources.as_ref().map_or(&[][..], |r| r.templates.as_slice())
    }

    #[must_use]
    pub fn particle_geometry(&self) -> Option<ResourceId> {
        self.resources.as_ref().map(|r| r.particle_geometry)
    }

    #[must_use]
    pub fn particle_material(&self) -> Option<ResourceId> {
        self.resources.as_ref().map(|r| r.particle_material)
    }

    // ========================================================================
    // Entity access
    // ========================================================================

    #[must_use]
    pub fn cubes(&self) -> &[CubeEntity] {
        &self.cubes
    }

    pub fn cubes_mut(&mut self) -> &mut [CubeEntity] {
        &mut self.cubes
    }

    #[must_use]
    pub fn cube(&self, index: usize) -> Option<&CubeEntity> {
        self.cubes.get(index)
    }

    pub fn cube_mut(&mut self, index: usize) -> Option<&mut CubeEntity> {
        self.cubes.get_mut(index)
    }

    #[must_use]
    pub fn particles(&self) -> &ParticleTable {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleTable {
        &mut self.particles
    }

    // ========================================================================
    // Hover
    // ========================================================================

    #[must_use]
    pub fn hovered_index(&self) -> Option<usize> {
        self.cubes.iter().position(|c| c.hovered)
    }

    #[must_use]
    pub fn hovered_count(&self) -> usize {
        self.cubes.iter().filter(|c| c.hovered).count()
    }

    pub fn clear_hover(&mut self) {
        for cube in &mut self.cubes {
            cube.hovered = false;
        }
    }

    /// Makes `index` the only hovered cube, or clears hover for `None`.
    pub fn set_hovered(&mut self, index: Option<usize>) {
        self.clear_hover();
        if let Some(cube) = index.and_then(|i| self.cubes.get_mut(i)) {
            cube.hovered = true;
        }
    }
}

fn cube_material_desc(config: &FieldConfig, entry: &PaletteEntry) -> MaterialDesc {
    MaterialDesc::Standard {
        color: entry.linear_color(),
        emissive: entry.linear_emissive(),
        emissive_intensity: config.material.emissive_intensity,
        metalness: config.material.metalness,
        roughness: config.material.roughness,
        opacity: config.material.opacity,
        transparent: true,
    }
}
