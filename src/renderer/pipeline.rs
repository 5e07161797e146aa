//! Render Pipeline
//!
//! Holds the camera, the static light rig, fog and the ordered pass chain
//! (scene → bloom), and turns the entity pool into a [`Frame`] for the
//! device every tick.
//!
//! Sizes come in two flavors: the *logical* size reported by the host and
//! the *physical* size (logical × capped pixel ratio) used for the surface
//! and every render target.

use crate::config::FieldConfig;
use crate::errors::Result;
use crate::host::Viewport;
use crate::pool::EntityPool;
use crate::renderer::device::{RenderDevice, ResourceId};
use crate::renderer::frame::{CubeInstance, Frame, ParticleView, PassDesc};
use crate::renderer::passes::{BloomPass, RenderPass, ScenePass};
use crate::renderer::settings::RenderSettings;
use crate::renderer::tracked::ResourceScope;
use crate::scene::{Camera, Light};

pub struct RenderPipeline {
    camera: Camera,
    lights: Vec<Light>,
    settings: RenderSettings,
    metalness: f32,
    roughness: f32,
    passes: Vec<Box<dyn RenderPass>>,

    size: (u32, u32),
    pixel_ratio: f32,

    // 每帧复用的 scratch buffer
    instances: Vec<CubeInstance>,
    materials: Vec<ResourceId>,

    disposed: bool,
}

impl RenderPipeline {
    /// Builds the camera and pass chain and allocates every pass target.
    ///
    /// Allocation is atomic: if any target cannot be created, the ones
    /// already created are released and the error is returned.
    pub fn new(
        config: &FieldConfig,
        viewport: Viewport,
        device: &mut dyn RenderDevice,
    ) -> Result<Self> {
        let settings = config.render.clone();
        let pixel_ratio = viewport.pixel_ratio.min(settings.max_pixel_ratio).max(f32::EPSILON);
        let size = (viewport.width.max(1), viewport.height.max(1));

        let camera = Camera::from_settings(&config.camera, size.0 as f32 / size.1 as f32);
        let passes: Vec<Box<dyn RenderPass>> = vec![
            Box::new(ScenePass::new()),
            Box::new(BloomPass::new(settings.bloom)),
        ];

        let mut pipeline = Self {
            camera,
            lights: config.lights.clone(),
            passes,
            settings,
            metalness: config.material.metalness,
            roughness: config.material.roughness,
            size,
            pixel_ratio,
            instances: Vec::with_capacity(config.cube_count),
            materials: Vec::with_capacity(config.cube_count),
            disposed: false,
        };

        let (pw, ph) = pipeline.physical_size();
        let allocated = pipeline.allocate_targets(device, pw, ph)?;
        for (pass, targets) in pipeline.passes.iter_mut().zip(allocated) {
            pass.install_targets(targets);
        }

        log::info!(
            "Render pipeline ready: {}x{} @ {:.2}x, passes [{}]",
            size.0,
            size.1,
            pixel_ratio,
            pipeline.pass_names().join(", ")
        );
        Ok(pipeline)
    }

    /// Allocates every pass target for `width` × `height` and configures the
    /// surface, all or nothing. Returns the new targets grouped per pass.
    fn allocate_targets(
        &self,
        device: &mut dyn RenderDevice,
        width: u32,
        height: u32,
    ) -> Result<Vec<Vec<ResourceId>>> {
        let mut scope = ResourceScope::new(device);
        let mut grouped = Vec::with_capacity(self.passes.len());
        for pass in &self.passes {
            let mut ids = Vec::new();
            for desc in pass.target_descs(width, height) {
                ids.push(scope.create_render_target(&desc)?);
            }
            grouped.push(ids);
        }
        scope.device().configure_surface(width, height)?;
        scope.commit();
        Ok(grouped)
    }

    /// Applies a new logical size.
    ///
    /// Camera aspect, surface size and pass targets change together or not
    /// at all. A zero dimension is ignored and reported as `Ok(false)`.
    pub fn resize(
        &mut self,
        device: &mut dyn RenderDevice,
        width: u32,
        height: u32,
    ) -> Result<bool> {
        if self.disposed || width == 0 || height == 0 {
            return Ok(false);
        }

        let (pw, ph) = physical(width, height, self.pixel_ratio);
        let allocated = self.allocate_targets(device, pw, ph)?;

        self.size = (width, height);
        self.camera.set_aspect(width as f32 / height as f32);
        for (pass, targets) in self.passes.iter_mut().zip(allocated) {
            for old in pass.install_targets(targets) {
                device.release(old);
            }
        }

        log::debug!("Pipeline resized to {width}x{height} ({pw}x{ph} physical)");
        Ok(true)
    }

    /// Extracts a frame from the pool and submits it.
    ///
    /// Does nothing once disposed or when the pool has no resources.
    pub fn render(&mut self, device: &mut dyn RenderDevice, pool: &EntityPool) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        let (Some(cube_geometry), Some(particle_geometry), Some(particle_material)) = (
            pool.cube_geometry(),
            pool.particle_geometry(),
            pool.particle_material(),
        ) else {
            return Ok(());
        };

        self.instances.clear();
        self.materials.clear();
        for cube in pool.cubes() {
            self.instances.push(cube.instance(self.metalness, self.roughness));
            self.materials.push(cube.material);
        }

        let passes: Vec<PassDesc> = self.passes.iter().filter_map(|p| p.describe()).collect();
        let particles = pool.particles();

        let frame = Frame {
            view_projection: self.camera.view_projection_matrix(),
            camera_position: self.camera.position(),
            lights: &self.lights,
            fog: self.settings.fog,
            clear_color: self.settings.clear_color,
            exposure: self.settings.exposure,
            tone_mapping: self.settings.tone_mapping,
            cube_geometry,
            cube_materials: &self.materials,
            cubes: &self.instances,
            particles: ParticleView {
                geometry: particle_geometry,
                material: particle_material,
                positions: particles.positions(),
                colors: particles.colors(),
                sizes: particles.sizes(),
            },
            passes: &passes,
        };

        device.submit(&frame)
    }

    /// Releases every pass-owned target. Idempotent.
    pub fn dispose(&mut self, device: &mut dyn RenderDevice) -> usize {
        if self.disposed {
            return 0;
        }
        self.disposed = true;
        let released = self
            .passes
            .iter_mut()
            .flat_map(|pass| pass.take_targets())
            .filter(|id| device.release(*id))
            .count();
        log::debug!("Render pipeline disposed ({released} targets)");
        released
    }

    #[inline]
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Logical output size.
    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Surface and target size in physical pixels.
    #[must_use]
    pub fn physical_size(&self) -> (u32, u32) {
        physical(self.size.0, self.size.1, self.pixel_ratio)
    }

    #[inline]
    #[must_use]
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    #[inline]
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[must_use]
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    #[must_use]
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    #[must_use]
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Number of render targets currently owned by the pass chain.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.passes.iter().map(|p| p.targets().len()).sum()
    }
}

fn physical(width: u32, height: u32, ratio: f32) -> (u32, u32) {
    (
        ((width as f32 * ratio).round() as u32).max(1),
        ((height as f32 * ratio).round() as u32).max(1),
    )
}
