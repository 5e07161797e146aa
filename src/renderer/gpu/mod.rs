//! wgpu Render Device
//!
//! [`WgpuDevice`] is the on-screen [`RenderDevice`]. Each [`ResourceId`] maps
//! to real GPU memory: vertex/index buffers for geometry, HDR and depth
//! textures for render targets. Materials stay CPU-side since every cube
//! instance already carries its own colors.
//!
//! A submitted frame runs as one command buffer:
//!
//! 1. scene pass: clear, cubes (alpha blended), particles (additive)
//! 2. bloom: prefilter into mip 0, downsample the chain, upsample back additively
//! 3. composite: tone map scene + bloom onto the surface

mod context;
mod pipelines;
mod uniforms;

use slotmap::SlotMap;
use wgpu::util::DeviceExt;

use crate::errors::{FieldError, Result};
use crate::renderer::device::{
    GeometryDesc, MaterialDesc, RenderDevice, RenderTargetDesc, ResourceId, TargetFormat,
};
use crate::renderer::frame::{CubeInstance, Frame, PassDesc};

pub use context::GpuContext;
pub use pipelines::{DEPTH_FORMAT, HDR_FORMAT, Pipelines};
pub use uniforms::{
    BloomUniforms, CompositeUniforms, CubeVertex, FrameUniforms, GpuLight, MAX_LIGHTS, cube_mesh,
};

enum GpuGeometry {
    Cube {
        vertex_buffer: wgpu::Buffer,
        index_buffer: wgpu::Buffer,
        index_count: u32,
    },
    Points {
        capacity: usize,
        positions: wgpu::Buffer,
        colors: wgpu::Buffer,
        sizes: wgpu::Buffer,
    },
}

struct GpuTarget {
    // 持有 texture，view 依赖它
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

enum GpuResource {
    Geometry(GpuGeometry),
    Material(MaterialDesc),
    Target(GpuTarget),
}

/// The on-screen render device.
pub struct WgpuDevice {
    context: GpuContext,
    pipelines: Pipelines,
    resources: SlotMap<ResourceId, GpuResource>,

    frame_buffer: wgpu::Buffer,
    bloom_buffer: wgpu::Buffer,
    composite_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
}

impl WgpuDevice {
    pub async fn new<W>(window: W, width: u32, height: u32) -> Result<Self>
    where
        W: wgpu::WindowHandle + wgpu::rwh::HasDisplayHandle + 'static,
    {
        let context = GpuContext::new(window, width, height).await?;
        let pipelines = Pipelines::new(&context.device, context.color_format());
        let device = &context.device;

        let frame_buffer = uniform_buffer(device, "Frame Uniforms", size_of::<FrameUniforms>());
        let bloom_buffer = uniform_buffer(device, "Bloom Uniforms", size_of::<BloomUniforms>());
        let composite_buffer =
            uniform_buffer(device, "Composite Uniforms", size_of::<CompositeUniforms>());

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &pipelines.frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let instance_capacity = 64;
        let instance_buffer = instance_buffer(device, instance_capacity);

        Ok(Self {
            context,
            pipelines,
            resources: SlotMap::with_key(),
            frame_buffer,
            bloom_buffer,
            composite_buffer,
            frame_bind_group,
            instance_buffer,
            instance_capacity,
        })
    }

    #[must_use]
    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    fn target_view(&self, id: ResourceId) -> Result<&wgpu::TextureView> {
        match self.resources.get(id) {
            Some(GpuResource::Target(target)) => Ok(&target.view),
            _ => Err(FieldError::UnknownResource(format!("render target {id:?}"))),
        }
    }

    fn geometry(&self, id: ResourceId) -> Result<&GpuGeometry> {
        match self.resources.get(id) {
            Some(GpuResource::Geometry(geometry)) => Ok(geometry),
            _ => Err(FieldError::UnknownResource(format!("geometry {id:?}"))),
        }
    }

    fn ensure_instance_capacity(&mut self, count: usize) {
        if count <= self.instance_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        log::debug!("Growing cube instance buffer: {} -> {capacity}", self.instance_capacity);
        self.instance_buffer = instance_buffer(&self.context.device, capacity);
        self.instance_capacity = capacity;
    }

    fn particle_uniform(&self, frame: &Frame<'_>) -> [f32; 4] {
        match self.resources.get(frame.particles.material) {
            Some(GpuResource::Material(MaterialDesc::Points {
                size,
                opacity,
                size_attenuation,
                ..
            })) => [*size, *opacity, if *size_attenuation { 1.0 } else { 0.0 }, 0.0],
            _ => [1.0, 1.0, 1.0, 0.0],
        }
    }

    fn bloom_bind_group(&self, source: &wgpu::TextureView, label: &str) -> wgpu::BindGroup {
        self.context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.pipelines.bloom_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.pipelines.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.bloom_buffer.as_entire_binding(),
                },
            ],
        })
    }

    fn write_particles(&self, frame: &Frame<'_>) -> Result<u32> {
        let GpuGeometry::Points {
            capacity,
            positions,
            colors,
            sizes,
        } = self.geometry(frame.particles.geometry)?
        else {
            return Err(FieldError::UnknownResource("particle geometry".to_string()));
        };
        let count = frame.particles.len().min(*capacity);
        if count > 0 {
            let queue = &self.context.queue;
            let particles = &frame.particles;
            queue.write_buffer(positions, 0, bytemuck::cast_slice(&particles.positions[..count * 3]));
            queue.write_buffer(colors, 0, bytemuck::cast_slice(&particles.colors[..count * 3]));
            queue.write_buffer(sizes, 0, bytemuck::cast_slice(&particles.sizes[..count]));
        }
        Ok(count as u32)
    }

    fn encode_scene(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        frame: &Frame<'_>,
        color: ResourceId,
        depth: ResourceId,
        particle_count: u32,
    ) -> Result<()> {
        let color_view = self.target_view(color)?;
        let depth_view = self.target_view(depth)?;
        let cube = self.geometry(frame.cube_geometry)?;
        let points = self.geometry(frame.particles.geometry)?;

        let [r, g, b, a] = frame.clear_color;
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(r),
                        g: f64::from(g),
                        b: f64::from(b),
                        a: f64::from(a),
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        pass.set_bind_group(0, &self.frame_bind_group, &[]);

        if let GpuGeometry::Cube {
            vertex_buffer,
            index_buffer,
            index_count,
        } = cube
            && !frame.cubes.is_empty()
        {
            pass.set_pipeline(&self.pipelines.cubes);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..*index_count, 0, 0..frame.cubes.len() as u32);
        }

        if let GpuGeometry::Points {
            positions,
            colors,
            sizes,
            ..
        } = points
            && particle_count > 0
        {
            pass.set_pipeline(&self.pipelines.particles);
            pass.set_vertex_buffer(0, positions.slice(..));
            pass.set_vertex_buffer(1, colors.slice(..));
            pass.set_vertex_buffer(2, sizes.slice(..));
            pass.draw(0..6, 0..particle_count);
        }
        Ok(())
    }

    fn encode_bloom(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        scene_color: ResourceId,
        mips: &[ResourceId],
    ) -> Result<()> {
        let scene_view = self.target_view(scene_color)?;
        let views = mips
            .iter()
            .map(|id| self.target_view(*id))
            .collect::<Result<Vec<_>>>()?;
        let Some(first) = views.first() else {
            return Ok(());
        };

        // Prefilter + downsample chain
        let bind_group = self.bloom_bind_group(scene_view, "Bloom Prefilter");
        fullscreen(
            encoder,
            "Bloom Prefilter",
            first,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
            &self.pipelines.bloom_prefilter,
            &bind_group,
        );
        for (i, pair) in views.windows(2).enumerate() {
            let bind_group = self.bloom_bind_group(pair[0], "Bloom Downsample");
            log::trace!("bloom downsample {i} -> {}", i + 1);
            fullscreen(
                encoder,
                "Bloom Downsample",
                pair[1],
                wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                &self.pipelines.bloom_downsample,
                &bind_group,
            );
        }

        // Upsample from coarsest to finest, accumulating into the finer level.
        for pair in views.windows(2).rev() {
            let bind_group = self.bloom_bind_group(pair[1], "Bloom Upsample");
            fullscreen(
                encoder,
                "Bloom Upsample",
                pair[0],
                wgpu::LoadOp::Load,
                &self.pipelines.bloom_upsample,
                &bind_group,
            );
        }
        Ok(())
    }

    fn encode_composite(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        scene_color: ResourceId,
        bloom: Option<ResourceId>,
    ) -> Result<()> {
        let scene_view = self.target_view(scene_color)?;
        // Without bloom the scene doubles as the glow input at zero strength.
        let bloom_view = match bloom {
            Some(id) => self.target_view(id)?,
            None => scene_view,
        };

        let bind_group = self.context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Composite Bind Group"),
            layout: &self.pipelines.composite_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(scene_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(bloom_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.pipelines.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: self.composite_buffer.as_entire_binding(),
                },
            ],
        });

        fullscreen(
            encoder,
            "Composite",
            target,
            wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
            &self.pipelines.composite,
            &bind_group,
        );
        Ok(())
    }
}

impl RenderDevice for WgpuDevice {
    fn create_geometry(&mut self, desc: &GeometryDesc) -> Result<ResourceId> {
        let device = &self.context.device;
        let geometry = match *desc {
            GeometryDesc::Cube { size } => {
                let (vertices, indices) = cube_mesh(size);
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Cube Vertices"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Cube Indices"),
                    contents: bytemuck::cast_slice(&indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                GpuGeometry::Cube {
                    vertex_buffer,
                    index_buffer,
                    index_count: indices.len() as u32,
                }
            }
            GeometryDesc::Points { count } => {
                let capacity = count.max(1);
                let stream = |label: &str, components: usize| {
                    device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some(label),
                        size: (capacity * components * size_of::<f32>()) as u64,
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    })
                };
                GpuGeometry::Points {
                    capacity: count,
                    positions: stream("Particle Positions", 3),
                    colors: stream("Particle Colors", 3),
                    sizes: stream("Particle Sizes", 1),
                }
            }
        };
        log::debug!("Created {}", desc.label());
        Ok(self.resources.insert(GpuResource::Geometry(geometry)))
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> Result<ResourceId> {
        Ok(self.resources.insert(GpuResource::Material(desc.clone())))
    }

    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<ResourceId> {
        let (format, usage) = match desc.format {
            TargetFormat::HdrColor => (
                HDR_FORMAT,
                wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            ),
            TargetFormat::Depth => (DEPTH_FORMAT, wgpu::TextureUsages::RENDER_ATTACHMENT),
        };
        let texture = self.context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&desc.label),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("Created render target '{}' {}x{}", desc.label, desc.width, desc.height);
        Ok(self.resources.insert(GpuResource::Target(GpuTarget {
            _texture: texture,
            view,
        })))
    }

    fn release(&mut self, id: ResourceId) -> bool {
        // wgpu frees the memory once the last handle drops
        self.resources.remove(id).is_some()
    }

    fn is_live(&self, id: ResourceId) -> bool {
        self.resources.contains_key(id)
    }

    fn live_resources(&self) -> usize {
        self.resources.len()
    }

    fn configure_surface(&mut self, width: u32, height: u32) -> Result<()> {
        self.context.resize(width, height);
        Ok(())
    }

    fn surface_size(&self) -> (u32, u32) {
        self.context.size()
    }

    fn submit(&mut self, frame: &Frame<'_>) -> Result<()> {
        let mut scene = None;
        let mut bloom = None;
        for pass in frame.passes {
            match pass {
                PassDesc::Scene { color, depth } => scene = Some((*color, *depth)),
                PassDesc::Bloom { mips, settings } => bloom = Some((mips.as_slice(), *settings)),
            }
        }
        let Some((scene_color, scene_depth)) = scene else {
            return Err(FieldError::UnknownResource("scene pass targets".to_string()));
        };

        let output = match self.context.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(output) => output,
            wgpu::CurrentSurfaceTexture::Suboptimal(output) => {
                // Present this frame; the next one picks up the new configuration.
                self.context.reconfigure();
                output
            }
            wgpu::CurrentSurfaceTexture::Outdated | wgpu::CurrentSurfaceTexture::Lost => {
                self.context.reconfigure();
                return Err(FieldError::SurfaceError("surface lost, reconfigured".to_string()));
            }
            wgpu::CurrentSurfaceTexture::Timeout | wgpu::CurrentSurfaceTexture::Occluded => {
                return Err(FieldError::SurfaceError("frame skipped".to_string()));
            }
            wgpu::CurrentSurfaceTexture::Validation => {
                return Err(FieldError::SurfaceError(
                    "validation error acquiring surface texture".to_string(),
                ));
            }
        };
        let surface_view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Uniforms
        let particle = self.particle_uniform(frame);
        let frame_uniforms = FrameUniforms::new(frame, self.context.size(), particle);
        let queue = &self.context.queue;
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame_uniforms));

        let bloom_strength = bloom.map_or(0.0, |(_, s)| s.strength);
        if let Some((_, settings)) = bloom {
            let bloom_uniforms = BloomUniforms {
                threshold: settings.threshold,
                // 软阈值宽度
                knee: settings.threshold * 0.5,
                radius: settings.radius,
                strength: settings.strength,
            };
            queue.write_buffer(&self.bloom_buffer, 0, bytemuck::bytes_of(&bloom_uniforms));
        }
        let composite_uniforms = CompositeUniforms {
            exposure: frame.exposure,
            bloom_strength,
            tone_mapping: frame.tone_mapping.shader_mode(),
            encode_srgb: u32::from(!self.context.color_format().is_srgb()),
        };
        queue.write_buffer(&self.composite_buffer, 0, bytemuck::bytes_of(&composite_uniforms));

        // Instances
        self.ensure_instance_capacity(frame.cubes.len());
        if !frame.cubes.is_empty() {
            self.context.queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice::<CubeInstance, u8>(frame.cubes),
            );
        }
        let particle_count = self.write_particles(frame)?;

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Field Frame Encoder"),
            });

        self.encode_scene(&mut encoder, frame, scene_color, scene_depth, particle_count)?;

        let mut bloom_output = None;
        if let Some((mips, _)) = bloom {
            self.encode_bloom(&mut encoder, scene_color, mips)?;
            bloom_output = mips.first().copied();
        }

        self.encode_composite(&mut encoder, &surface_view, scene_color, bloom_output)?;

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn uniform_buffer(device: &wgpu::Device, label: &str, size: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: size as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Cube Instances"),
        size: (capacity * size_of::<CubeInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn fullscreen(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    load: wgpu::LoadOp<wgpu::Color>,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        ..Default::default()
    });
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.draw(0..3, 0..1);
}
