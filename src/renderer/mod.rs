//! Rendering Module
//!
//! Everything between the entity pool and pixels:
//!
//! - [`device`]: the [`RenderDevice`] trait and resource descriptors
//! - [`tracked`]: [`ResourceScope`], all-or-nothing resource acquisition
//! - [`headless`]: [`HeadlessDevice`], a bookkeeping-only device
//! - [`frame`]: the per-frame snapshot handed to a device
//! - [`passes`]: the scene and bloom passes and the targets they own
//! - [`pipeline`]: [`RenderPipeline`], camera + lights + pass chain
//! - [`settings`]: bloom, tone mapping, fog and output settings
//! - `gpu` (feature `gpu`): [`WgpuDevice`], the real `wgpu` renderer

pub mod device;
pub mod frame;
pub mod headless;
pub mod passes;
pub mod pipeline;
pub mod settings;
pub mod tracked;

#[cfg(feature = "gpu")]
pub mod gpu;

pub use device::{
    Blending, GeometryDesc, MaterialDesc, RenderDevice, RenderTargetDesc, ResourceId,
    ResourceKind, TargetFormat,
};
pub use frame::{CubeInstance, Frame, ParticleView, PassDesc};
pub use headless::{FrameSummary, HeadlessDevice};
pub use pipeline::RenderPipeline;
pub use settings::{BloomSettings, RenderSettings, ToneMapping};
pub use tracked::ResourceScope;

#[cfg(feature = "gpu")]
pub use gpu::WgpuDevice;
