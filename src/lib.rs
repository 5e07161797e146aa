#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Cubefield
//!
//! A continuously animated field of glowing cubes and drifting particles,
//! meant to sit behind page content as an interactive background. Cubes
//! highlight under the pointer and the camera follows the pointer with a
//! gentle parallax.
//!
//! # Module Structure
//!
//! - [`config`]: Field configuration, profile presets, JSON loading
//! - [`pool`]: Cube and particle records plus the resources they own
//! - [`animation`]: The per-frame simulation step
//! - [`interaction`]: Pointer hit-testing and camera parallax
//! - [`renderer`]: Render devices, pass chain and frame extraction
//! - [`host`]: The environment the field is mounted into
//! - [`engine`]: Mount/unmount lifecycle and frame scheduling
//!
//! # Example
//!
//! ```rust,ignore
//! use cubefield::{Engine, FieldConfig, HeadlessDevice, HeadlessHost, Viewport};
//!
//! let mut host = HeadlessHost::new(Viewport::new(1280, 720, 1.0));
//! let mut engine = Engine::new(FieldConfig::ascent(), HeadlessDevice::new())?;
//! engine.mount(&mut host)?;
//! cubefield::host::drive(&mut engine, &mut host, 120);
//! engine.unmount(&mut host);
//! ```

pub mod animation;
pub mod config;
pub mod engine;
pub mod errors;
pub mod host;
pub mod interaction;
pub mod math;
pub mod pool;
pub mod renderer;
pub mod scene;
pub mod utils;

#[cfg(feature = "winit")]
pub mod app;

pub use config::{FieldConfig, MotionProfile, Profile};
pub use engine::{Engine, EngineStats, FrameState, LifecycleState, MountOutcome, TickOutcome};
pub use errors::{FieldError, Result};
pub use host::{HeadlessHost, Host, Viewport};
pub use pool::{CubeEntity, EntityPool, ParticleTable};
pub use renderer::{HeadlessDevice, RenderDevice, RenderPipeline};
pub use scene::{Camera, Fog, Light};
