//! Engine Lifecycle Module
//!
//! This module contains [`Engine`], the owner of everything acquired while
//! the field is mounted. It has no windowing logic of its own; a [`Host`]
//! supplies the surface, events and refresh callbacks, so the same engine
//! runs headless in tests and inside a `winit` window.
//!
//! # Lifecycle
//!
//! ```text
//! Unmounted ──mount──▶ Initializing ──ok──▶ Running ──unmount──▶ Disposing ──▶ Unmounted
//!                           │                                        ▲
//!                           └──────────────── error ─────────────────┘
//! ```
//!
//! - **mount**: query the host surface, build the entity pool and render
//!   pipeline, attach the surface, register listeners, request the first frame
//! - **tick**: one simulation step plus one render per refresh callback
//! - **unmount**: cancel the pending frame, unregister, detach, release
//!
//! # Example
//!
//! ```rust,ignore
//! use cubefield::{Engine, FieldConfig, HeadlessDevice, HeadlessHost, Viewport};
//!
//! let mut host = HeadlessHost::new(Viewport::new(1280, 720, 1.0));
//! let mut engine = Engine::new(FieldConfig::ascent().with_seed(1), HeadlessDevice::new())?;
//! engine.mount(&mut host)?;
//! if let Some((handle, timestamp)) = host.take_frame() {
//!     engine.tick(&mut host, handle, timestamp);
//! }
//! engine.unmount(&mut host);
//! ```

use std::time::Duration;

use crate::animation::AnimationScheduler;
use crate::config::FieldConfig;
use crate::errors::Result;
use crate::host::{FrameHandle, Host, ListenerId, ListenerKind, Viewport};
use crate::interaction::{PointerState, hit_test, to_ndc};
use crate::math::FieldRng;
use crate::pool::EntityPool;
use crate::renderer::{RenderDevice, RenderPipeline};
use crate::utils::{FpsCounter, FrameClock};

pub use crate::utils::FrameState;

/// Where the engine is in its mount/unmount cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Unmounted,
    Initializing,
    Running,
    Disposing,
}

/// Result of a successful [`Engine::mount`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Mounted,
    /// The host had no surface; nothing was acquired.
    SurfaceUnavailable,
    /// The engine was not unmounted; nothing changed.
    AlreadyMounted,
}

/// Result of one refresh callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale or cancelled handle, or the engine is not running.
    Ignored,
    /// The field advanced one step. `rendered` is false if submission failed.
    Advanced { rendered: bool },
}

/// Observability counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineStats {
    pub state: LifecycleState,
    /// Ticks advanced since the engine was created.
    pub frame_count: u64,
    pub hovered: Option<usize>,
    pub live_resources: usize,
    pub recycled_total: u64,
    pub failed_frames: u64,
    pub fps: f32,
}

/// Everything that exists only while mounted.
struct Mounted {
    pool: EntityPool,
    pipeline: RenderPipeline,
    scheduler: AnimationScheduler,
    pointer: PointerState,
    rng: FieldRng,
    clock: FrameClock,
    fps: FpsCounter,
    listeners: Vec<ListenerId>,
    pending: Option<FrameHandle>,
}

/// Mount/unmount lifecycle and frame scheduling for one cube field.
///
/// The engine owns its [`RenderDevice`] and, while mounted, the entity pool
/// and render pipeline built on it. Every method takes `&mut self`, so event
/// handlers and refresh callbacks can never interleave.
///
/// Dropping a mounted engine releases its device resources; it cannot reach
/// the host from `Drop`, so call [`unmount`](Self::unmount) to also detach.
pub struct Engine<D: RenderDevice> {
    config: FieldConfig,
    device: D,
    state: LifecycleState,
    mounted: Option<Mounted>,

    frame_count: u64,
    recycled_total: u64,
    failed_frames: u64,
}

impl<D: RenderDevice> Engine<D> {
    /// Creates an unmounted engine. The configuration is validated here.
    pub fn new(config: FieldConfig, device: D) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            device,
            state: LifecycleState::Unmounted,
            mounted: None,
            frame_count: 0,
            recycled_total: 0,
            failed_frames: 0,
        })
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Builds the field and starts the frame loop.
    ///
    /// Without a host surface this is a no-op returning
    /// [`MountOutcome::SurfaceUnavailable`]. Any failure while initializing
    /// releases everything acquired so far and leaves the engine unmounted.
    pub fn mount(&mut self, host: &mut dyn Host) -> Result<MountOutcome> {
        if self.state != LifecycleState::Unmounted {
            log::debug!("mount ignored in state {:?}", self.state);
            return Ok(MountOutcome::AlreadyMounted);
        }

        let Some(viewport) = host.surface() else {
            log::warn!("No surface available, cube field not mounted");
            return Ok(MountOutcome::SurfaceUnavailable);
        };

        self.state = LifecycleState::Initializing;
        log::info!(
            "Mounting {} field: {} cubes, {} particles, {}x{}",
            self.config.profile().name(),
            self.config.cube_count,
            self.config.particle_count,
            viewport.width,
            viewport.height
        );

        match self.initialize(host, viewport) {
            Ok(mounted) => {
                self.mounted = Some(mounted);
                self.state = LifecycleState::Running;
                log::info!("Cube field running ({} resources)", self.device.live_resources());
                Ok(MountOutcome::Mounted)
            }
            Err(e) => {
                log::warn!("Cube field mount failed: {e}");
                self.state = LifecycleState::Unmounted;
                Err(e)
            }
        }
    }

    /// Acquires pool, pipeline and host hooks. On error whatever was acquired
    /// is released in the `Disposing` state before returning.
    fn initialize(&mut self, host: &mut dyn Host, viewport: Viewport) -> Result<Mounted> {
        let mut rng = FieldRng::from_seed_option(self.config.seed);

        let mut pool = EntityPool::build(&self.config, &mut rng, &mut self.device)?;

        let mut pipeline = match RenderPipeline::new(&self.config, viewport, &mut self.device) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                self.state = LifecycleState::Disposing;
                pool.dispose(&mut self.device);
                return Err(e);
            }
        };

        if let Err(e) = host.attach_surface() {
            self.state = LifecycleState::Disposing;
            pipeline.dispose(&mut self.device);
            pool.dispose(&mut self.device);
            return Err(e);
        }

        let listeners: Vec<ListenerId> = [
            ListenerKind::ViewportPointer,
            ListenerKind::SurfacePointer,
            ListenerKind::Resize,
        ]
        .into_iter()
        .map(|kind| host.add_listener(kind))
        .collect();

        let pending = Some(host.request_frame());

        Ok(Mounted {
            pool,
            pipeline,
            scheduler: AnimationScheduler::new(&self.config),
            pointer: PointerState::new(&self.config.camera),
            rng,
            clock: FrameClock::new(),
            fps: FpsCounter::new(),
            listeners,
            pending,
        })
    }

    /// Stops the frame loop and releases everything acquired at mount.
    ///
    /// The pending frame is cancelled before anything else. Returns `false`
    /// (and does nothing) if the engine was not mounted.
    pub fn unmount(&mut self, host: &mut dyn Host) -> bool {
        let Some(mut mounted) = self.mounted.take() else {
            return false;
        };
        self.state = LifecycleState::Disposing;

        if let Some(handle) = mounted.pending.take() {
            host.cancel_frame(handle);
        }
        for id in mounted.listeners.drain(..) {
            host.remove_listener(id);
        }
        host.detach_surface();

        let targets = mounted.pipeline.dispose(&mut self.device);
        let entities = mounted.pool.dispose(&mut self.device);

        self.state = LifecycleState::Unmounted;
        log::info!("Cube field unmounted ({} resources released)", targets + entities);
        true
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Handles one refresh callback.
    ///
    /// Only the handle of the currently pending request is honored. The
    /// field advances one step, renders, and requests the next frame. A
    /// failed submission is logged and the loop continues.
    pub fn tick(
        &mut self,
        host: &mut dyn Host,
        handle: FrameHandle,
        timestamp: Duration,
    ) -> TickOutcome {
        if self.state != LifecycleState::Running {
            return TickOutcome::Ignored;
        }
        let Some(m) = self.mounted.as_mut() else {
            return TickOutcome::Ignored;
        };
        if m.pending != Some(handle) {
            log::trace!("Ignoring stale frame {handle:?}");
            return TickOutcome::Ignored;
        }
        m.pending = None;

        let frame = m.clock.tick(timestamp);
        let report = m.scheduler.step(
            &frame,
            &mut m.pool,
            m.pipeline.camera_mut(),
            &m.pointer,
            &mut m.rng,
        );
        self.frame_count += 1;
        self.recycled_total += report.recycled as u64;

        let rendered = match m.pipeline.render(&mut self.device, &m.pool) {
            Ok(()) => true,
            Err(e) => {
                self.failed_frames += 1;
                log::warn!("Frame {} not rendered: {e}", frame.frame_count);
                false
            }
        };

        if let Some(fps) = m.fps.update(timestamp) {
            log::debug!("{fps:.1} fps");
        }

        m.pending = Some(host.request_frame());
        TickOutcome::Advanced { rendered }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Viewport-wide pointer movement, in logical pixels. Updates the
    /// camera parallax target.
    pub fn pointer_moved_viewport(&mut self, x: f32, y: f32) {
        let camera = self.config.camera;
        let Some(m) = self.running_mut() else {
            return;
        };
        let (w, h) = m.pipeline.size();
        if let Some(ndc) = to_ndc(x, y, w as f32, h as f32) {
            m.pointer.update_parallax(ndc, &camera);
        }
    }

    /// Pointer movement over the field surface, in logical pixels relative
    /// to its top-left corner. Returns the newly hovered cube.
    pub fn pointer_moved_surface(&mut self, x: f32, y: f32) -> Option<usize> {
        let cube_size = self.config.cube_size;
        let m = self.running_mut()?;
        let (w, h) = m.pipeline.size();
        let ndc = to_ndc(x, y, w as f32, h as f32)?;
        hit_test(&mut m.pool, m.pipeline.camera(), ndc, cube_size)
    }

    /// The surface changed size, in logical pixels.
    ///
    /// Returns `Ok(false)` when nothing changed (zero size, not running).
    /// On error the previous size stays in effect.
    pub fn resized(&mut self, width: u32, height: u32) -> Result<bool> {
        if self.state != LifecycleState::Running {
            return Ok(false);
        }
        let Some(m) = self.mounted.as_mut() else {
            return Ok(false);
        };
        m.pipeline.resize(&mut self.device, width, height)
    }

    fn running_mut(&mut self) -> Option<&mut Mounted> {
        if self.state == LifecycleState::Running {
            self.mounted.as_mut()
        } else {
            None
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    #[must_use]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[must_use]
    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    #[must_use]
    pub fn pool(&self) -> Option<&EntityPool> {
        self.mounted.as_ref().map(|m| &m.pool)
    }

    pub fn pool_mut(&mut self) -> Option<&mut EntityPool> {
        self.mounted.as_mut().map(|m| &mut m.pool)
    }

    #[must_use]
    pub fn pipeline(&self) -> Option<&RenderPipeline> {
        self.mounted.as_ref().map(|m| &m.pipeline)
    }

    #[must_use]
    pub fn pointer(&self) -> Option<&PointerState> {
        self.mounted.as_ref().map(|m| &m.pointer)
    }

    /// The frame request this engine is waiting on.
    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.mounted.as_ref().and_then(|m| m.pending)
    }

    #[must_use]
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            state: self.state,
            frame_count: self.frame_count,
            hovered: self.pool().and_then(EntityPool::hovered_index),
            live_resources: self.device.live_resources(),
            recycled_total: self.recycled_total,
            failed_frames: self.failed_frames,
            fps: self.mounted.as_ref().map_or(0.0, |m| m.fps.current_fps),
        }
    }
}

impl<D: RenderDevice> Drop for Engine<D> {
    fn drop(&mut self) {
        if let Some(mut mounted) = self.mounted.take() {
            let released =
                mounted.pipeline.dispose(&mut self.device) + mounted.pool.dispose(&mut self.device);
            log::debug!("Engine dropped while mounted, released {released} resources");
        }
    }
}
