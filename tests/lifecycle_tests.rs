//! Engine Lifecycle Tests
//!
//! Tests for:
//! - Mount / unmount symmetry (resources, listeners, surface, frame requests)
//! - No-surface and double-mount no-ops
//! - Rollback when initialization fails part way
//! - Frame loop: stale handles, failed submissions, drive helper
//! - Input routing (parallax, hover) and resize
//! - Seeded determinism

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use cubefield::host::{FrameHandle, ListenerKind, drive};
use cubefield::renderer::{Frame, GeometryDesc, MaterialDesc, RenderTargetDesc, ResourceId};
use cubefield::{
    Engine, FieldConfig, FieldError, HeadlessDevice, HeadlessHost, LifecycleState, MountOutcome,
    RenderDevice, Result, TickOutcome, Viewport,
};

fn host() -> HeadlessHost {
    HeadlessHost::new(Viewport::new(1280, 720, 1.0))
}

fn engine(config: FieldConfig) -> Engine<HeadlessDevice> {
    Engine::new(config, HeadlessDevice::new()).expect("valid config")
}

fn mounted() -> (Engine<HeadlessDevice>, HeadlessHost) {
    let mut host = host();
    let mut engine = engine(FieldConfig::ascent().with_seed(1));
    assert_eq!(engine.mount(&mut host).expect("mount"), MountOutcome::Mounted);
    (engine, host)
}

/// Forwards to a [`HeadlessDevice`] and publishes its live count, so the
/// count stays observable after the engine (and the device) are dropped.
struct ObservedDevice {
    inner: HeadlessDevice,
    live: Rc<Cell<usize>>,
}

impl ObservedDevice {
    fn sync(&self) {
        self.live.set(self.inner.live_resources());
    }
}

impl RenderDevice for ObservedDevice {
    fn create_geometry(&mut self, desc: &GeometryDesc) -> Result<ResourceId> {
        let id = self.inner.create_geometry(desc);
        self.sync();
        id
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> Result<ResourceId> {
        let id = self.inner.create_material(desc);
        self.sync();
        id
    }

    fn create_render_target(&mut self, desc: &RenderTargetDesc) -> Result<ResourceId> {
        let id = self.inner.create_render_target(desc);
        self.sync();
        id
    }

    fn release(&mut self, id: ResourceId) -> bool {
        let released = self.inner.release(id);
        self.sync();
        released
    }

    fn is_live(&self, id: ResourceId) -> bool {
        self.inner.is_live(id)
    }

    fn live_resources(&self) -> usize {
        self.inner.live_resources()
    }

    fn configure_surface(&mut self, width: u32, height: u32) -> Result<()> {
        self.inner.configure_surface(width, height)
    }

    fn surface_size(&self) -> (u32, u32) {
        self.inner.surface_size()
    }

    fn submit(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.inner.submit(frame)
    }
}

// ============================================================================
// Mount / unmount
// ============================================================================

#[test]
fn mount_acquires_everything() {
    let (engine, host) = mounted();
    let config = engine.config();

    assert_eq!(engine.state(), LifecycleState::Running);
    assert!(host.surface_attached());
    assert_eq!(host.listener_count(), 3);
    assert!(host.has_listener(ListenerKind::ViewportPointer));
    assert!(host.has_listener(ListenerKind::SurfacePointer));
    assert!(host.has_listener(ListenerKind::Resize));
    assert!(host.pending_frame().is_some());
    assert_eq!(engine.pending_frame(), host.pending_frame());

    let pool = 1 + config.palette.len() + config.cube_count + 2;
    assert_eq!(engine.device().live_resources(), pool + 7);
}

#[test]
fn unmount_returns_to_baseline() {
    let (mut engine, mut host) = mounted();
    drive(&mut engine, &mut host, 10);

    assert!(engine.unmount(&mut host));
    assert_eq!(engine.state(), LifecycleState::Unmounted);
    assert_eq!(engine.device().live_resources(), 0);
    assert_eq!(host.listener_count(), 0);
    assert!(!host.surface_attached());
    assert_eq!(host.pending_frame(), None);
    assert!(engine.pool().is_none());
    assert!(engine.pipeline().is_none());

    // second unmount does nothing
    assert!(!engine.unmount(&mut host));
    assert_eq!(engine.state(), LifecycleState::Unmounted);
}

#[test]
fn remount_after_unmount() {
    let (mut engine, mut host) = mounted();
    engine.unmount(&mut host);
    assert_eq!(engine.mount(&mut host).expect("remount"), MountOutcome::Mounted);
    assert_eq!(host.listener_count(), 3);
    assert_eq!(drive(&mut engine, &mut host, 5), 5);
}

#[test]
fn mount_without_surface_is_a_no_op() {
    let mut host = HeadlessHost::without_surface();
    let mut engine = engine(FieldConfig::ascent());

    let outcome = engine.mount(&mut host).expect("no error");
    assert_eq!(outcome, MountOutcome::SurfaceUnavailable);
    assert_eq!(engine.state(), LifecycleState::Unmounted);
    assert_eq!(engine.device().live_resources(), 0);
    assert_eq!(host.listener_count(), 0);
    assert_eq!(host.pending_frame(), None);
}

#[test]
fn mount_succeeds_once_the_surface_gains_area() {
    let mut host = HeadlessHost::without_surface();
    let mut engine = engine(FieldConfig::ascent().with_seed(2));
    assert_eq!(engine.mount(&mut host).expect("no error"), MountOutcome::SurfaceUnavailable);

    host.set_viewport(Viewport::new(640, 480, 1.0));
    assert_eq!(engine.mount(&mut host).expect("retry"), MountOutcome::Mounted);
    assert!(engine.is_running());
    assert_eq!(engine.pipeline().expect("pipeline").size(), (640, 480));
    assert_eq!(drive(&mut engine, &mut host, 3), 3);
}

#[test]
fn mounting_twice_changes_nothing() {
    let (mut engine, mut host) = mounted();
    let live = engine.device().live_resources();

    assert_eq!(engine.mount(&mut host).expect("no error"), MountOutcome::AlreadyMounted);
    assert_eq!(engine.device().live_resources(), live);
    assert_eq!(host.listener_count(), 3);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let mut config = FieldConfig::ascent();
    config.palette.clear();
    assert!(matches!(
        Engine::new(config, HeadlessDevice::new()),
        Err(FieldError::InvalidConfig(_))
    ));
}

// ============================================================================
// Failed initialization
// ============================================================================

#[test]
fn pool_failure_rolls_back() {
    let mut host = host();
    let mut engine = Engine::new(FieldConfig::ascent(), HeadlessDevice::with_budget(10))
        .expect("valid config");

    assert!(engine.mount(&mut host).is_err());
    assert_eq!(engine.state(), LifecycleState::Unmounted);
    assert_eq!(engine.device().live_resources(), 0);
    assert_eq!(host.listener_count(), 0);
    assert_eq!(host.pending_frame(), None);
    assert!(!host.surface_attached());
}

#[test]
fn pipeline_failure_releases_the_pool() {
    let config = FieldConfig::ascent();
    let pool = 1 + config.palette.len() + config.cube_count + 2;
    let mut host = host();
    let mut engine =
        Engine::new(config, HeadlessDevice::with_budget(pool + 3)).expect("valid config");

    assert!(matches!(
        engine.mount(&mut host),
        Err(FieldError::ResourceBudgetExceeded { .. })
    ));
    assert_eq!(engine.device().live_resources(), 0);
    assert!(engine.pool().is_none());
}

#[test]
fn rolled_back_mount_ends_unmounted_and_can_retry() {
    let config = FieldConfig::ascent();
    let pool = 1 + config.palette.len() + config.cube_count + 2;
    let mut host = host();
    let mut engine =
        Engine::new(config, HeadlessDevice::with_budget(pool + 3)).expect("valid config");

    assert!(engine.mount(&mut host).is_err());
    assert_eq!(engine.state(), LifecycleState::Unmounted);
    assert!(!engine.is_running());
    assert!(engine.pipeline().is_none());

    engine.device_mut().set_budget(None);
    assert_eq!(engine.mount(&mut host).expect("retry"), MountOutcome::Mounted);
    assert_eq!(engine.state(), LifecycleState::Running);
}

#[test]
fn attach_failure_releases_everything() {
    let mut host = host();
    host.set_fail_attach(true);
    let mut engine = engine(FieldConfig::oscillation());

    assert!(matches!(engine.mount(&mut host), Err(FieldError::SurfaceError(_))));
    assert_eq!(engine.state(), LifecycleState::Unmounted);
    assert_eq!(engine.device().live_resources(), 0);
    assert_eq!(host.listener_count(), 0);

    host.set_fail_attach(false);
    assert_eq!(engine.mount(&mut host).expect("retry"), MountOutcome::Mounted);
}

// ============================================================================
// Frame loop
// ============================================================================

#[test]
fn each_tick_advances_and_requests_the_next_frame() {
    let (mut engine, mut host) = mounted();

    let (handle, timestamp) = host.take_frame().expect("first frame");
    let outcome = engine.tick(&mut host, handle, timestamp);
    assert_eq!(outcome, TickOutcome::Advanced { rendered: true });
    assert_eq!(engine.stats().frame_count, 1);
    assert_eq!(engine.device().frames_submitted(), 1);

    let next = host.pending_frame().expect("next frame requested");
    assert_ne!(next, handle);
}

#[test]
fn stale_handles_are_ignored() {
    let (mut engine, mut host) = mounted();
    let (handle, timestamp) = host.take_frame().expect("first frame");

    let bogus = FrameHandle(handle.0 + 100);
    assert_eq!(engine.tick(&mut host, bogus, timestamp), TickOutcome::Ignored);
    assert_eq!(engine.stats().frame_count, 0);

    assert!(matches!(
        engine.tick(&mut host, handle, timestamp),
        TickOutcome::Advanced { .. }
    ));
    // the same handle a second time is stale
    assert_eq!(engine.tick(&mut host, handle, timestamp), TickOutcome::Ignored);
    assert_eq!(engine.stats().frame_count, 1);
}

#[test]
fn no_tick_runs_after_unmount() {
    let (mut engine, mut host) = mounted();
    let handle = host.pending_frame().expect("pending");

    engine.unmount(&mut host);
    assert_eq!(host.pending_frame(), None);
    assert_eq!(
        engine.tick(&mut host, handle, Duration::from_millis(16)),
        TickOutcome::Ignored
    );
    assert_eq!(engine.device().frames_submitted(), 0);
    assert_eq!(host.pending_frame(), None);
}

#[test]
fn failed_submissions_keep_the_loop_alive() {
    let (mut engine, mut host) = mounted();
    engine.device_mut().set_fail_submissions(true);

    assert_eq!(drive(&mut engine, &mut host, 5), 5);
    let stats = engine.stats();
    assert_eq!(stats.frame_count, 5);
    assert_eq!(stats.failed_frames, 5);
    assert!(engine.is_running());
    assert!(host.pending_frame().is_some());

    engine.device_mut().set_fail_submissions(false);
    let (handle, timestamp) = host.take_frame().expect("frame");
    assert_eq!(
        engine.tick(&mut host, handle, timestamp),
        TickOutcome::Advanced { rendered: true }
    );
    assert_eq!(engine.stats().failed_frames, 5);
}

#[test]
fn drive_stops_without_a_pending_frame() {
    let mut host = host();
    let mut engine = engine(FieldConfig::ascent());
    assert_eq!(drive(&mut engine, &mut host, 10), 0);
}

#[test]
fn stats_reflect_the_run() {
    let (mut engine, mut host) = mounted();
    drive(&mut engine, &mut host, 120);

    let stats = engine.stats();
    assert_eq!(stats.state, LifecycleState::Running);
    assert_eq!(stats.frame_count, 120);
    assert_eq!(stats.failed_frames, 0);
    assert_eq!(stats.live_resources, engine.device().live_resources());
    assert!(stats.fps > 0.0);
}

// ============================================================================
// Input and resize
// ============================================================================

#[test]
fn viewport_pointer_moves_parallax_target() {
    let (mut engine, _host) = mounted();
    engine.pointer_moved_viewport(1280.0, 0.0);

    let target = engine.pointer().expect("pointer").parallax_target;
    assert!((target.x - 5.0).abs() < 1e-4);
    assert!((target.y - 13.0).abs() < 1e-4);
}

#[test]
fn surface_pointer_hovers_at_most_one_cube() {
    let (mut engine, _host) = mounted();
    // park every cube away from the view, then put one under the center
    let pool = engine.pool_mut().expect("pool");
    for (i, cube) in pool.cubes_mut().iter_mut().enumerate() {
        cube.position = glam::Vec3::new(500.0 + i as f32 * 10.0, 0.0, 0.0);
    }
    let camera_target = engine.pipeline().expect("pipeline").camera().target();
    engine.pool_mut().expect("pool").cubes_mut()[3].position = camera_target;

    let hovered = engine.pointer_moved_surface(640.0, 360.0);
    assert_eq!(hovered, Some(3));
    assert_eq!(engine.stats().hovered, Some(3));
    assert_eq!(engine.pool().expect("pool").hovered_count(), 1);

    assert_eq!(engine.pointer_moved_surface(0.0, 0.0), None);
    assert_eq!(engine.pool().expect("pool").hovered_count(), 0);
}

#[test]
fn input_before_mount_is_ignored() {
    let mut engine = engine(FieldConfig::ascent());
    engine.pointer_moved_viewport(10.0, 10.0);
    assert_eq!(engine.pointer_moved_surface(10.0, 10.0), None);
    assert!(!engine.resized(800, 600).expect("no-op"));
}

#[test]
fn resize_updates_the_pipeline() {
    let (mut engine, _host) = mounted();
    let live = engine.device().live_resources();

    assert!(engine.resized(800, 800).expect("resize"));
    let pipeline = engine.pipeline().expect("pipeline");
    assert_eq!(pipeline.size(), (800, 800));
    assert!((pipeline.camera().aspect - 1.0).abs() < 1e-6);
    assert_eq!(engine.device().live_resources(), live);

    assert!(!engine.resized(0, 0).expect("ignored"));
    assert_eq!(engine.pipeline().expect("pipeline").size(), (800, 800));
}

// ============================================================================
// Drop and determinism
// ============================================================================

#[test]
fn dropping_a_mounted_engine_releases_resources() {
    let live = Rc::new(Cell::new(0));
    let device = ObservedDevice {
        inner: HeadlessDevice::new(),
        live: Rc::clone(&live),
    };
    let mut host = host();
    let mut engine = Engine::new(FieldConfig::ascent(), device).expect("valid config");
    engine.mount(&mut host).expect("mount");
    assert!(live.get() > 0);

    drop(engine);
    assert_eq!(live.get(), 0);
}

#[test]
fn same_seed_same_field() {
    let run = || {
        let mut host = host();
        let mut engine = engine(FieldConfig::oscillation().with_seed(99));
        engine.mount(&mut host).expect("mount");
        drive(&mut engine, &mut host, 200);
        engine
            .pool()
            .expect("pool")
            .cubes()
            .iter()
            .map(|c| c.position)
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
