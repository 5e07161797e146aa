//! Winit-based Application Framework
//!
//! Runs a cube field in a desktop window on top of the
//! [winit](https://crates.io/crates/winit) event loop.
//!
//! # Overview
//!
//! - [`App`]: Builder for the window title and field configuration
//! - [`WinitHost`]: The window seen through the [`Host`] trait
//! - `AppRunner`: Internal event loop handler (not exposed publicly)
//!
//! Window events map onto the engine's inputs: cursor movement feeds both
//! the parallax and the hover hit-test (the window is the viewport and the
//! surface at once), resizes rebuild the render targets, and each redraw is
//! one refresh callback. A window that had no area at startup is mounted on
//! its first non-zero resize.
//!
//! # Example
//!
//! ```rust,ignore
//! use cubefield::app::App;
//! use cubefield::FieldConfig;
//!
//! fn main() -> cubefield::Result<()> {
//!     App::new()
//!         .with_title("Cube Field")
//!         .with_config(FieldConfig::oscillation())
//!         .run()
//! }
//! ```

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
pub use winit::window::{Window, WindowId};

use crate::config::FieldConfig;
use crate::engine::{Engine, MountOutcome};
use crate::errors::{FieldError, Result};
use crate::host::{FrameHandle, Host, ListenerId, ListenerKind, Viewport};
use crate::renderer::WgpuDevice;

/// A winit window acting as the field's host.
///
/// Frame requests become `request_redraw` calls; the matching
/// `RedrawRequested` event delivers the callback.
pub struct WinitHost {
    window: Arc<Window>,
    attached: bool,
    listeners: Vec<(ListenerId, ListenerKind)>,
    next_listener: u64,
    next_frame: u64,
    pending: Option<FrameHandle>,
}

impl WinitHost {
    #[must_use]
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            attached: false,
            listeners: Vec::new(),
            next_listener: 0,
            next_frame: 0,
            pending: None,
        }
    }

    #[must_use]
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    #[must_use]
    pub fn has_listener(&self, kind: ListenerKind) -> bool {
        self.listeners.iter().any(|(_, k)| *k == kind)
    }

    /// The frame a redraw was requested for, if any.
    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }
}

impl Host for WinitHost {
    fn surface(&self) -> Option<Viewport> {
        let scale = self.scale_factor();
        let size = self.window.inner_size().to_logical::<f64>(scale);
        if size.width < 1.0 || size.height < 1.0 {
            return None;
        }
        Some(Viewport::new(
            size.width as u32,
            size.height as u32,
            scale as f32,
        ))
    }

    fn attach_surface(&mut self) -> Result<()> {
        self.window.set_visible(true);
        self.attached = true;
        Ok(())
    }

    fn detach_surface(&mut self) {
        if self.attached {
            self.window.set_visible(false);
            self.attached = false;
        }
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, kind));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(l, _)| *l != id);
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_frame);
        self.next_frame += 1;
        self.pending = Some(handle);
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Application builder.
pub struct App {
    title: String,
    config: FieldConfig,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: "Cube Field".into(),
            config: FieldConfig::default(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// Opens the window and blocks until it is closed.
    pub fn run(self) -> Result<()> {
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut runner = AppRunner::new(self.title, self.config);
        event_loop.run_app(&mut runner).map_err(FieldError::from)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

struct AppRunner {
    title: String,
    config: FieldConfig,

    host: Option<WinitHost>,
    engine: Option<Engine<WgpuDevice>>,

    start_time: Instant,
}

impl AppRunner {
    fn new(title: String, config: FieldConfig) -> Self {
        Self {
            title,
            config,
            host: None,
            engine: None,
            start_time: Instant::now(),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0))
            .with_transparent(true)
            .with_visible(false);

        let window = event_loop
            .create_window(window_attributes)
            .map_err(|e| FieldError::SurfaceError(e.to_string()))?;
        let window = Arc::new(window);

        log::info!("Initializing Renderer Backend...");
        let size = window.inner_size();
        let device = pollster::block_on(WgpuDevice::new(window.clone(), size.width, size.height))?;

        let mut host = WinitHost::new(window);
        let mut engine = Engine::new(self.config.clone(), device)?;
        match engine.mount(&mut host)? {
            MountOutcome::Mounted | MountOutcome::AlreadyMounted => {}
            MountOutcome::SurfaceUnavailable => {
                log::warn!("Window has no drawable area yet, mounting on first resize");
            }
        }

        self.start_time = Instant::now();
        self.host = Some(host);
        self.engine = Some(engine);
        Ok(())
    }

    fn shutdown(&mut self) {
        if let (Some(engine), Some(host)) = (&mut self.engine, &mut self.host) {
            engine.unmount(host);
        }
        self.engine = None;
        self.host = None;
    }
}

/// Mounts an engine that could not mount earlier, once the window has area.
fn retry_mount(engine: &mut Engine<WgpuDevice>, host: &mut WinitHost) {
    match engine.mount(host) {
        Ok(MountOutcome::Mounted) => log::info!("Cube field mounted after resize"),
        Ok(outcome) => log::debug!("Mount retry: {outcome:?}"),
        Err(e) => log::warn!("Mount retry failed: {e}"),
    }
}

impl ApplicationHandler for AppRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Fatal Renderer Error: {e}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            self.shutdown();
            event_loop.exit();
            return;
        }

        let (Some(engine), Some(host)) = (&mut self.engine, &mut self.host) else {
            return;
        };

        match event {
            WindowEvent::Resized(physical) => {
                if !engine.is_running() {
                    if physical.width > 0 && physical.height > 0 {
                        retry_mount(engine, host);
                    }
                } else if host.has_listener(ListenerKind::Resize) {
                    let logical = physical.to_logical::<f64>(host.scale_factor());
                    if let Err(e) = engine.resized(logical.width as u32, logical.height as u32) {
                        log::warn!("Resize failed, keeping previous size: {e}");
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(host.scale_factor());
                if host.has_listener(ListenerKind::ViewportPointer) {
                    engine.pointer_moved_viewport(logical.x, logical.y);
                }
                if host.has_listener(ListenerKind::SurfacePointer) {
                    engine.pointer_moved_surface(logical.x, logical.y);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(handle) = host.pending_frame() {
                    engine.tick(host, handle, self.start_time.elapsed());
                }
            }
            _ => {}
        }
    }
}
