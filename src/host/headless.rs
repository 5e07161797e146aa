use std::time::Duration;

use crate::engine::{Engine, TickOutcome};
use crate::errors::{FieldError, Result};
use crate::renderer::RenderDevice;

use super::{FrameHandle, Host, ListenerId, ListenerKind, Viewport};

/// In-memory host with a simulated 60 Hz display.
///
/// Frames are not delivered on their own: [`take_frame`](Self::take_frame)
/// pops the pending request and advances the clock by one interval.
#[derive(Debug)]
pub struct HeadlessHost {
    surface: Option<Viewport>,
    attached: bool,
    fail_attach: bool,
    listeners: Vec<(ListenerId, ListenerKind)>,
    next_listener: u64,
    pending: Option<FrameHandle>,
    next_frame: u64,
    clock: Duration,
    frame_interval: Duration,
}

impl HeadlessHost {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            surface: Some(viewport),
            attached: false,
            fail_attach: false,
            listeners: Vec::new(),
            next_listener: 1,
            pending: None,
            next_frame: 1,
            clock: Duration::ZERO,
            frame_interval: Duration::from_micros(16_667),
        }
    }

    /// Host without any surface; mounting into it is a no-op.
    #[must_use]
    pub fn without_surface() -> Self {
        Self {
            surface: None,
            ..Self::new(Viewport::new(0, 0, 1.0))
        }
    }

    /// Changes the reported surface size. Does not notify anyone.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.surface = Some(viewport);
    }

    pub fn set_frame_interval(&mut self, interval: Duration) {
        self.frame_interval = interval;
    }

    /// Makes the next `attach_surface` calls fail.
    pub fn set_fail_attach(&mut self, fail: bool) {
        self.fail_attach = fail;
    }

    /// Delivers the pending refresh, if any, with its timestamp.
    pub fn take_frame(&mut self) -> Option<(FrameHandle, Duration)> {
        let handle = self.pending.take()?;
        self.clock += self.frame_interval;
        Some((handle, self.clock))
    }

    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock
    }

    #[must_use]
    pub fn surface_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    pub fn has_listener(&self, kind: ListenerKind) -> bool {
        self.listeners.iter().any(|(_, k)| *k == kind)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Host for HeadlessHost {
    fn surface(&self) -> Option<Viewport> {
        self.surface
    }

    fn attach_surface(&mut self) -> Result<()> {
        if self.fail_attach {
            return Err(FieldError::SurfaceError("attach refused".to_string()));
        }
        self.attached = true;
        Ok(())
    }

    fn detach_surface(&mut self) {
        self.attached = false;
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
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Runs up to `frames` refresh callbacks. Returns how many advanced the field.
///
/// Stops early once the engine no longer requests frames.
pub fn drive<D: RenderDevice>(
    engine: &mut Engine<D>,
    host: &mut HeadlessHost,
    frames: usize,
) -> usize {
    let mut advanced = 0;
    for _ in 0..frames {
        let Some((handle, timestamp)) = host.take_frame() else {
            break;
        };
        if let TickOutcome::Advanced { .. } = engine.tick(host, handle, timestamp) {
            advanced += 1;
        }
    }
    advanced
}
