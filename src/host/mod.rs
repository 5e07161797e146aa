//! Host Module
//!
//! A [`Host`] is whatever the field is mounted into: it owns the
//! full-viewport surface, dispatches pointer and resize events, and delivers
//! display-refresh callbacks. The engine only ever talks to it through this
//! trait, so the same lifecycle runs in a window, in tests and in CI.
//!
//! Two hosts ship with the crate:
//!
//! - [`HeadlessHost`]: deterministic clock, frames pulled by [`drive`]
//! - `WinitHost` (feature `winit`): a real window, see [`crate::app`]

mod headless;

pub use headless::{HeadlessHost, drive};

use crate::errors::Result;

/// Logical surface size plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Event streams the engine subscribes to while mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Pointer movement anywhere in the viewport (camera parallax).
    ViewportPointer,
    /// Pointer movement over the field's own surface (hover).
    SurfacePointer,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Identifies one requested display-refresh callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

pub trait Host {
    /// The surface the field would draw into, or `None` if the host has none.
    fn surface(&self) -> Option<Viewport>;

    /// Inserts the field's surface into the host's presentation.
    fn attach_surface(&mut self) -> Result<()>;

    fn detach_surface(&mut self);

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;

    fn remove_listener(&mut self, id: ListenerId);

    /// Schedules the next refresh callback.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancels a pending callback. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}
