//! Application Layer
//!
//! Desktop hosting for the field. [`winit`] provides a window-backed
//! [`Host`](crate::host::Host) and an event loop that drives an
//! [`Engine`](crate::engine::Engine) on a [`WgpuDevice`](crate::renderer::WgpuDevice).

pub mod winit;

pub use self::winit::{App, WinitHost};
