//! Utility Module
//!
//! - [`FrameClock`]: host timestamps to per-tick [`FrameState`]
//! - [`FpsCounter`]: frame rate measurement for the frontends

pub mod fps_counter;
pub mod time;

pub use fps_counter::FpsCounter;
pub use time::{FrameClock, FrameState};
