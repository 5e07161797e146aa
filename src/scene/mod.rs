//! Scene Module
//!
//! Static scene description shared by every frame: the perspective
//! [`Camera`], the fixed [`Light`] rig and exponential-squared [`Fog`].
//! Entities themselves live in [`crate::pool`].

pub mod camera;
pub mod environment;
pub mod light;

pub use camera::{Camera, CameraSettings};
pub use environment::Fog;
pub use light::{Light, LightKind};
