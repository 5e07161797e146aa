//! Math Module
//!
//! Small math helpers layered on top of `glam`:
//!
//! - [`Ray`]: world-space rays and oriented-box intersection
//! - [`FieldRng`] / [`FloatRange`]: seedable sampling of configured ranges
//! - [`hex_to_linear`]: sRGB hex colors to linear RGB

pub mod color;
pub mod random;
pub mod ray;

pub use color::hex_to_linear;
pub use random::{FieldRng, FloatRange};
pub use ray::Ray;

/// Moves `current` a fixed `fraction` of the way toward `target`.
#[inline]
#[must_use]
pub fn approach(current: f32, target: f32, fraction: f32) -> f32 {
    current + (target - current) * fraction
}
