use glam::{Vec2, Vec3};

use crate::scene::CameraSettings;

/// Converts a pointer position in pixels to normalized device coordinates.
///
/// `x` grows right and `y` grows down in pixel space; NDC `y` grows up.
/// Returns `None` for a zero-sized area.
#[must_use]
pub fn to_ndc(x: f32, y: f32, width: f32, height: f32) -> Option<Vec2> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some(Vec2::new(2.0 * x / width - 1.0, -(2.0 * y / height - 1.0)))
}

/// Pointer-derived state consumed by the scheduler each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// Where the camera is easing toward.
    pub parallax_target: Vec3,
}

impl PointerState {
    #[must_use]
    pub fn new(camera: &CameraSettings) -> Self {
        Self {
            parallax_target: camera.position,
        }
    }

    /// Offsets the resting camera position by the pointer, scaled per axis.
    pub fn update_parallax(&mut self, ndc: Vec2, camera: &CameraSettings) {
        self.parallax_target = Vec3::new(
            camera.position.x + ndc.x * camera.parallax.x,
            camera.position.y + ndc.y * camera.parallax.y,
            camera.position.z,
        );
    }
}
