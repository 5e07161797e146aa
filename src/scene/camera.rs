use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::Ray;

/// Perspective camera parameters as they appear in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Resting position; the parallax target oscillates around it.
    pub position: Vec3,
    pub target: Vec3,
    /// Pointer NDC to world offset gains for x and y.
    pub parallax: Vec2,
    /// Fraction of the remaining distance to the parallax target covered per tick.
    pub smoothing: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 10.0, 30.0),
            target: Vec3::ZERO,
            parallax: Vec2::new(5.0, 3.0),
            smoothing: 0.02,
        }
    }
}

/// Perspective camera with cached view/projection matrices.
///
/// The projection uses wgpu's `[0, 1]` depth range.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    position: Vec3,
    target: Vec3,

    // 缓存的矩阵 renderer只读
    view_matrix: Mat4,
    projection_matrix: Mat4,
    view_projection_matrix: Mat4,
    inverse_view_projection: Mat4,
}

impl Camera {
    #[must_use]
    pub fn new_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
            inverse_view_projection: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam.update_view_matrix();
        cam
    }

    /// Builds a camera from configuration for a surface with the given aspect.
    #[must_use]
    pub fn from_settings(settings: &CameraSettings, aspect: f32) -> Self {
        let mut cam = Self::new_perspective(settings.fov, aspect, settings.near, settings.far);
        cam.position = settings.position;
        cam.look_at(settings.target);
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
        self.update_view_projection();
    }

    fn update_view_matrix(&mut self) {
        self.view_matrix = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        self.update_view_projection();
    }

    fn update_view_projection(&mut self) {
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
        self.inverse_view_projection = self.view_projection_matrix.inverse();
    }

    /// Sets the aspect ratio and rebuilds the projection.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    /// Moves the camera without changing what it looks at.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_view_matrix();
    }

    /// Points the camera at `target`.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        self.update_view_matrix();
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix
    }

    /// Ray from the camera through a point in normalized device coordinates.
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        Ray::from_ndc(self.inverse_view_projection, ndc)
    }

    /// Projects a world-space point to normalized device coordinates.
    #[must_use]
    pub fn project(&self, point: Vec3) -> Vec3 {
        self.view_projection_matrix.project_point3(point)
    }
}
