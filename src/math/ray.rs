use glam::{Affine3A, Mat4, Vec2, Vec3};

/// A half-line in world space. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Builds the ray through a point in normalized device coordinates.
    ///
    /// Unprojects the NDC point at depth 0 and depth 1 (wgpu clip range)
    /// through `inverse_view_projection`; the ray starts on the near plane.
    #[must_use]
    pub fn from_ndc(inverse_view_projection: Mat4, ndc: Vec2) -> Self {
        let near = inverse_view_projection.project_point3(ndc.extend(0.0));
        let far = inverse_view_projection.project_point3(ndc.extend(1.0));
        Self::new(near, far - near)
    }

    #[inline]
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersects an oriented box given by its local-to-world transform and
    /// its local half extents.
    ///
    /// The ray is moved into the box's local frame, where a slab test runs
    /// against the axis-aligned `[-half, half]` box. The direction is not
    /// renormalized there, so the returned parameter is a world distance.
    /// A ray starting inside the box reports its exit distance.
    #[must_use]
    pub fn intersect_box(&self, world_from_local: &Affine3A, half_extents: Vec3) -> Option<f32> {
        if self.direction == Vec3::ZERO {
            return None;
        }

        let local_from_world = world_from_local.inverse();
        let origin = local_from_world.transform_point3(self.origin);
        let direction = local_from_world.transform_vector3(self.direction);

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let h = half_extents[axis];

            if d.abs() < f32::EPSILON {
                if o < -h || o > h {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (-h - o) * inv;
            let mut t1 = (h - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }

        if t_max < 0.0 {
            return None;
        }
        Some(if t_min >= 0.0 { t_min } else { t_max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn hits_unit_box_straight_on() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = ray.intersect_box(&Affine3A::IDENTITY, Vec3::splat(0.5)).unwrap();
        assert!((t - 9.5).abs() < 1e-5);
    }

    #[test]
    fn misses_offset_box() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let world = Affine3A::from_translation(Vec3::new(3.0, 0.0, 0.0));
        assert!(ray.intersect_box(&world, Vec3::splat(0.5)).is_none());
    }

    #[test]
    fn scaled_box_distance_is_in_world_units() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let world = Affine3A::from_scale(Vec3::splat(2.0));
        let t = ray.intersect_box(&world, Vec3::splat(0.5)).unwrap();
        assert!((t - 9.0).abs() < 1e-4);
    }

    #[test]
    fn rotated_box_extends_along_diagonal() {
        // A 45° turn about Y puts a corner at distance sqrt(2)/2 from the center.
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let world = Affine3A::from_quat(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4));
        let t = ray.intersect_box(&world, Vec3::splat(0.5)).unwrap();
        assert!((t - (10.0 - std::f32::consts::FRAC_1_SQRT_2)).abs() < 1e-4);
    }

    #[test]
    fn box_behind_origin_is_ignored() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::NEG_Z);
        assert!(ray.intersect_box(&Affine3A::IDENTITY, Vec3::splat(0.5)).is_none());
    }

    #[test]
    fn origin_inside_box_reports_exit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = ray.intersect_box(&Affine3A::IDENTITY, Vec3::splat(1.0)).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
    }
}
