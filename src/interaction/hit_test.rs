use glam::{Vec2, Vec3};

use crate::math::Ray;
use crate::pool::{CubeEntity, EntityPool};
use crate::scene::Camera;

/// Nearest cube hit by `ray` and its distance.
///
/// Each cube is tested as an oriented box: the geometry edge `cube_size`,
/// scaled by the cube's current scale and rotated by its Euler angles.
#[must_use]
pub fn pick(cubes: &[CubeEntity], ray: &Ray, cube_size: f32) -> Option<(usize, f32)> {
    let half = Vec3::splat(cube_size * 0.5);
    cubes
        .iter()
        .enumerate()
        .filter_map(|(i, cube)| ray.intersect_box(&cube.world_matrix(), half).map(|t| (i, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Casts a ray through `ndc` and makes the nearest hit the only hovered cube.
///
/// Every hovered flag is cleared first, so no hit leaves nothing hovered.
pub fn hit_test(
    pool: &mut EntityPool,
    camera: &Camera,
    ndc: Vec2,
    cube_size: f32,
) -> Option<usize> {
    let ray = camera.ray_from_ndc(ndc);
    let hit = pick(pool.cubes(), &ray, cube_size).map(|(index, _)| index);
    pool.set_hovered(hit);
    hit
}
