//! Per-profile cube motion.
//!
//! Every function here advances exactly one tick. Smoothing and increments
//! are per tick, not scaled by frame time.

use crate::config::{AscentParams, OscillationParams, SpawnBounds};
use crate::math::{FieldRng, FloatRange};
use crate::pool::{CubeEntity, CubeMotion, sample_ticks};

/// Opacity of an ascending cube at height `y`.
///
/// Full `base` up to `fade_start`, then linearly down to zero at `fade_end`.
/// Depends only on the current height, so a cube sinking back below
/// `fade_start` regains its base opacity.
#[inline]
#[must_use]
pub fn fade_opacity(base: f32, y: f32, params: &AscentParams) -> f32 {
    if y > params.fade_start {
        let span = params.fade_end - params.fade_start;
        base * (1.0 - ((y - params.fade_start) / span).min(1.0))
    } else {
        base
    }
}

/// Rises, bobs, drifts and fades one cube; recycles it when it leaves the top
/// or outlives its threshold. Returns whether it was recycled.
pub fn step_ascent(
    cube: &mut CubeEntity,
    params: &AscentParams,
    spawn: &SpawnBounds,
    scale_range: FloatRange,
    time: f32,
    rng: &mut FieldRng,
) -> bool {
    let CubeMotion::Ascent {
        height,
        speed,
        countdown,
        threshold,
    } = &mut cube.motion
    else {
        return false;
    };

    *height += *speed;
    let s = params.motion_scale;
    cube.position.y = *height + (time + cube.phase).sin() * params.float_amplitude * s;
    cube.position.x +=
        (params.drift_frequency * time + cube.phase).sin() * params.drift_amplitude * s;

    cube.opacity = fade_opacity(cube.base_opacity, cube.position.y, params);

    *countdown = countdown.saturating_add(1);
    if cube.position.y <= params.upper_bound && *countdown <= *threshold {
        return false;
    }

    recycle(cube, params, spawn, scale_range, rng);
    true
}

/// Respawns an ascending cube at the bottom with fresh randomized state.
///
/// Hover state is left untouched.
pub fn recycle(
    cube: &mut CubeEntity,
    params: &AscentParams,
    spawn: &SpawnBounds,
    scale_range: FloatRange,
    rng: &mut FieldRng,
) {
    let new_height = rng.range(params.spawn_band);
    let new_speed = rng.range(params.speed);
    let new_threshold = sample_ticks(rng, params.recycle_threshold);

    cube.position.x = rng.centered(spawn.half_x * 2.0);
    cube.position.z = rng.centered(spawn.half_z * 2.0);
    cube.position.y = new_height;

    cube.resting_scale = rng.range(scale_range);
    cube.scale = cube.resting_scale;
    cube.opacity = cube.base_opacity;

    cube.motion = CubeMotion::Ascent {
        height: new_height,
        speed: new_speed,
        countdown: 0,
        threshold: new_threshold,
    };
}

/// Bobs one cube around its origin height and moves it horizontally,
/// reflecting each velocity component that is carrying it past a bound.
///
/// The bound check runs before the move, so a cube that crosses a bound
/// this tick only turns around on the next one.
pub fn step_oscillation(cube: &mut CubeEntity, params: &OscillationParams, time: f32) {
    let CubeMotion::Oscillation {
        origin,
        amplitude,
        velocity,
    } = &mut cube.motion
    else {
        return;
    };

    if outward(cube.position.x, velocity.x, params.bound_x) {
        velocity.x = -velocity.x;
    }
    if outward(cube.position.z, velocity.y, params.bound_z) {
        velocity.y = -velocity.y;
    }

    cube.position.x += velocity.x;
    cube.position.z += velocity.y;
    cube.position.y = origin.y + *amplitude * (time + cube.phase).sin();
}

// 越界且仍在远离
#[inline]
fn outward(position: f32, velocity: f32, bound: f32) -> bool {
    position.abs() > bound && position * velocity > 0.0
}

/// Applies one tick of spin.
#[inline]
pub fn spin(cube: &mut CubeEntity) {
    cube.rotation += cube.angular_velocity;
}
