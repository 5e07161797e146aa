use glam::{Affine3A, EulerRot, Quat, Vec3};

use crate::config::{FieldConfig, MotionProfile};
use crate::math::{FieldRng, FloatRange};
use crate::renderer::ResourceId;
use crate::renderer::frame::CubeInstance;

/// Profile-specific motion state of one cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CubeMotion {
    Ascent {
        /// Height before the sinusoidal bob is added.
        height: f32,
        speed: f32,
        /// Ticks since the last (re)spawn.
        countdown: u32,
        /// Countdown value that forces a recycle.
        threshold: u32,
    },
    Oscillation {
        origin: Vec3,
        amplitude: f32,
        /// Horizontal velocity, `x` and `z` components per tick.
        velocity: glam::Vec2,
    },
}

/// One animated cube.
///
/// All colors are linear RGB. `opacity` is driven by motion (fading) and
/// `opacity_boost` by hover; the rendered alpha combines both.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeEntity {
    pub id: usize,
    pub position: Vec3,
    /// Euler angles, XYZ order.
    pub rotation: Vec3,
    pub angular_velocity: Vec3,
    pub scale: f32,
    pub resting_scale: f32,
    pub base_color: Vec3,
    pub hover_color: Vec3,
    pub rest_emissive: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub base_opacity: f32,
    pub opacity_boost: f32,
    pub phase: f32,
    pub hovered: bool,
    pub palette_index: usize,
    pub material: ResourceId,
    pub motion: CubeMotion,
}

impl CubeEntity {
    /// Draws a fresh cube for `config`, using palette entry `palette_index`.
    pub fn spawn(
        id: usize,
        config: &FieldConfig,
        palette_index: usize,
        material: ResourceId,
        rng: &mut FieldRng,
    ) -> Self {
        let entry = config.palette[palette_index];
        let base_color = entry.linear_color();
        let hover = &config.hover;

        let x = rng.centered(config.spawn.half_x * 2.0);
        let z = rng.centered(config.spawn.half_z * 2.0);
        let phase = rng.angle();

        let (position, motion) = match &config.motion {
            MotionProfile::Ascent(p) => {
                let height = rng.range(p.spawn_band);
                let motion = CubeMotion::Ascent {
                    height,
                    speed: rng.range(p.speed),
                    countdown: sample_ticks(rng, p.initial_countdown),
                    threshold: sample_ticks(rng, p.recycle_threshold),
                };
                (Vec3::new(x, height, z), motion)
            }
            MotionProfile::Oscillation(p) => {
                let origin = Vec3::new(x, rng.range(p.origin_y), z);
                let amplitude = rng.range(p.amplitude);
                let velocity = glam::Vec2::new(
                    rng.sign() * rng.range(p.velocity),
                    rng.sign() * rng.range(p.velocity),
                );
                let y = origin.y + amplitude * phase.sin();
                let motion = CubeMotion::Oscillation {
                    origin,
                    amplitude,
                    velocity,
                };
                (Vec3::new(x, y, z), motion)
            }
        };

        let rotation = Vec3::new(rng.angle(), rng.angle(), rng.angle());
        let spin = config.angular_speed * 2.0;
        let angular_velocity = Vec3::new(rng.centered(spin), rng.centered(spin), rng.centered(spin));
        let scale = rng.range(config.scale_range);

        Self {
            id,
            position,
            rotation,
            angular_velocity,
            scale,
            resting_scale: scale,
            base_color,
            hover_color: base_color * hover.hover_color_gain,
            rest_emissive: base_color * hover.rest_emissive_gain,
            emissive: entry.linear_emissive(),
            emissive_intensity: config.material.emissive_intensity,
            opacity: config.material.opacity,
            base_opacity: config.material.opacity,
            opacity_boost: 0.0,
            phase,
            hovered: false,
            palette_index,
            material,
            motion,
        }
    }

    #[must_use]
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Local-to-world transform of the unit-scaled geometry.
    #[must_use]
    pub fn world_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.orientation(),
            self.position,
        )
    }

    /// Alpha actually drawn: motion opacity plus the hover boost.
    #[inline]
    #[must_use]
    pub fn rendered_opacity(&self) -> f32 {
        (self.opacity + self.opacity_boost).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn instance(&self, metalness: f32, roughness: f32) -> CubeInstance {
        let model = glam::Mat4::from(self.world_matrix());
        CubeInstance {
            model: model.to_cols_array_2d(),
            color: self.base_color.extend(self.rendered_opacity()).to_array(),
            emissive: self.emissive.extend(self.emissive_intensity).to_array(),
            surface: [metalness, roughness, 0.0, 0.0],
        }
    }
}

/// Samples a tick count from a float range.
pub(crate) fn sample_ticks(rng: &mut FieldRng, range: FloatRange) -> u32 {
    rng.range(range).max(0.0) as u32
}
