use glam::Vec3;

use crate::config::{FieldConfig, HoverParams, MotionProfile, ParticleParams, SpawnBounds};
use crate::interaction::PointerState;
use crate::math::{FieldRng, FloatRange, approach};
use crate::pool::EntityPool;
use crate::scene::{Camera, CameraSettings};
use crate::utils::FrameState;

use super::hover::ease_hover;
use super::motion::{spin, step_ascent, step_oscillation};
use super::particles::step_particles;

/// What one step changed, for stats and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub recycled: usize,
    pub particles_wrapped: usize,
}

/// The per-frame simulation step.
///
/// Holds a copy of the tunables it needs so the pool can be borrowed
/// mutably while stepping.
#[derive(Debug, Clone)]
pub struct AnimationScheduler {
    motion: MotionProfile,
    spawn: SpawnBounds,
    scale_range: FloatRange,
    hover: HoverParams,
    particles: ParticleParams,
    camera: CameraSettings,
}

impl AnimationScheduler {
    #[must_use]
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            motion: config.motion.clone(),
            spawn: config.spawn,
            scale_range: config.scale_range,
            hover: config.hover,
            particles: config.particles,
            camera: config.camera,
        }
    }

    /// Advances cubes, particles and the camera by one tick.
    ///
    /// Order per cube: motion (with fade and recycle), spin, hover easing.
    /// The camera then eases toward the parallax target and re-aims at the
    /// look-at point.
    pub fn step(
        &self,
        frame: &FrameState,
        pool: &mut EntityPool,
        camera: &mut Camera,
        pointer: &PointerState,
        rng: &mut FieldRng,
    ) -> StepReport {
        let t = frame.time;
        let mut report = StepReport::default();

        for cube in pool.cubes_mut() {
            match &self.motion {
                MotionProfile::Ascent(p) => {
                    if step_ascent(cube, p, &self.spawn, self.scale_range, t, rng) {
                        report.recycled += 1;
                    }
                }
                MotionProfile::Oscillation(p) => step_oscillation(cube, p, t),
            }
            spin(cube);
            ease_hover(cube, &self.hover);
        }

        report.particles_wrapped = step_particles(pool.particles_mut(), &self.particles, t, rng);

        self.follow_pointer(camera, pointer);

        if report.recycled > 0 {
            log::trace!("frame {}: recycled {} cubes", frame.frame_count, report.recycled);
        }
        report
    }

    fn follow_pointer(&self, camera: &mut Camera, pointer: &PointerState) {
        let current = camera.position();
        let target = pointer.parallax_target;
        let smoothing = self.camera.smoothing;
        camera.set_position(Vec3::new(
            approach(current.x, target.x, smoothing),
            approach(current.y, target.y, smoothing),
            current.z,
        ));
        camera.look_at(self.camera.target);
    }
}
