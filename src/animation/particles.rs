use crate::config::ParticleParams;
use crate::math::FieldRng;
use crate::pool::ParticleTable;

/// Lifts and sways every particle one tick. Particles above the upper bound
/// wrap to the respawn height with a fresh horizontal position.
///
/// Returns how many particles wrapped.
pub fn step_particles(
    table: &mut ParticleTable,
    params: &ParticleParams,
    time: f32,
    rng: &mut FieldRng,
) -> usize {
    let mut wrapped = 0;
    for i in 0..table.len() {
        let offset = i as f32;
        let mut p = table.position(i);
        p.y += params.rise + (time + offset).sin() * params.wave;
        p.x += (params.drift_frequency * time + offset).sin() * params.drift;

        if p.y > params.upper_bound {
            p.y = params.respawn_y;
            p.x = rng.centered(params.extent.x);
            p.z = rng.centered(params.extent.z);
            wrapped += 1;
        }
        table.set_position(i, p);
    }
    wrapped
}
