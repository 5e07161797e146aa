use glam::Vec3;

use crate::config::{PaletteEntry, ParticleParams};
use crate::math::FieldRng;

/// Fixed-size particle cloud stored as flat tables, ready for upload.
///
/// `positions` and `colors` hold three floats per particle, `sizes` one.
/// The count never changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleTable {
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
}

impl ParticleTable {
    /// Scatters `count` particles through the spawn box, tinted with the
    /// palette's base colors.
    pub fn new(
        count: usize,
        params: &ParticleParams,
        palette: &[PaletteEntry],
        rng: &mut FieldRng,
    ) -> Self {
        let mut positions = Vec::with_capacity(count * 3);
        let mut colors = Vec::with_capacity(count * 3);
        let mut sizes = Vec::with_capacity(count);

        for _ in 0..count {
            positions.extend_from_slice(&[
                rng.centered(params.extent.x),
                rng.centered(params.extent.y),
                rng.centered(params.extent.z),
            ]);
            let color = if palette.is_empty() {
                Vec3::ONE
            } else {
                palette[rng.index(palette.len())].linear_color()
            };
            colors.extend_from_slice(&color.to_array());
            sizes.push(rng.range(params.size));
        }

        Self {
            positions,
            colors,
            sizes,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    #[must_use]
    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    pub fn set_position(&mut self, index: usize, position: Vec3) {
        position.write_to_slice(&mut self.positions[index * 3..index * 3 + 3]);
    }

    #[must_use]
    pub fn color(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.colors[index * 3..index * 3 + 3])
    }

    #[must_use]
    pub fn size(&self, index: usize) -> f32 {
        self.sizes[index]
    }

    #[must_use]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[must_use]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    #[must_use]
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }
}
