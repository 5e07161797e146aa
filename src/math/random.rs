//! Randomness helpers.
//!
//! All randomized state in the field (spawn positions, phases, speeds,
//! palette picks) is drawn through [`FieldRng`], so a configured seed makes a
//! whole run reproducible.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use serde::{Deserialize, Serialize};

/// Half-open `[min, max)` interval of `f32` values.
///
/// A degenerate range (`min == max`) always samples `min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    #[inline]
    #[must_use]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

/// Seedable random source for the simulation.
pub struct FieldRng {
    inner: StdRng,
}

impl FieldRng {
    /// Creates a deterministic generator.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uses `seed` when given, otherwise a fresh random seed.
    #[must_use]
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        Self::seeded(seed.unwrap_or_else(rand::random))
    }

    /// Uniform sample in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Uniform sample in `range`.
    #[inline]
    pub fn range(&mut self, range: FloatRange) -> f32 {
        if range.max <= range.min {
            return range.min;
        }
        self.inner.random_range(range.min..range.max)
    }

    /// Uniform sample in `[-extent / 2, extent / 2)`.
    #[inline]
    pub fn centered(&mut self, extent: f32) -> f32 {
        (self.unit() - 0.5) * extent
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.random_range(0..len)
    }

    /// `1.0` or `-1.0` with equal probability.
    #[inline]
    pub fn sign(&mut self) -> f32 {
        if self.inner.random::<bool>() { 1.0 } else { -1.0 }
    }

    /// Uniform sample in `[0, TAU)`.
    #[inline]
    pub fn angle(&mut self) -> f32 {
        self.unit() * std::f32::consts::TAU
    }
}

impl std::fmt::Debug for FieldRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRng").finish_non_exhaustive()
    }
}
