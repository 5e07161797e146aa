//! Motion profiles.
//!
//! A profile decides how cubes move between frames. Everything else (pool
//! layout, hover easing, pass chain) is shared.

use serde::{Deserialize, Serialize};

use crate::math::FloatRange;

/// Named preset selecting both a motion model and its visual tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Cubes rise continuously, fade near the top and are recycled below.
    #[default]
    Ascent,
    /// Cubes bob around a fixed height and bounce inside a horizontal box.
    Oscillation,
}

impl Profile {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ascent => "ascent",
            Self::Oscillation => "oscillation",
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascent" => Ok(Self::Ascent),
            "oscillation" => Ok(Self::Oscillation),
            other => Err(format!("unknown profile '{other}'")),
        }
    }
}

/// Per-cube motion rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionProfile {
    Ascent(AscentParams),
    Oscillation(OscillationParams),
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self::Ascent(AscentParams::default())
    }
}

impl MotionProfile {
    #[must_use]
    pub fn profile(&self) -> Profile {
        match self {
            Self::Ascent(_) => Profile::Ascent,
            Self::Oscillation(_) => Profile::Oscillation,
        }
    }
}

/// Continuous ascent with fading and recycling.
///
/// Distances are world units, speeds are world units per tick and the
/// recycle countdown counts ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AscentParams {
    pub speed: FloatRange,
    /// Height band a recycled cube is respawned into.
    pub spawn_band: FloatRange,
    pub upper_bound: f32,
    pub fade_start: f32,
    pub fade_end: f32,
    /// Range the per-cube recycle threshold is drawn from.
    pub recycle_threshold: FloatRange,
    /// Range the countdown starts at, so the first wave of recycles is staggered.
    pub initial_countdown: FloatRange,
    pub float_amplitude: f32,
    pub drift_amplitude: f32,
    pub drift_frequency: f32,
    /// Scales the bob and drift offsets into per-tick increments.
    pub motion_scale: f32,
}

impl Default for AscentParams {
    fn default() -> Self {
        Self {
            speed: FloatRange::new(0.02, 0.06),
            spawn_band: FloatRange::new(-50.0, -30.0),
            upper_bound: 40.0,
            fade_start: 25.0,
            fade_end: 35.0,
            recycle_threshold: FloatRange::new(2000.0, 3000.0),
            initial_countdown: FloatRange::new(0.0, 1000.0),
            float_amplitude: 0.5,
            drift_amplitude: 0.3,
            drift_frequency: 0.3,
            motion_scale: 0.01,
        }
    }
}

/// Vertical bobbing with elastic reflection at the horizontal bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillationParams {
    pub amplitude: FloatRange,
    /// Magnitude of each horizontal velocity component. The sign is random.
    pub velocity: FloatRange,
    pub origin_y: FloatRange,
    pub bound_x: f32,
    pub bound_z: f32,
}

impl Default for OscillationParams {
    fn default() -> Self {
        Self {
            amplitude: FloatRange::new(1.0, 3.0),
            velocity: FloatRange::new(0.01, 0.04),
            origin_y: FloatRange::new(-15.0, 25.0),
            bound_x: 30.0,
            bound_z: 20.0,
        }
    }
}
