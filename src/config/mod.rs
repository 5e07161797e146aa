//! Configuration Module
//!
//! [`FieldConfig`] gathers every tunable of the field: counts, spawn bounds,
//! palette, motion profile, hover easing, camera, lights and post-processing.
//!
//! Configurations start from a [`Profile`] preset and can be loaded from
//! JSON; any field left out of the JSON keeps the value of the preset the
//! document selects.
//!
//! ```rust,ignore
//! use cubefield::FieldConfig;
//!
//! let config = FieldConfig::from_json_str(r#"{ "cube_count": 40, "seed": 7 }"#)?;
//! assert_eq!(config.cube_count, 40);
//! ```

pub mod profile;

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{FieldError, Result};
use crate::math::{FloatRange, hex_to_linear};
use crate::renderer::settings::{BloomSettings, RenderSettings};
use crate::scene::{CameraSettings, Fog, Light};

pub use profile::{AscentParams, MotionProfile, OscillationParams, Profile};

/// Top-level JSON key naming the preset a document is layered over.
pub const PROFILE_KEY: &str = "profile";

/// A (base color, emissive color) pair, both sRGB hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub color: u32,
    pub emissive: u32,
}

impl PaletteEntry {
    #[must_use]
    pub const fn new(color: u32, emissive: u32) -> Self {
        Self { color, emissive }
    }

    #[must_use]
    pub fn linear_color(&self) -> Vec3 {
        hex_to_linear(self.color)
    }

    #[must_use]
    pub fn linear_emissive(&self) -> Vec3 {
        hex_to_linear(self.emissive)
    }
}

/// Violet, cyan and magenta.
pub const DEFAULT_PALETTE: [PaletteEntry; 3] = [
    PaletteEntry::new(0x8b_5cf6, 0x4c_1d95),
    PaletteEntry::new(0x00_d4ff, 0x0e_a5e9),
    PaletteEntry::new(0xff_0080, 0x9f_1239),
];

/// Surface parameters shared by every cube material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialParams {
    pub metalness: f32,
    pub roughness: f32,
    pub opacity: f32,
    pub emissive_intensity: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            metalness: 0.7,
            roughness: 0.3,
            opacity: 0.8,
            emissive_intensity: 0.3,
        }
    }
}

/// Half extents of the horizontal spawn area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnBounds {
    pub half_x: f32,
    pub half_z: f32,
}

impl Default for SpawnBounds {
    fn default() -> Self {
        Self {
            half_x: 30.0,
            half_z: 20.0,
        }
    }
}

/// Particle cloud layout and drift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleParams {
    /// Full extents of the spawn box, centered on the origin.
    pub extent: Vec3,
    pub rise: f32,
    pub wave: f32,
    pub drift: f32,
    pub drift_frequency: f32,
    pub upper_bound: f32,
    pub respawn_y: f32,
    pub size: FloatRange,
    /// Material point size.
    pub point_size: f32,
    pub opacity: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            extent: Vec3::new(80.0, 60.0, 60.0),
            rise: 0.02,
            wave: 0.01,
            drift: 0.005,
            drift_frequency: 0.5,
            upper_bound: 40.0,
            respawn_y: -40.0,
            size: FloatRange::new(0.5, 2.5),
            point_size: 1.0,
            opacity: 0.4,
        }
    }
}

/// Per-tick hover easing. All rates are fractions of the remaining distance,
/// all steps are absolute increments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverParams {
    pub scale_factor: f32,
    pub scale_rate: f32,
    pub color_rate_in: f32,
    pub color_rate_out: f32,
    /// Hover color is the base color times this gain.
    pub hover_color_gain: f32,
    /// Resting emissive target is the base color times this gain.
    pub rest_emissive_gain: f32,
    pub intensity_step_in: f32,
    pub intensity_step_out: f32,
    pub intensity_ceiling: f32,
    pub intensity_floor: f32,
    pub opacity_step_in: f32,
    pub opacity_step_out: f32,
    pub opacity_boost_max: f32,
}

impl Default for HoverParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.3,
            scale_rate: 0.1,
            color_rate_in: 0.1,
            color_rate_out: 0.05,
            hover_color_gain: 1.5,
            rest_emissive_gain: 0.2,
            intensity_step_in: 0.05,
            intensity_step_out: 0.02,
            intensity_ceiling: 0.8,
            intensity_floor: 0.3,
            opacity_step_in: 0.02,
            opacity_step_out: 0.01,
            opacity_boost_max: 0.2,
        }
    }
}

/// Complete configuration of a cube field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Fixed seed for a reproducible run; `None` draws one at mount.
    pub seed: Option<u64>,
    pub cube_count: usize,
    pub particle_count: usize,
    /// Edge length of the shared cube geometry.
    pub cube_size: f32,
    pub scale_range: FloatRange,
    pub spawn: SpawnBounds,
    /// Largest per-axis rotation step, in radians per tick.
    pub angular_speed: f32,
    pub palette: Vec<PaletteEntry>,
    pub material: MaterialParams,
    pub motion: MotionProfile,
    pub particles: ParticleParams,
    pub hover: HoverParams,
    pub camera: CameraSettings,
    pub render: RenderSettings,
    pub lights: Vec<Light>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::ascent()
    }
}

impl FieldConfig {
    /// Rising cubes that fade out near the top and respawn below.
    #[must_use]
    pub fn ascent() -> Self {
        Self {
            seed: None,
            cube_count: 80,
            particle_count: 300,
            cube_size: 0.8,
            scale_range: FloatRange::new(0.5, 2.0),
            spawn: SpawnBounds::default(),
            angular_speed: 0.01,
            palette: DEFAULT_PALETTE.to_vec(),
            material: MaterialParams::default(),
            motion: MotionProfile::Ascent(AscentParams::default()),
            particles: ParticleParams::default(),
            hover: HoverParams::default(),
            camera: CameraSettings::default(),
            render: RenderSettings::default(),
            lights: Light::default_rig(),
        }
    }

    /// Bobbing cubes bouncing inside the spawn box, with denser fog and
    /// stronger bloom.
    #[must_use]
    pub fn oscillation() -> Self {
        let base = Self::ascent();
        Self {
            cube_count: 60,
            particle_count: 200,
            motion: MotionProfile::Oscillation(OscillationParams::default()),
            render: RenderSettings {
                bloom: BloomSettings {
                    strength: 1.0,
                    radius: 0.4,
                    threshold: 0.6,
                    ..base.render.bloom
                },
                fog: Fog {
                    density: 0.025,
                    ..base.render.fog
                },
                exposure: 1.1,
                ..base.render.clone()
            },
            ..base
        }
    }

    #[must_use]
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Ascent => Self::ascent(),
            Profile::Oscillation => Self::oscillation(),
        }
    }

    /// Sets the seed, builder style.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn profile(&self) -> Profile {
        self.motion.profile()
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Parses and validates a JSON configuration.
    ///
    /// The document is layered over a preset: the optional top-level
    /// `"profile"` key picks it, otherwise `motion.kind` does, otherwise
    /// ascent. Fields present in the document override the preset.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut overrides: Value = serde_json::from_str(json)?;
        let selector = overrides
            .as_object_mut()
            .and_then(|fields| fields.remove(PROFILE_KEY));
        let profile = match selector {
            Some(value) => serde_json::from_value(value)?,
            None => motion_kind(&overrides),
        };

        let mut merged = serde_json::to_value(Self::for_profile(profile))?;
        merge_json(&mut merged, overrides);
        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        log::debug!("Loaded {} configuration", config.profile().name());
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Rejects configurations the simulation cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            return Err(invalid("palette must contain at least one entry"));
        }
        positive("cube_size", self.cube_size)?;
        range("scale_range", self.scale_range)?;
        if self.scale_range.min <= 0.0 {
            return Err(invalid("scale_range must be strictly positive"));
        }
        non_negative("spawn.half_x", self.spawn.half_x)?;
        non_negative("spawn.half_z", self.spawn.half_z)?;
        non_negative("angular_speed", self.angular_speed)?;
        unit("material.opacity", self.material.opacity)?;

        match &self.motion {
            MotionProfile::Ascent(p) => {
                range("motion.speed", p.speed)?;
                range("motion.spawn_band", p.spawn_band)?;
                range("motion.recycle_threshold", p.recycle_threshold)?;
                range("motion.initial_countdown", p.initial_countdown)?;
                if p.recycle_threshold.min < 0.0 || p.initial_countdown.min < 0.0 {
                    return Err(invalid("recycle counters must be non-negative"));
                }
                if p.fade_end <= p.fade_start {
                    return Err(invalid(format!(
                        "fade_end ({}) must be greater than fade_start ({})",
                        p.fade_end, p.fade_start
                    )));
                }
                if p.spawn_band.max >= p.upper_bound {
                    return Err(invalid("spawn_band must lie below upper_bound"));
                }
            }
            MotionProfile::Oscillation(p) => {
                range("motion.amplitude", p.amplitude)?;
                range("motion.velocity", p.velocity)?;
                range("motion.origin_y", p.origin_y)?;
                non_negative("motion.bound_x", p.bound_x)?;
                non_negative("motion.bound_z", p.bound_z)?;
            }
        }

        let particles = &self.particles;
        if particles.extent.cmplt(Vec3::ZERO).any() || !particles.extent.is_finite() {
            return Err(invalid("particles.extent must be non-negative"));
        }
        range("particles.size", particles.size)?;
        unit("particles.opacity", particles.opacity)?;
        if particles.respawn_y >= particles.upper_bound {
            return Err(invalid("particles.respawn_y must lie below particles.upper_bound"));
        }

        let hover = &self.hover;
        positive("hover.scale_factor", hover.scale_factor)?;
        for (name, rate) in [
            ("hover.scale_rate", hover.scale_rate),
            ("hover.color_rate_in", hover.color_rate_in),
            ("hover.color_rate_out", hover.color_rate_out),
            ("hover.opacity_boost_max", hover.opacity_boost_max),
        ] {
            unit(name, rate)?;
        }
        if hover.intensity_floor > hover.intensity_ceiling {
            return Err(invalid("hover.intensity_floor exceeds hover.intensity_ceiling"));
        }

        let camera = &self.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(invalid(format!("camera.fov {} outside (0, 180)", camera.fov)));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(invalid("camera requires 0 < near < far"));
        }
        unit("camera.smoothing", camera.smoothing)?;

        let render = &self.render;
        positive("render.exposure", render.exposure)?;
        positive("render.max_pixel_ratio", render.max_pixel_ratio)?;
        non_negative("render.fog.density", render.fog.density)?;
        non_negative("render.bloom.strength", render.bloom.strength)?;
        if render.bloom.mip_levels == 0 {
            return Err(invalid("render.bloom.mip_levels must be at least 1"));
        }

        Ok(())
    }
}

fn motion_kind(json: &Value) -> Profile {
    json.pointer("/motion/kind")
        .and_then(Value::as_str)
        .and_then(|kind| kind.parse().ok())
        .unwrap_or_default()
}

/// Deep-merges `overlay` into `base`. Objects merge key by key unless their
/// `kind` tags differ; anything else is replaced.
fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            let retagged = matches!(
                (base.get("kind"), overlay.get("kind")),
                (Some(old), Some(new)) if old != new
            );
            if retagged {
                base.clear();
            }
            for (key, value) in overlay {
                merge_json(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn invalid(msg: impl Into<String>) -> FieldError {
    FieldError::InvalidConfig(msg.into())
}

fn range(name: &str, r: FloatRange) -> Result<()> {
    if r.is_valid() {
        Ok(())
    } else {
        Err(invalid(format!("{name} is inverted or not finite: [{}, {})", r.min, r.max)))
    }
}

fn positive(name: &str, v: f32) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be positive, got {v}")))
    }
}

fn non_negative(name: &str, v: f32) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be non-negative, got {v}")))
    }
}

fn unit(name: &str, v: f32) -> Result<()> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must lie in [0, 1], got {v}")))
    }
}
