//! Configuration Tests
//!
//! Tests for:
//! - Profile presets (counts, bloom, fog, exposure)
//! - JSON loading, preset selection, partial documents and round trips
//! - Validation of inconsistent settings
//! - Profile names and parsing

use cubefield::config::{AscentParams, DEFAULT_PALETTE};
use cubefield::math::FloatRange;
use cubefield::renderer::ToneMapping;
use cubefield::{FieldConfig, FieldError, MotionProfile, Profile};

const EPSILON: f32 = 1e-6;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn ascent_params(config: &mut FieldConfig) -> &mut AscentParams {
    match &mut config.motion {
        MotionProfile::Ascent(p) => p,
        MotionProfile::Oscillation(_) => panic!("expected ascent"),
    }
}

fn assert_invalid(config: &FieldConfig) {
    assert!(
        matches!(config.validate(), Err(FieldError::InvalidConfig(_))),
        "expected validation failure"
    );
}

// ============================================================================
// Presets
// ============================================================================

#[test]
fn ascent_preset() {
    let config = FieldConfig::ascent();
    assert_eq!(config.profile(), Profile::Ascent);
    assert_eq!(config.cube_count, 80);
    assert_eq!(config.particle_count, 300);
    assert_eq!(config.palette, DEFAULT_PALETTE.to_vec());
    assert_eq!(config.lights.len(), 4);

    let render = &config.render;
    assert!(approx(render.bloom.strength, 0.5));
    assert!(approx(render.bloom.radius, 0.3));
    assert!(approx(render.bloom.threshold, 0.9));
    assert!(approx(render.fog.density, 0.015));
    assert!(approx(render.exposure, 1.0));
    assert_eq!(render.tone_mapping, ToneMapping::AcesFilmic);
    assert_eq!(render.clear_color, [0.0; 4]);
    assert!(config.validate().is_ok());
}

#[test]
fn oscillation_preset() {
    let config = FieldConfig::oscillation();
    assert_eq!(config.profile(), Profile::Oscillation);
    assert_eq!(config.cube_count, 60);
    assert_eq!(config.particle_count, 200);

    let render = &config.render;
    assert!(approx(render.bloom.strength, 1.0));
    assert!(approx(render.bloom.radius, 0.4));
    assert!(approx(render.bloom.threshold, 0.6));
    assert!(approx(render.fog.density, 0.025));
    assert!(approx(render.exposure, 1.1));
    assert!(config.validate().is_ok());
}

#[test]
fn default_is_ascent() {
    assert_eq!(FieldConfig::default(), FieldConfig::ascent());
    assert_eq!(FieldConfig::for_profile(Profile::Oscillation), FieldConfig::oscillation());
}

#[test]
fn with_seed_sets_seed() {
    assert_eq!(FieldConfig::ascent().seed, None);
    assert_eq!(FieldConfig::ascent().with_seed(12).seed, Some(12));
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn partial_json_keeps_defaults() {
    let config = FieldConfig::from_json_str(r#"{ "cube_count": 40, "seed": 7 }"#).expect("parse");
    assert_eq!(config.cube_count, 40);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.particle_count, 300);
    assert_eq!(config.profile(), Profile::Ascent);
}

#[test]
fn json_selects_motion_kind() {
    let json = r#"{ "motion": { "kind": "oscillation", "bound_x": 12.0 } }"#;
    let config = FieldConfig::from_json_str(json).expect("parse");
    let MotionProfile::Oscillation(params) = &config.motion else {
        panic!("expected oscillation");
    };
    assert!(approx(params.bound_x, 12.0));
    assert!(approx(params.bound_z, 20.0));
}

#[test]
fn oscillation_motion_kind_brings_oscillation_tuning() {
    let config =
        FieldConfig::from_json_str(r#"{ "motion": { "kind": "oscillation" } }"#).expect("parse");
    assert_eq!(config, FieldConfig::oscillation());

    let render = &config.render;
    assert_eq!(config.cube_count, 60);
    assert!(approx(render.bloom.threshold, 0.6));
    assert!(approx(render.fog.density, 0.025));
    assert!(approx(render.exposure, 1.1));
}

#[test]
fn profile_key_picks_the_preset_and_fields_override_it() {
    let json = r#"{ "profile": "oscillation", "cube_count": 10, "render": { "exposure": 0.9 } }"#;
    let config = FieldConfig::from_json_str(json).expect("parse");
    assert_eq!(config.profile(), Profile::Oscillation);
    assert_eq!(config.cube_count, 10);
    assert_eq!(config.particle_count, 200);
    assert!(approx(config.render.exposure, 0.9));
    assert!(approx(config.render.bloom.strength, 1.0));
    assert!(approx(config.render.fog.density, 0.025));
}

#[test]
fn explicit_motion_replaces_the_preset_motion() {
    let json = r#"{ "profile": "oscillation", "motion": { "kind": "ascent", "upper_bound": 50.0 } }"#;
    let config = FieldConfig::from_json_str(json).expect("parse");
    let MotionProfile::Ascent(params) = &config.motion else {
        panic!("expected ascent");
    };
    assert!(approx(params.upper_bound, 50.0));
    assert!(approx(params.fade_end, AscentParams::default().fade_end));
    // the rest of the tuning still comes from the named preset
    assert_eq!(config.cube_count, 60);
    assert!(approx(config.render.exposure, 1.1));
}

#[test]
fn unknown_profile_key_is_a_json_error() {
    let result = FieldConfig::from_json_str(r#"{ "profile": "spiral" }"#);
    assert!(matches!(result, Err(FieldError::JsonError(_))));
}

#[test]
fn json_round_trip() {
    let original = FieldConfig::oscillation().with_seed(3);
    let json = original.to_json_string().expect("serialize");
    let parsed = FieldConfig::from_json_str(&json).expect("parse");
    assert_eq!(parsed, original);
}

#[test]
fn malformed_json_is_a_json_error() {
    let result = FieldConfig::from_json_str("{ cube_count: ");
    assert!(matches!(result, Err(FieldError::JsonError(_))));
}

#[test]
fn loaded_json_is_validated() {
    let result = FieldConfig::from_json_str(r#"{ "palette": [] }"#);
    assert!(matches!(result, Err(FieldError::InvalidConfig(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let result = FieldConfig::from_json_file("/definitely/not/here/field.json");
    assert!(matches!(result, Err(FieldError::IoError(_))));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn rejects_inverted_ranges() {
    let mut config = FieldConfig::ascent();
    config.scale_range = FloatRange::new(2.0, 0.5);
    assert_invalid(&config);

    let mut config = FieldConfig::ascent();
    ascent_params(&mut config).speed = FloatRange::new(0.06, 0.02);
    assert_invalid(&config);
}

#[test]
fn rejects_fade_end_before_fade_start() {
    let mut config = FieldConfig::ascent();
    let params = ascent_params(&mut config);
    params.fade_start = 35.0;
    params.fade_end = 25.0;
    assert_invalid(&config);
}

#[test]
fn rejects_spawn_band_above_upper_bound() {
    let mut config = FieldConfig::ascent();
    ascent_params(&mut config).spawn_band = FloatRange::new(30.0, 45.0);
    assert_invalid(&config);
}

#[test]
fn rejects_bad_render_settings() {
    let mut config = FieldConfig::ascent();
    config.render.bloom.mip_levels = 0;
    assert_invalid(&config);

    let mut config = FieldConfig::ascent();
    config.render.exposure = 0.0;
    assert_invalid(&config);
}

#[test]
fn rejects_bad_camera() {
    let mut config = FieldConfig::ascent();
    config.camera.fov = 180.0;
    assert_invalid(&config);

    let mut config = FieldConfig::ascent();
    config.camera.near = 10.0;
    config.camera.far = 5.0;
    assert_invalid(&config);
}

#[test]
fn rejects_out_of_unit_opacity() {
    let mut config = FieldConfig::ascent();
    config.material.opacity = 1.5;
    assert_invalid(&config);
}

#[test]
fn zero_counts_are_valid() {
    let config = FieldConfig {
        cube_count: 0,
        particle_count: 0,
        ..FieldConfig::oscillation()
    };
    assert!(config.validate().is_ok());
}

// ============================================================================
// Profile
// ============================================================================

#[test]
fn profile_names_parse_back() {
    for profile in [Profile::Ascent, Profile::Oscillation] {
        assert_eq!(profile.name().parse::<Profile>(), Ok(profile));
    }
    assert!("spiral".parse::<Profile>().is_err());
}
