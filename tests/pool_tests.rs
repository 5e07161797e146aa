//! Entity Pool Tests
//!
//! Tests for:
//! - Cube and particle counts per profile
//! - Randomized attributes staying inside their configured ranges
//! - Palette-derived colors (hover color, resting emissive)
//! - Resource ownership: one clone per cube, shared geometry, templates
//! - Atomic construction (rollback on a failed allocation)
//! - Idempotent disposal and seeded determinism

use glam::Vec3;

use cubefield::config::DEFAULT_PALETTE;
use cubefield::math::{FieldRng, hex_to_linear};
use cubefield::pool::CubeMotion;
use cubefield::renderer::{RenderDevice, ResourceKind};
use cubefield::{EntityPool, FieldConfig, FieldError, HeadlessDevice};

const EPSILON: f32 = 1e-5;

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn build(config: &FieldConfig, seed: u64) -> (EntityPool, HeadlessDevice) {
    let mut device = HeadlessDevice::new();
    let mut rng = FieldRng::seeded(seed);
    let pool = EntityPool::build(config, &mut rng, &mut device).expect("pool builds");
    (pool, device)
}

// ============================================================================
// Counts and resources
// ============================================================================

#[test]
fn ascent_pool_has_default_counts() {
    let (pool, _device) = build(&FieldConfig::ascent(), 1);
    assert_eq!(pool.cubes().len(), 80);
    assert_eq!(pool.particles().len(), 300);
    assert_eq!(pool.particles().positions().len(), 900);
    assert_eq!(pool.particles().colors().len(), 900);
}

#[test]
fn oscillation_pool_has_default_counts() {
    let (pool, _device) = build(&FieldConfig::oscillation(), 1);
    assert_eq!(pool.cubes().len(), 60);
    assert_eq!(pool.particles().len(), 200);
}

#[test]
fn every_cube_owns_a_distinct_material() {
    let config = FieldConfig::ascent();
    let (pool, device) = build(&config, 2);

    // geometry + templates + clones + particle geometry + particle material
    let expected = 1 + config.palette.len() + config.cube_count + 2;
    assert_eq!(pool.resource_count(), expected);
    assert_eq!(device.live_resources(), expected);
    assert_eq!(device.live_of_kind(ResourceKind::Geometry), 2);
    assert_eq!(
        device.live_of_kind(ResourceKind::Material),
        config.palette.len() + config.cube_count + 1
    );

    let mut materials: Vec<_> = pool.cubes().iter().map(|c| c.material).collect();
    materials.sort();
    materials.dedup();
    assert_eq!(materials.len(), config.cube_count);
    for template in pool.template_materials() {
        assert!(!materials.contains(template));
    }
}

#[test]
fn labels_identify_resources() {
    let (pool, device) = build(&FieldConfig::ascent(), 3);
    let geometry = pool.cube_geometry().expect("geometry");
    assert_eq!(device.label_of(geometry), Some("cube_geometry"));
    let particles = pool.particle_material().expect("particle material");
    assert_eq!(device.label_of(particles), Some("particle_material"));
}

// ============================================================================
// Attribute ranges
// ============================================================================

#[test]
fn ascent_cubes_spawn_inside_bounds() {
    let config = FieldConfig::ascent();
    let (pool, _device) = build(&config, 4);

    for cube in pool.cubes() {
        assert!(cube.position.x.abs() <= 30.0);
        assert!(cube.position.z.abs() <= 20.0);
        assert!((0.5..2.0).contains(&cube.scale));
        assert_eq!(cube.scale, cube.resting_scale);
        assert!(cube.angular_velocity.abs().max_element() <= 0.01);
        assert!((0.0..=std::f32::consts::TAU).contains(&cube.phase));
        assert!(!cube.hovered);

        let CubeMotion::Ascent {
            height,
            speed,
            countdown,
            threshold,
        } = cube.motion
        else {
            panic!("ascent profile builds ascent motion");
        };
        assert!((-50.0..-30.0).contains(&height));
        assert!((0.02..0.06).contains(&speed));
        assert!(countdown < 1000);
        assert!((2000..3000).contains(&threshold));
    }
}

#[test]
fn oscillation_cubes_have_origin_amplitude_and_velocity() {
    let config = FieldConfig::oscillation();
    let (pool, _device) = build(&config, 5);

    for cube in pool.cubes() {
        let CubeMotion::Oscillation {
            origin,
            amplitude,
            velocity,
        } = cube.motion
        else {
            panic!("oscillation profile builds oscillation motion");
        };
        assert!((-15.0..25.0).contains(&origin.y));
        assert!((1.0..3.0).contains(&amplitude));
        assert!((0.01..0.04).contains(&velocity.x.abs()));
        assert!((0.01..0.04).contains(&velocity.y.abs()));
        assert!((cube.position.y - origin.y).abs() <= amplitude + EPSILON);
    }
}

#[test]
fn particles_spawn_inside_box_with_palette_colors() {
    let config = FieldConfig::ascent();
    let (pool, _device) = build(&config, 6);
    let particles = pool.particles();
    let palette: Vec<Vec3> = DEFAULT_PALETTE.iter().map(|e| e.linear_color()).collect();

    for i in 0..particles.len() {
        let p = particles.position(i);
        assert!(p.x.abs() <= 40.0);
        assert!(p.y.abs() <= 30.0);
        assert!(p.z.abs() <= 30.0);
        assert!((0.5..2.5).contains(&particles.size(i)));
        let color = particles.color(i);
        assert!(palette.iter().any(|c| approx_vec(*c, color)));
    }
}

#[test]
fn colors_follow_palette_entry() {
    let config = FieldConfig::ascent();
    let (pool, _device) = build(&config, 7);

    for cube in pool.cubes() {
        let entry = config.palette[cube.palette_index];
        let base = hex_to_linear(entry.color);
        assert!(approx_vec(cube.base_color, base));
        assert!(approx_vec(cube.hover_color, base * 1.5));
        assert!(approx_vec(cube.rest_emissive, base * 0.2));
        assert!(approx_vec(cube.emissive, hex_to_linear(entry.emissive)));
        assert!((cube.opacity - 0.8).abs() < EPSILON);
        assert!((cube.emissive_intensity - 0.3).abs() < EPSILON);
    }
}

// ============================================================================
// Atomic construction
// ============================================================================

#[test]
fn failed_build_releases_everything() {
    let config = FieldConfig::ascent();
    // Enough for the geometry, templates and some clones, not all of them.
    let mut device = HeadlessDevice::with_budget(40);
    let mut rng = FieldRng::seeded(8);

    let result = EntityPool::build(&config, &mut rng, &mut device);
    assert!(matches!(
        result,
        Err(FieldError::ResourceBudgetExceeded {
            kind: ResourceKind::Material,
            limit: 40
        })
    ));
    assert_eq!(device.live_resources(), 0);
}

#[test]
fn failed_build_keeps_resources_owned_by_others() {
    let config = FieldConfig::ascent();
    let mut device = HeadlessDevice::new();
    let mut rng = FieldRng::seeded(9);
    let existing = EntityPool::build(&config, &mut rng, &mut device).expect("first pool");
    let baseline = device.live_resources();

    device.set_budget(Some(baseline + 10));
    assert!(EntityPool::build(&config, &mut rng, &mut device).is_err());
    assert_eq!(device.live_resources(), baseline);
    assert_eq!(existing.resource_count(), baseline);
}

// ============================================================================
// Disposal and determinism
// ============================================================================

#[test]
fn dispose_is_idempotent() {
    let (mut pool, mut device) = build(&FieldConfig::ascent(), 10);
    let owned = pool.resource_count();

    assert_eq!(pool.dispose(&mut device), owned);
    assert!(pool.is_disposed());
    assert_eq!(device.live_resources(), 0);
    assert_eq!(pool.dispose(&mut device), 0);
    assert_eq!(pool.resource_count(), 0);
}

#[test]
fn same_seed_builds_same_pool() {
    let config = FieldConfig::ascent();
    let (a, _) = build(&config, 42);
    let (b, _) = build(&config, 42);
    for (x, y) in a.cubes().iter().zip(b.cubes()) {
        assert_eq!(x.position, y.position);
        assert_eq!(x.motion, y.motion);
        assert_eq!(x.palette_index, y.palette_index);
    }
    assert_eq!(a.particles().positions(), b.particles().positions());
}

#[test]
fn empty_pool_builds() {
    let config = FieldConfig {
        cube_count: 0,
        particle_count: 0,
        ..FieldConfig::ascent()
    };
    let (pool, device) = build(&config, 11);
    assert!(pool.cubes().is_empty());
    assert!(pool.particles().is_empty());
    assert_eq!(device.live_resources(), 1 + config.palette.len() + 2);
}
