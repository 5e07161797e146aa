//! Headless Cube Field Runner
//!
//! Mounts a field on the in-memory host and device, runs it for a number of
//! frames and logs what happened. Useful for profiling the simulation and for
//! checking a configuration file without a GPU.
//!
//! Usage:
//!
//! ```text
//! cubefield-headless [ascent|oscillation|<config.json>] [frames]
//! ```
//!
//! Set `RUST_LOG=debug` to see per-second frame rates.

use cubefield::host::drive;
use cubefield::{Engine, FieldConfig, HeadlessDevice, HeadlessHost, Profile, RenderDevice, Viewport};

const DEFAULT_FRAMES: usize = 600;

fn load_config(arg: Option<&str>) -> cubefield::Result<FieldConfig> {
    match arg {
        None => Ok(FieldConfig::default()),
        Some(name) => match name.parse::<Profile>() {
            Ok(profile) => Ok(FieldConfig::for_profile(profile)),
            Err(_) => FieldConfig::from_json_file(name),
        },
    }
}

fn main() -> cubefield::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let frames = args
        .get(1)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let mut host = HeadlessHost::new(Viewport::new(1280, 720, 2.0));
    let mut engine = Engine::new(config, HeadlessDevice::new())?;
    engine.mount(&mut host)?;

    let advanced = drive(&mut engine, &mut host, frames);
    let stats = engine.stats();
    log::info!(
        "{advanced} frames advanced, {} cubes recycled, {} failed, {} live resources",
        stats.recycled_total,
        stats.failed_frames,
        stats.live_resources
    );
    if let Some(summary) = engine.device().last_frame() {
        log::info!(
            "last frame: {} cubes, {} particles, passes {:?}, surface {:?}",
            summary.cube_count,
            summary.particle_count,
            summary.pass_names,
            summary.surface_size
        );
    }

    engine.unmount(&mut host);
    log::info!("{} resources left after unmount", engine.device().live_resources());
    Ok(())
}
