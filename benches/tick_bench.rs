//! Frame loop benchmarks.
//!
//! Measures the per-frame cost of the simulation step and of a full tick
//! (step + frame extraction + headless submission) for both profiles.

use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};

use cubefield::animation::AnimationScheduler;
use cubefield::interaction::PointerState;
use cubefield::math::FieldRng;
use cubefield::utils::FrameState;
use cubefield::{Camera, Engine, EntityPool, FieldConfig, HeadlessDevice, HeadlessHost, Viewport};

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler_step");

    for config in [FieldConfig::ascent(), FieldConfig::oscillation()] {
        let config = config.with_seed(7);
        let name = config.profile().name();

        let mut device = HeadlessDevice::new();
        let mut rng = FieldRng::seeded(7);
        let Ok(mut pool) = EntityPool::build(&config, &mut rng, &mut device) else {
            continue;
        };
        let mut camera = Camera::from_settings(&config.camera, 16.0 / 9.0);
        let pointer = PointerState::new(&config.camera);
        let scheduler = AnimationScheduler::new(&config);

        let mut frame = FrameState::default();
        group.bench_function(name, |b| {
            b.iter(|| {
                frame.time += 1.0 / 60.0;
                frame.frame_count += 1;
                black_box(scheduler.step(&frame, &mut pool, &mut camera, &pointer, &mut rng))
            });
        });

        pool.dispose(&mut device);
    }
    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_tick");

    for config in [FieldConfig::ascent(), FieldConfig::oscillation()] {
        let config = config.with_seed(7);
        let name = config.profile().name();

        let mut host = HeadlessHost::new(Viewport::new(1280, 720, 1.0));
        host.set_frame_interval(Duration::from_millis(16));
        let Ok(mut engine) = Engine::new(config, HeadlessDevice::new()) else {
            continue;
        };
        if engine.mount(&mut host).is_err() {
            continue;
        }

        group.bench_function(name, |b| {
            b.iter(|| {
                if let Some((handle, timestamp)) = host.take_frame() {
                    black_box(engine.tick(&mut host, handle, timestamp));
                }
            });
        });

        engine.unmount(&mut host);
    }
    group.finish();
}

criterion_group!(benches, bench_step, bench_tick);
criterion_main!(benches);
