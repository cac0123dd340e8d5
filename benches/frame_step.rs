//! Benchmarks for the per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;

use particle_field::{
    render, DrawSurface, FieldConfig, FieldFrame, FieldShape, ForceField, Integrator, ParticleStore, PixelSurface,
    PointerState, SpawnParams,
};

const SIZE: Vec2 = Vec2::new(1920.0, 1080.0);

fn pointer() -> PointerState {
    PointerState {
        position: SIZE * 0.5,
        active: true,
    }
}

fn bench_integrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate");
    let config = FieldConfig::default();
    let integrator = Integrator::from_config(&config);
    let frame = FieldFrame::new(&config, 1000.0, 0.0, SIZE, false);

    for (name, shape) in [("standing_wave", FieldShape::StandingWave), ("flow_field", FieldShape::flow())] {
        for count in [800usize, 2200] {
            let field = ForceField::new(shape, config.pointer_radius, config.pointer_strength);
            let mut store = ParticleStore::create(count, SIZE.x, SIZE.y, &SpawnParams::default(), 1);
            group.bench_with_input(BenchmarkId::new(name, count), &count, |b, _| {
                b.iter(|| integrator.step(black_box(&mut store), &field, &frame, &pointer(), 16.0))
            });
        }
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let config = FieldConfig::default();
    let store = ParticleStore::create(2200, SIZE.x, SIZE.y, &SpawnParams::default(), 1);

    for dpr in [1.0f32, 2.0] {
        let mut surface = PixelSurface::new();
        surface.configure(SIZE.x, SIZE.y, dpr);
        group.bench_with_input(BenchmarkId::new("pixel_surface_2200", dpr), &dpr, |b, _| {
            b.iter(|| render(black_box(&mut surface), &store, &config.visuals, 0.5))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_integrate, bench_render);
criterion_main!(benches);
