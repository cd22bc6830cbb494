use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use particle_sandbox::*;
use std::hint::black_box;

const DT: f64 = 1.0 / 60.0;

fn prepare_world(body_count: usize, config: SimulationConfig) -> SandboxWorld {
    let mut world = SandboxWorld::new(WorldBounds::default(), config, 7);
    world
        .populate(body_count, 3.0)
        .expect("bench population is valid");
    world
}

fn bench_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");
    for &count in &[64usize, 256, 1024] {
        let base = SimulationConfig {
            collisions_enabled: true,
            gravity_vertical_enabled: true,
            ..SimulationConfig::quiescent()
        };
        group.bench_with_input(BenchmarkId::new("collisions", count), &count, |b, &count| {
            let mut world = prepare_world(count, base.clone());
            b.iter(|| world.step(black_box(DT)))
        });

        let radial = SimulationConfig {
            gravity_radial_enabled: true,
            ..base.clone()
        };
        group.bench_with_input(
            BenchmarkId::new("radial_sequential", count),
            &count,
            |b, &count| {
                let mut world = prepare_world(count, radial.clone());
                world.set_parallel_enabled(false);
                b.iter(|| world.step(black_box(DT)))
            },
        );
        group.bench_with_input(
            BenchmarkId::new("radial_parallel", count),
            &count,
            |b, &count| {
                let mut world = prepare_world(count, radial.clone());
                world.set_parallel_enabled(true);
                b.iter(|| world.step(black_box(DT)))
            },
        );
    }
    group.finish();
}

fn bench_spring_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("spring_graph");
    for &count in &[64usize, 256] {
        group.bench_with_input(BenchmarkId::new("grow_and_apply", count), &count, |b, &count| {
            let config = SimulationConfig {
                springs_enabled: true,
                spring_max_connections: 8,
                ..SimulationConfig::quiescent()
            };
            let mut world = prepare_world(count, config);
            b.iter(|| world.step(black_box(DT)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_world_step, bench_spring_graph);
criterion_main!(benches);
