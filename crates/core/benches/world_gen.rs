use criterion::{black_box, criterion_group, criterion_main, Criterion};
use isle::{Seed, World, WorldConfig};

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("world-generation");
    group.sample_size(10);

    let config = WorldConfig {
        seed: Seed::Int(1),
        ..Default::default()
    };
    group.bench_function("world gen", |b| {
        b.iter(|| World::generate(black_box(config.clone())))
    });

    let config = WorldConfig {
        seed: Seed::Int(1),
        size: 250,
        ..Default::default()
    };
    group.bench_function("world gen large", |b| {
        b.iter(|| World::generate(black_box(config.clone())))
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
