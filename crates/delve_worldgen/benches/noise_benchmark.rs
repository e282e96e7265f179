//! Benchmark for noise and lattice hash throughput.
//!
//! TARGET: 1,000,000 simplex samples per second
//!
//! Run with: cargo bench --package delve_worldgen --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use delve_worldgen::{generate_halo, LatticeHash, SimplexNoise, WorldSeed};

fn benchmark_single_sample(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(42));

    c.bench_function("single_noise_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.sample(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_million_samples(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(42));

    let mut group = c.benchmark_group("million_samples");
    group.throughput(Throughput::Elements(1_000_000));
    group.sample_size(10);

    group.bench_function("1M_noise_samples", |b| {
        b.iter(|| {
            for i in 0..1_000_000u32 {
                let x = f64::from(i % 1000) * 0.1;
                let y = f64::from(i / 1000) * 0.1;
                black_box(noise.sample(x, y));
            }
        });
    });

    group.finish();
}

fn benchmark_octaved_noise(c: &mut Criterion) {
    let noise = SimplexNoise::new(WorldSeed::new(42));

    c.bench_function("octaved_noise_3_octaves", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.octaved(black_box(x), black_box(x * 0.7), 3, 0.5, 2.0))
        });
    });
}

fn benchmark_lattice_hash(c: &mut Criterion) {
    let hash = LatticeHash::new(WorldSeed::new(42));

    c.bench_function("lattice_hash_random", |b| {
        let mut i = 0i64;
        b.iter(|| {
            i += 1;
            black_box(hash.random(black_box(i), black_box(-i)))
        });
    });

    c.bench_function("lattice_hash_smooth", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.37;
            black_box(hash.smooth(black_box(x), black_box(x * 0.5)))
        });
    });
}

fn benchmark_halo(c: &mut Criterion) {
    let seed = WorldSeed::new(42);

    c.bench_function("halo_radius_3", |b| {
        let mut x = 0i64;
        b.iter(|| {
            x += 7;
            black_box(generate_halo((x, 100), 1.0, 3.0, seed))
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_sample,
    benchmark_million_samples,
    benchmark_octaved_noise,
    benchmark_lattice_hash,
    benchmark_halo
);
criterion_main!(benches);
