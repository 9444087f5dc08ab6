use criterion::{criterion_group, criterion_main, Criterion};
use kepler_orbits::{transfer::calculate_transfer, OrbitState, TransferSettings};
use std::hint::black_box;

fn criterion_benchmark(c: &mut Criterion) {
    let inner = OrbitState::from_elements(0.0, 10.0, 0.0, 0.0, 0.0, 0.0, 1000.0, 0.1);
    let outer = OrbitState::from_elements(0.0, 20.0, 180.0, 0.0, 0.0, 0.0, 1000.0, 0.1);
    let eccentric = OrbitState::from_elements(0.3, 25.0, 120.0, 5.0, 40.0, 10.0, 1000.0, 0.1);

    let mut group = c.benchmark_group("transfer");

    let hohmann = TransferSettings::default();
    group.bench_function("minimum energy", |b| {
        b.iter(|| calculate_transfer(black_box(&inner), black_box(&outer), &hohmann))
    });

    let timed = TransferSettings {
        target_duration: 12.0,
        ..Default::default()
    };
    group.bench_function("timed", |b| {
        b.iter(|| calculate_transfer(black_box(&inner), black_box(&outer), &timed))
    });

    let reverse = TransferSettings {
        target_duration: 30.0,
        is_reverse_orbit: true,
        ..Default::default()
    };
    group.bench_function("timed reverse to eccentric target", |b| {
        b.iter(|| calculate_transfer(black_box(&inner), black_box(&eccentric), &reverse))
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
