use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ts_core::api::presets;
use ts_core::models::AxiomInputs;
use ts_core::TimeSphere;

fn bench_simulate(c: &mut Criterion) {
    c.bench_function("simulate_250_steps_basic_growth", |b| {
        b.iter(|| {
            let mut sphere = TimeSphere::new(AxiomInputs::new(
                0.6, 0.4, 0.5, 0.7, 0.3, 0.5, 2.0, 0.0,
            ));
            presets::apply(presets::BASIC_GROWTH, &mut sphere).unwrap();
            black_box(sphere.simulate(250).unwrap())
        })
    });

    c.bench_function("simulate_250_steps_no_rules", |b| {
        b.iter(|| {
            let mut sphere = TimeSphere::new(AxiomInputs::uniform(0.5));
            black_box(sphere.simulate(250).unwrap())
        })
    });
}

criterion_group!(benches, bench_simulate);
criterion_main!(benches);
