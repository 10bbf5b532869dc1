//! Criterion benchmarks for slicer-core DSP primitives
//!
//! Run with: cargo bench -p slicer-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use slicer_core::{
    AllpassFilter, Biquad, CombFilter, DelayLine, OnePole, low_shelf_coefficients,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::new("low_shelf", block_size),
            &block_size,
            |b, _| {
                let mut biquad = Biquad::new();
                biquad.apply(low_shelf_coefficients(200.0, 0.707, 6.0, SAMPLE_RATE));
                b.iter(|| {
                    for &sample in &input {
                        black_box(biquad.process(black_box(sample)));
                    }
                });
            },
        );
    }

    group.bench_function("coefficient_calc", |b| {
        b.iter(|| {
            black_box(low_shelf_coefficients(
                black_box(200.0),
                black_box(0.707),
                black_box(6.0),
                black_box(SAMPLE_RATE),
            ))
        });
    });

    group.finish();
}

fn bench_reverb_elements(c: &mut Criterion) {
    let mut group = c.benchmark_group("ReverbElements");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(BenchmarkId::new("comb", block_size), &block_size, |b, _| {
            let mut comb = CombFilter::new(1557);
            comb.set_feedback(0.79);
            comb.set_damp(0.6);
            b.iter(|| {
                for &sample in &input {
                    black_box(comb.process(black_box(sample)));
                }
            });
        });
        group.bench_with_input(
            BenchmarkId::new("allpass", block_size),
            &block_size,
            |b, _| {
                let mut allpass = AllpassFilter::new(556);
                b.iter(|| {
                    for &sample in &input {
                        black_box(allpass.process(black_box(sample)));
                    }
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("highpass", block_size),
            &block_size,
            |b, _| {
                let mut hp = OnePole::highpass(SAMPLE_RATE, 100.0);
                b.iter(|| {
                    for &sample in &input {
                        black_box(hp.process(black_box(sample)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("DelayLine");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut delay = DelayLine::new(96000);
                b.iter(|| {
                    for &sample in &input {
                        black_box(delay.tap(12000));
                        delay.write(black_box(sample));
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_biquad, bench_reverb_elements, bench_delay);
criterion_main!(benches);
