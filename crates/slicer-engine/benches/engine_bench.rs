//! Criterion benchmarks for the loop engine
//!
//! Run with: cargo bench -p slicer-engine
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use slicer_engine::{Engine, EngineConfig, EngineParameters, SliceDetector};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn generate_take(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            let click = if i % 4800 == 0 { 0.5 } else { 0.0 };
            (2.0 * std::f32::consts::PI * 220.0 * t).sin() * 0.4 + click
        })
        .collect()
}

fn loaded_engine(voices: usize) -> Engine {
    let mut engine = Engine::with_parameters(
        EngineConfig {
            loop_seconds: 2.0,
            seed: Some(1),
            ..EngineConfig::default()
        },
        EngineParameters {
            mix: 0.7,
            feedback: 0.3,
            delay_wet: 0.3,
            reverb_wet: 0.3,
            eq_low_db: 3.0,
            ..EngineParameters::default()
        },
    )
    .expect("valid config");

    let take = generate_take(96_000);
    let mut left = vec![0.0; 1024];
    let mut right = vec![0.0; 1024];
    engine.set_recording(true);
    for chunk in take.chunks(1024) {
        engine.process(chunk, &mut left[..chunk.len()], &mut right[..chunk.len()]);
    }
    engine.set_recording(false);
    engine.set_voices(voices);
    engine
}

fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine");

    for voices in [1, 8] {
        for &block_size in BLOCK_SIZES {
            let input = generate_take(block_size);
            group.bench_with_input(
                BenchmarkId::new(format!("{voices}_voices"), block_size),
                &block_size,
                |b, &size| {
                    let mut engine = loaded_engine(voices);
                    let mut left = vec![0.0; size];
                    let mut right = vec![0.0; size];
                    b.iter(|| {
                        engine.process(black_box(&input), &mut left, &mut right);
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_detector(c: &mut Criterion) {
    let take = generate_take(480_000);
    c.bench_function("SliceDetector/10s", |b| {
        b.iter(|| black_box(SliceDetector::detect(black_box(&take), 0.5, 96)));
    });
}

criterion_group!(benches, bench_process, bench_detector);
criterion_main!(benches);
