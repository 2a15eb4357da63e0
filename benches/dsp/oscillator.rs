//! Benchmarks for the sine and pulse-train generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use xypad::dsp::Oscillator;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - sin() per sample plus phase wrap
        let mut osc = Oscillator::sine(48_000.0, 440.0, 0.8);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });

        // Pulse train - f64 clock and a modulo per sample
        let mut osc = Oscillator::pulse_train(48_000.0, 440.0);
        group.bench_with_input(BenchmarkId::new("pulse_train", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
