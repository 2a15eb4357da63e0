//! Benchmarks for the biquad stages.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use xypad::dsp::{FilterDesign, FilterStage};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    let designs = [
        ("lowpass", FilterDesign::LowPass { cutoff_hz: 1_000.0 }),
        ("highpass", FilterDesign::HighPass { cutoff_hz: 1_000.0 }),
        ("bandpass", FilterDesign::BandPass { central_hz: 1_000.0 }),
    ];

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for (name, design) in designs {
            let mut stage = FilterStage::new();
            stage.configure(design, SAMPLE_RATE).unwrap();

            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    stage.render(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
