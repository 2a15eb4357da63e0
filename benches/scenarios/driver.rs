//! Benchmarks for complete audio callback blocks.
//!
//! The controller publishes a new pointer position before every block, so each
//! iteration pays for draining the parameter queue and installing coefficients.

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion};
use xypad::{
    dsp::{FilterKind, Waveform},
    io::AudioOutput,
    synth::{control_channel, AudioDriver, ControlGeometry, ParameterController, SampleRateContext},
    WaveformSnapshot,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn session(
    block_size: usize,
    waveform: Waveform,
    filter: FilterKind,
) -> (ParameterController, AudioDriver) {
    let (tx, rx) = control_channel();
    let mut driver = AudioDriver::new(rx, Arc::new(WaveformSnapshot::new()));
    driver.prepare(SampleRateContext::new(SAMPLE_RATE, block_size));

    let mut controller = ParameterController::new(
        SAMPLE_RATE,
        ControlGeometry::new(400.0, 400.0),
        tx,
    );
    controller.select_waveform(waveform);
    controller.select_filter(filter);
    controller.pointer_down(200.0, 200.0);

    (controller, driver)
}

pub fn bench_driver(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/driver");

    let cases = [
        ("sine_dry", Waveform::Sine, FilterKind::None),
        ("sine_lowpass", Waveform::Sine, FilterKind::LowPass),
        ("pulse_bandpass", Waveform::PulseTrain, FilterKind::BandPass),
    ];

    for &size in BLOCK_SIZES {
        for (name, waveform, filter) in cases {
            let (mut controller, mut driver) = session(size, waveform, filter);
            let mut output = AudioOutput::new(2, size);
            let mut x = 0.0f32;

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| {
                    // Sweep the pointer so every block sees a fresh snapshot
                    x = (x + 1.0) % 400.0;
                    controller.pointer_drag(x, 200.0);
                    let _ = driver.process_block(black_box(&mut output), size);
                })
            });
        }
    }

    group.finish();
}
