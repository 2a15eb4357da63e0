use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Signal Generator
================

Two waveforms, both advanced exactly one step per output sample.

Sine
----

    out[n]  = sin(phase) * amplitude
    phase  += phase_increment          where phase_increment = 2π·f / sample_rate

The phase starts at 0, so the first sample of a fresh generator is exactly 0.0.
It is wrapped back into [0, 2π) whenever it leaves that range (a negative
frequency runs the phase backwards); letting it grow without bound would
slowly eat the f32 mantissa and detune long notes.

Pulse Train
-----------

    elapsed += 1 / sample_rate
    period   = 1 / f
    out[n]   = 1.0  if (elapsed mod period) / period < duty
               0.0  otherwise

    1.0 ┐█              █              █
        │█              █              █
    0.0 └█▁▁▁▁▁▁▁▁▁▁▁▁▁▁█▁▁▁▁▁▁▁▁▁▁▁▁▁▁█▁▁→ time
         |<-- period -->|
         duty = 10%

The elapsed clock is an f64 accumulator so it keeps sample resolution for
hours of playback. Pulse output is always exactly 0.0 or 1.0: amplitude is
not applied to it, only to the sine.

A sample rate of zero (or anything non-finite / negative) disables advancement:
the sine freezes at its current phase and the pulse train outputs silence.
*/

/// Fraction of each pulse period spent high.
pub const PULSE_DUTY_CYCLE: f64 = 0.1;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    PulseTrain,
}

impl Waveform {
    pub fn label(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine Wave",
            Waveform::PulseTrain => "Train of Pulses",
        }
    }
}

/// Per-sample radian advance for `frequency_hz` at `sample_rate`.
///
/// Returns 0.0 for a sample rate that is not strictly positive and finite.
#[inline]
pub fn phase_increment(frequency_hz: f32, sample_rate: f32) -> f32 {
    if sample_rate > 0.0 && sample_rate.is_finite() && frequency_hz.is_finite() {
        TAU * frequency_hz / sample_rate
    } else {
        0.0
    }
}

pub struct Oscillator {
    waveform: Waveform,
    frequency_hz: f32,
    amplitude: f32,
    sample_rate: f32,
    phase: f32,
    phase_increment: f32,
    elapsed: f64,
}

impl Oscillator {
    pub fn new(sample_rate: f32) -> Self {
        let frequency_hz = 440.0;
        Self {
            waveform: Waveform::Sine,
            frequency_hz,
            amplitude: 1.0,
            sample_rate,
            phase: 0.0,
            phase_increment: phase_increment(frequency_hz, sample_rate),
            elapsed: 0.0,
        }
    }

    pub fn sine(sample_rate: f32, frequency_hz: f32, amplitude: f32) -> Self {
        let mut osc = Self::new(sample_rate);
        osc.set_frequency(frequency_hz);
        osc.set_amplitude(amplitude);
        osc
    }

    pub fn pulse_train(sample_rate: f32, frequency_hz: f32) -> Self {
        let mut osc = Self::new(sample_rate);
        osc.set_waveform(Waveform::PulseTrain);
        osc.set_frequency(frequency_hz);
        osc
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.phase_increment = phase_increment(self.frequency_hz, sample_rate);
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn set_frequency(&mut self, frequency_hz: f32) {
        self.frequency_hz = frequency_hz;
        self.phase_increment = phase_increment(frequency_hz, self.sample_rate);
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude.clamp(0.0, 1.0);
    }

    /// Rewind phase and the pulse clock to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.elapsed = 0.0;
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        match self.waveform {
            Waveform::Sine => self.next_sine(),
            Waveform::PulseTrain => self.next_pulse(),
        }
    }

    /// Fill `out` with consecutive samples, dispatching on the waveform once.
    pub fn render(&mut self, out: &mut [f32]) {
        match self.waveform {
            Waveform::Sine => out.iter_mut().for_each(|s| *s = self.next_sine()),
            Waveform::PulseTrain => out.iter_mut().for_each(|s| *s = self.next_pulse()),
        }
    }

    #[inline]
    fn next_sine(&mut self) -> f32 {
        let sample = self.phase.sin() * self.amplitude;
        self.phase += self.phase_increment;
        if !(0.0..TAU).contains(&self.phase) {
            self.phase = self.phase.rem_euclid(TAU);
            // rem_euclid can round a tiny negative phase up to exactly TAU
            if self.phase >= TAU {
                self.phase = 0.0;
            }
        }
        sample
    }

    #[inline]
    fn next_pulse(&mut self) -> f32 {
        if !(self.sample_rate > 0.0 && self.sample_rate.is_finite()) || self.frequency_hz <= 0.0 {
            return 0.0;
        }

        self.elapsed += 1.0 / self.sample_rate as f64;
        let period = 1.0 / self.frequency_hz as f64;
        let position = (self.elapsed % period) / period;

        if position < PULSE_DUTY_CYCLE {
            1.0
        } else {
            0.0
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency(&self) -> f32 {
        self.frequency_hz
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn phase_increment(&self) -> f32 {
        self.phase_increment
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}
