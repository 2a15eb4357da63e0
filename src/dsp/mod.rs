//! Low-level DSP primitives driven by the audio callback.
//!
//! Everything here is allocation-free and realtime-safe. Coefficient design
//! does use trigonometry, so it is expected to run on the control thread and
//! hand finished coefficient sets to the audio thread.

/// Biquad filter design, the per-kind filter stage and the filter bank.
pub mod filter;
/// Sine and pulse-train signal generator.
pub mod oscillator;

pub use filter::{BiquadCoefficients, FilterBank, FilterDesign, FilterKind, FilterStage};
pub use oscillator::{phase_increment, Oscillator, Waveform};
