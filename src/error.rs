use std::fmt;

/// Failures surfaced by the synthesis core.
///
/// None of these are raised from inside the per-sample loop: the audio path
/// degrades to silence or passthrough and reports at most once per block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SynthError {
    /// A pointer coordinate fell outside the control region.
    InvalidParameterRange { x: f32, y: f32 },
    /// A filter stage was asked to process before any coefficients were installed.
    FilterNotReady,
    /// `process_block` was called before `prepare` or after `release`.
    UninitializedSession,
    /// Sample rate was zero, negative or not finite.
    InvalidSampleRate(f32),
    /// A filter design frequency was zero, negative or not finite.
    InvalidFrequency(f32),
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::InvalidParameterRange { x, y } => {
                write!(f, "point ({x}, {y}) is outside the control region")
            }
            SynthError::FilterNotReady => write!(f, "filter has no coefficients installed"),
            SynthError::UninitializedSession => {
                write!(f, "audio session has not been prepared")
            }
            SynthError::InvalidSampleRate(rate) => write!(f, "invalid sample rate: {rate} Hz"),
            SynthError::InvalidFrequency(freq) => write!(f, "invalid filter frequency: {freq} Hz"),
        }
    }
}

impl std::error::Error for SynthError {}
