use std::f32::consts::{FRAC_1_SQRT_2, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SynthError;

/*
| kind       | designed from        | passes                  | Q                     |
| ---------- | -------------------- | ----------------------- | --------------------- |
| low-pass   | cutoff (-3 dB)       | below cutoff            | 1/√2 (Butterworth)    |
| high-pass  | cutoff (-3 dB)       | above cutoff            | 1/√2 (Butterworth)    |
| band-pass  | central frequency    | central ± bandwidth / 2 | central / bandwidth   |

Coefficients follow the RBJ audio-EQ cookbook, normalised so a0 = 1:

    w0    = 2π·f / fs
    alpha = sin(w0) / (2Q)

                 b0          b1          b2         a1          a2
    low-pass   (1-cos)/2    1-cos      (1-cos)/2   -2cos       1-alpha
    high-pass  (1+cos)/2   -(1+cos)    (1+cos)/2   -2cos       1-alpha
    band-pass   alpha        0         -alpha      -2cos       1-alpha
                                                       (all divided by 1+alpha)

Band-pass bandwidth is derived as central / 5, which makes Q a constant 5 and
keeps 0 dB gain at the centre frequency.

Processing uses transposed direct form II, two words of memory per stage:

    y  = b0·x + s1
    s1 = b1·x - a1·y + s2
    s2 = b2·x - a2·y
*/

/// Q of the low-pass and high-pass designs.
pub const BUTTERWORTH_Q: f32 = FRAC_1_SQRT_2;

/// Band-pass bandwidth is the central frequency divided by this.
pub const BANDWIDTH_DIVISOR: f32 = 5.0;

/// Design frequencies are clamped to this fraction of the sample rate.
const MAX_NORMALIZED_FREQ: f32 = 0.49;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    #[default]
    None,
    LowPass,
    HighPass,
    BandPass,
}

impl FilterKind {
    pub fn label(self) -> &'static str {
        match self {
            FilterKind::None => "None",
            FilterKind::LowPass => "Low Pass Filter",
            FilterKind::HighPass => "High Pass Filter",
            FilterKind::BandPass => "Band Pass Filter",
        }
    }
}

/// Bandwidth (Hz) used for a band-pass centred on `central_hz`.
#[inline]
pub fn band_pass_bandwidth(central_hz: f32) -> f32 {
    central_hz / BANDWIDTH_DIVISOR
}

/// A filter kind together with the frequency arguments it is designed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterDesign {
    LowPass { cutoff_hz: f32 },
    HighPass { cutoff_hz: f32 },
    BandPass { central_hz: f32 },
}

impl FilterDesign {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterDesign::LowPass { .. } => FilterKind::LowPass,
            FilterDesign::HighPass { .. } => FilterKind::HighPass,
            FilterDesign::BandPass { .. } => FilterKind::BandPass,
        }
    }

    pub fn coefficients(&self, sample_rate: f32) -> Result<BiquadCoefficients, SynthError> {
        match *self {
            FilterDesign::LowPass { cutoff_hz } => {
                BiquadCoefficients::low_pass(sample_rate, cutoff_hz)
            }
            FilterDesign::HighPass { cutoff_hz } => {
                BiquadCoefficients::high_pass(sample_rate, cutoff_hz)
            }
            FilterDesign::BandPass { central_hz } => BiquadCoefficients::band_pass(
                sample_rate,
                central_hz,
                band_pass_bandwidth(central_hz),
            ),
        }
    }
}

#[derive(Clone, Copy)]
enum Response {
    LowPass,
    HighPass,
    BandPass,
}

/// Immutable, a0-normalised biquad coefficient set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoefficients {
    pub fn low_pass(sample_rate: f32, cutoff_hz: f32) -> Result<Self, SynthError> {
        Self::design(Response::LowPass, sample_rate, cutoff_hz, BUTTERWORTH_Q)
    }

    pub fn high_pass(sample_rate: f32, cutoff_hz: f32) -> Result<Self, SynthError> {
        Self::design(Response::HighPass, sample_rate, cutoff_hz, BUTTERWORTH_Q)
    }

    pub fn band_pass(
        sample_rate: f32,
        central_hz: f32,
        bandwidth_hz: f32,
    ) -> Result<Self, SynthError> {
        if !(bandwidth_hz > 0.0 && bandwidth_hz.is_finite()) {
            return Err(SynthError::InvalidFrequency(bandwidth_hz));
        }
        Self::design(
            Response::BandPass,
            sample_rate,
            central_hz,
            central_hz / bandwidth_hz,
        )
    }

    fn design(
        response: Response,
        sample_rate: f32,
        frequency_hz: f32,
        q: f32,
    ) -> Result<Self, SynthError> {
        if !(sample_rate > 0.0 && sample_rate.is_finite()) {
            return Err(SynthError::InvalidSampleRate(sample_rate));
        }
        if !(frequency_hz > 0.0 && frequency_hz.is_finite()) {
            return Err(SynthError::InvalidFrequency(frequency_hz));
        }

        let frequency_hz = frequency_hz.min(MAX_NORMALIZED_FREQ * sample_rate);
        let w0 = TAU * frequency_hz / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);

        let (b0, b1, b2) = match response {
            Response::LowPass => {
                let b = (1.0 - cos_w0) / 2.0;
                (b, 1.0 - cos_w0, b)
            }
            Response::HighPass => {
                let b = (1.0 + cos_w0) / 2.0;
                (b, -(1.0 + cos_w0), b)
            }
            Response::BandPass => (alpha, 0.0, -alpha),
        };

        let a0 = 1.0 + alpha;
        Ok(Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: (-2.0 * cos_w0) / a0,
            a2: (1.0 - alpha) / a0,
        })
    }
}

/// One biquad: installed coefficients plus its own filter memory.
///
/// The stage remembers the design its coefficients came from so a new sample
/// rate can be applied with [`FilterStage::redesign`]. Until coefficients are
/// installed the stage is a passthrough.
#[derive(Debug, Clone, Default)]
pub struct FilterStage {
    design: Option<FilterDesign>,
    coefficients: Option<BiquadCoefficients>,
    s1: f32,
    s2: f32,
}

impl FilterStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Design and install coefficients for `design` at `sample_rate`.
    ///
    /// On error the previously installed design and coefficients are kept.
    pub fn configure(&mut self, design: FilterDesign, sample_rate: f32) -> Result<(), SynthError> {
        let coefficients = design.coefficients(sample_rate)?;
        self.install(design, coefficients);
        Ok(())
    }

    /// Swap in a coefficient set designed elsewhere. Filter memory is kept.
    #[inline]
    pub fn install(&mut self, design: FilterDesign, coefficients: BiquadCoefficients) {
        self.design = Some(design);
        self.coefficients = Some(coefficients);
    }

    /// Recompute the installed design at `sample_rate`.
    ///
    /// A stage that was never configured stays a passthrough. When the rate is
    /// rejected the stale coefficients are dropped and the stage passes audio
    /// through until the next successful design.
    pub fn redesign(&mut self, sample_rate: f32) -> Result<(), SynthError> {
        let Some(design) = self.design else {
            return Ok(());
        };
        match design.coefficients(sample_rate) {
            Ok(coefficients) => {
                self.coefficients = Some(coefficients);
                Ok(())
            }
            Err(err) => {
                self.coefficients = None;
                Err(err)
            }
        }
    }

    pub fn design(&self) -> Option<FilterDesign> {
        self.design
    }

    pub fn coefficients(&self) -> Option<BiquadCoefficients> {
        self.coefficients
    }

    pub fn is_ready(&self) -> bool {
        self.coefficients.is_some()
    }

    /// True when the filter memory holds no history.
    pub fn is_idle(&self) -> bool {
        self.s1 == 0.0 && self.s2 == 0.0
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        match self.coefficients {
            Some(c) => self.tick(&c, sample),
            None => sample,
        }
    }

    pub fn try_process(&mut self, sample: f32) -> Result<f32, SynthError> {
        let c = self.coefficients.ok_or(SynthError::FilterNotReady)?;
        Ok(self.tick(&c, sample))
    }

    /// Filter `buffer` in place. Leaves it untouched when unconfigured.
    pub fn render(&mut self, buffer: &mut [f32]) {
        let Some(c) = self.coefficients else {
            return;
        };
        for sample in buffer.iter_mut() {
            *sample = self.tick(&c, *sample);
        }
    }

    /// Clear filter memory without touching the coefficients.
    pub fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }

    #[inline]
    fn tick(&mut self, c: &BiquadCoefficients, x: f32) -> f32 {
        let y = c.b0 * x + self.s1;
        self.s1 = c.b1 * x - c.a1 * y + self.s2;
        self.s2 = c.b2 * x - c.a2 * y;
        y
    }
}

/// One stage per filter kind, each with independent memory.
#[derive(Debug, Clone, Default)]
pub struct FilterBank {
    low_pass: FilterStage,
    high_pass: FilterStage,
    band_pass: FilterStage,
}

impl FilterBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self, kind: FilterKind) -> Option<&FilterStage> {
        match kind {
            FilterKind::None => None,
            FilterKind::LowPass => Some(&self.low_pass),
            FilterKind::HighPass => Some(&self.high_pass),
            FilterKind::BandPass => Some(&self.band_pass),
        }
    }

    pub fn stage_mut(&mut self, kind: FilterKind) -> Option<&mut FilterStage> {
        match kind {
            FilterKind::None => None,
            FilterKind::LowPass => Some(&mut self.low_pass),
            FilterKind::HighPass => Some(&mut self.high_pass),
            FilterKind::BandPass => Some(&mut self.band_pass),
        }
    }

    /// Route `buffer` through the stage for `kind`. `FilterKind::None` is a no-op.
    pub fn render(&mut self, kind: FilterKind, buffer: &mut [f32]) {
        if let Some(stage) = self.stage_mut(kind) {
            stage.render(buffer);
        }
    }

    pub fn reset_all(&mut self) {
        self.low_pass.reset();
        self.high_pass.reset();
        self.band_pass.reset();
    }

    /// Redesign every configured stage at `sample_rate`. All stages are
    /// visited; the last error is returned.
    pub fn redesign_all(&mut self, sample_rate: f32) -> Result<(), SynthError> {
        [
            self.low_pass.redesign(sample_rate),
            self.high_pass.redesign(sample_rate),
            self.band_pass.redesign(sample_rate),
        ]
        .into_iter()
        .fold(Ok(()), |acc, res| res.and(acc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::Oscillator;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len() / 2;
        buffer[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn impulse(len: usize) -> Vec<f32> {
        let mut buffer = vec![0.0f32; len];
        buffer[0] = 1.0;
        buffer
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let mut stage = FilterStage::new();
        stage
            .configure(FilterDesign::LowPass { cutoff_hz: 1_000.0 }, 48_000.0)
            .unwrap();
        let mut buffer = vec![1.0; 2048];
        stage.render(&mut buffer);

        assert!((buffer[2047] - 1.0).abs() < 1e-3, "got {}", buffer[2047]);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut stage = FilterStage::new();
        stage
            .configure(FilterDesign::HighPass { cutoff_hz: 1_000.0 }, 48_000.0)
            .unwrap();
        let mut buffer = vec![1.0; 2048];
        stage.render(&mut buffer);

        assert!(buffer[2047].abs() < 1e-3, "got {}", buffer[2047]);
    }

    #[test]
    fn test_lowpass_impulse_decays_and_stays_finite() {
        let mut stage = FilterStage::new();
        stage
            .configure(FilterDesign::LowPass { cutoff_hz: 1_000.0 }, 44_100.0)
            .unwrap();
        let mut buffer = impulse(4096);
        stage.render(&mut buffer);

        assert!(buffer.iter().all(|s| s.is_finite()));
        assert!(buffer[0] > 0.0);
        let tail = buffer[2048..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(tail < 1e-4, "impulse response did not decay: {tail}");
    }

    #[test]
    fn test_lowpass_attenuates_high_frequency() {
        let sample_rate = 48_000.0;
        let mut stage = FilterStage::new();
        stage
            .configure(FilterDesign::LowPass { cutoff_hz: 500.0 }, sample_rate)
            .unwrap();

        let mut osc = Oscillator::sine(sample_rate, 5_000.0, 1.0);
        let mut buffer = vec![0.0f32; 1024];
        osc.render(&mut buffer);
        stage.render(&mut buffer);

        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.05, "expected high freq attenuation, got {peak}");
    }

    #[test]
    fn test_bandpass_emphasizes_central_frequency() {
        let sample_rate = 48_000.0;
        let central = 1_000.0;
        let mut stage = FilterStage::new();
        stage
            .configure(FilterDesign::BandPass { central_hz: central }, sample_rate)
            .unwrap();

        let mut on = vec![0.0f32; 2048];
        Oscillator::sine(sample_rate, central, 1.0).render(&mut on);
        stage.render(&mut on);
        let on_peak = peak_after_transient(&on);

        stage.reset();
        let mut off = vec![0.0f32; 2048];
        Oscillator::sine(sample_rate, 200.0, 1.0).render(&mut off);
        stage.render(&mut off);
        let off_peak = peak_after_transient(&off);

        assert!(on_peak > 0.9, "centre should pass near unity, got {on_peak}");
        assert!(
            on_peak > off_peak * 4.0,
            "expected band-pass emphasis, on={on_peak}, off={off_peak}"
        );
    }

    #[test]
    fn test_bandwidth_is_fifth_of_central() {
        assert_eq!(band_pass_bandwidth(1_000.0), 200.0);
        let derived = FilterDesign::BandPass { central_hz: 1_500.0 }
            .coefficients(44_100.0)
            .unwrap();
        let explicit = BiquadCoefficients::band_pass(44_100.0, 1_500.0, 300.0).unwrap();
        assert_eq!(derived, explicit);
    }

    #[test]
    fn test_unconfigured_stage_is_passthrough() {
        let mut stage = FilterStage::new();
        assert!(!stage.is_ready());
        assert_eq!(stage.process(0.75), 0.75);
        assert_eq!(stage.try_process(0.75), Err(SynthError::FilterNotReady));

        let mut buffer = vec![0.3, -0.2, 0.1];
        stage.render(&mut buffer);
        assert_eq!(buffer, vec![0.3, -0.2, 0.1]);
    }

    #[test]
    fn test_reset_forgets_history() {
        let design = FilterDesign::LowPass { cutoff_hz: 800.0 };
        let mut used = FilterStage::new();
        used.configure(design, 44_100.0).unwrap();
        let mut noise: Vec<f32> = (0..256).map(|i| ((i * 7919) % 13) as f32 / 6.0 - 1.0).collect();
        used.render(&mut noise);
        assert!(!used.is_idle());

        used.reset();
        assert!(used.is_idle());

        let mut fresh = FilterStage::new();
        fresh.configure(design, 44_100.0).unwrap();

        let mut a = impulse(128);
        let mut b = impulse(128);
        used.render(&mut a);
        fresh.render(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_configure_keeps_memory() {
        let mut stage = FilterStage::new();
        stage
            .configure(FilterDesign::LowPass { cutoff_hz: 500.0 }, 48_000.0)
            .unwrap();
        stage.process(1.0);
        stage
            .configure(FilterDesign::LowPass { cutoff_hz: 900.0 }, 48_000.0)
            .unwrap();
        assert!(!stage.is_idle());
    }

    #[test]
    fn test_invalid_design_is_rejected() {
        assert_eq!(
            BiquadCoefficients::low_pass(0.0, 1_000.0),
            Err(SynthError::InvalidSampleRate(0.0))
        );
        assert_eq!(
            BiquadCoefficients::high_pass(44_100.0, -5.0),
            Err(SynthError::InvalidFrequency(-5.0))
        );

        let mut stage = FilterStage::new();
        assert!(stage
            .configure(FilterDesign::BandPass { central_hz: 1_000.0 }, -1.0)
            .is_err());
        assert!(!stage.is_ready());
    }

    #[test]
    fn test_frequency_above_nyquist_is_clamped() {
        let design = FilterDesign::LowPass { cutoff_hz: 6_000.0 };
        let c = BiquadCoefficients::low_pass(8_000.0, 6_000.0).unwrap();
        let mut stage = FilterStage::new();
        stage.install(design, c);
        let mut buffer = impulse(1024);
        stage.render(&mut buffer);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_bank_routes_by_kind() {
        let mut bank = FilterBank::new();
        bank.stage_mut(FilterKind::HighPass)
            .unwrap()
            .configure(FilterDesign::HighPass { cutoff_hz: 1_000.0 }, 48_000.0)
            .unwrap();

        let mut untouched = vec![1.0f32; 64];
        bank.render(FilterKind::None, &mut untouched);
        assert!(untouched.iter().all(|&s| s == 1.0));

        let mut unready = vec![1.0f32; 64];
        bank.render(FilterKind::LowPass, &mut unready);
        assert!(unready.iter().all(|&s| s == 1.0));

        let mut filtered = vec![1.0f32; 64];
        bank.render(FilterKind::HighPass, &mut filtered);
        assert!(filtered[63] < 1.0);
        assert!(!bank.stage(FilterKind::HighPass).unwrap().is_idle());

        bank.reset_all();
        assert!(bank.stage(FilterKind::HighPass).unwrap().is_idle());
        assert!(bank.stage(FilterKind::None).is_none());
    }

    #[test]
    fn test_redesign_follows_new_sample_rate() {
        let mut bank = FilterBank::new();
        bank.stage_mut(FilterKind::LowPass)
            .unwrap()
            .configure(FilterDesign::LowPass { cutoff_hz: 1_000.0 }, 44_100.0)
            .unwrap();

        bank.redesign_all(96_000.0).unwrap();

        let stage = bank.stage(FilterKind::LowPass).unwrap();
        assert_eq!(
            stage.coefficients(),
            Some(BiquadCoefficients::low_pass(96_000.0, 1_000.0).unwrap())
        );
        assert!(!bank.stage(FilterKind::HighPass).unwrap().is_ready());
    }

    #[test]
    fn test_redesign_at_invalid_rate_falls_back_to_passthrough() {
        let mut stage = FilterStage::new();
        stage
            .configure(FilterDesign::HighPass { cutoff_hz: 500.0 }, 48_000.0)
            .unwrap();

        assert_eq!(
            stage.redesign(0.0),
            Err(SynthError::InvalidSampleRate(0.0))
        );
        assert!(!stage.is_ready());
        assert_eq!(stage.design(), Some(FilterDesign::HighPass { cutoff_hz: 500.0 }));

        stage.redesign(48_000.0).unwrap();
        assert!(stage.is_ready());
    }
}
