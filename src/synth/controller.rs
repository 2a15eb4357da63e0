//! Pointer position → synthesis parameters.
//!
//! Runs on the control thread. The vertical axis always sets the frequency;
//! what the horizontal axis sets depends on the active filter:
//!
//! | filter              | x-axis                 | amplitude |
//! | ------------------- | ---------------------- | --------- |
//! | none                | amplitude 0.0 → 1.0    | from x    |
//! | low-pass/high-pass  | cutoff 20 → 3000 Hz    | 1.0       |
//! | band-pass           | central 200 → 3000 Hz  | 1.0       |
//!
//! After every change the full state is pushed to the audio thread as a
//! [`ParamSnapshot`], with filter coefficients already designed here so the
//! audio thread never runs the coefficient math.

use std::fmt;

use rtrb::Producer;
use tracing::{debug, warn};

use crate::{
    dsp::{phase_increment, BiquadCoefficients, FilterDesign, FilterKind, Waveform},
    error::SynthError,
    synth::message::ParamSnapshot,
};

/// Frequency at the top edge of the control region.
pub const FREQUENCY_TOP_HZ: f32 = 5_000.0;
/// Frequency at the bottom edge of the control region.
pub const FREQUENCY_BOTTOM_HZ: f32 = 20.0;
pub const CUTOFF_RANGE_HZ: (f32, f32) = (20.0, 3_000.0);
pub const CENTRAL_RANGE_HZ: (f32, f32) = (200.0, 3_000.0);

/// Linear map of `value` from `[src_min, src_max]` onto `[dst_min, dst_max]`.
#[inline]
pub fn map_range(value: f32, src_min: f32, src_max: f32, dst_min: f32, dst_max: f32) -> f32 {
    if src_max == src_min {
        return dst_min;
    }
    dst_min + (dst_max - dst_min) * (value - src_min) / (src_max - src_min)
}

/// Size of the rectangular control region, in host-local units with the
/// origin at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlGeometry {
    pub width: f32,
    pub height: f32,
}

impl ControlGeometry {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    pub fn check(&self, x: f32, y: f32) -> Result<(), SynthError> {
        if self.contains(x, y) {
            Ok(())
        } else {
            Err(SynthError::InvalidParameterRange { x, y })
        }
    }

    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        let x = if x.is_nan() { 0.0 } else { x };
        let y = if y.is_nan() { 0.0 } else { y };
        (x.clamp(0.0, self.width), y.clamp(0.0, self.height))
    }

    pub fn frequency_at(&self, y: f32) -> f32 {
        map_range(y, 0.0, self.height, FREQUENCY_TOP_HZ, FREQUENCY_BOTTOM_HZ)
    }

    pub fn amplitude_at(&self, x: f32) -> f32 {
        map_range(x, 0.0, self.width, 0.0, 1.0)
    }

    pub fn cutoff_at(&self, x: f32) -> f32 {
        map_range(x, 0.0, self.width, CUTOFF_RANGE_HZ.0, CUTOFF_RANGE_HZ.1)
    }

    pub fn central_at(&self, x: f32) -> f32 {
        map_range(x, 0.0, self.width, CENTRAL_RANGE_HZ.0, CENTRAL_RANGE_HZ.1)
    }
}

/// Host input, already translated into control-region coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerDrag { x: f32, y: f32 },
    PointerUp,
    SelectWaveform(Waveform),
    SelectFilter(FilterKind),
    Resize(ControlGeometry),
}

/// Values shown next to the scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSummary {
    pub waveform: Waveform,
    pub filter: FilterKind,
    pub frequency_hz: f32,
    pub amplitude: f32,
    pub cutoff_hz: f32,
    pub central_hz: f32,
}

impl ParameterSummary {
    pub fn x_axis_label(&self) -> String {
        match self.filter {
            FilterKind::None => format!("Current amplitude (x-axis): {:.2}", self.amplitude),
            FilterKind::LowPass | FilterKind::HighPass => {
                format!("Current cut-off frequency (x-axis): {:.2}", self.cutoff_hz)
            }
            FilterKind::BandPass => format!("Central frequency (x-axis): {:.2}", self.central_hz),
        }
    }

    pub fn y_axis_label(&self) -> String {
        format!("Current frequency (y-axis): {:.2}", self.frequency_hz)
    }
}

impl fmt::Display for ParameterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.x_axis_label(), self.y_axis_label())
    }
}

pub struct ParameterController {
    geometry: ControlGeometry,
    sample_rate: f32,
    generating: bool,
    waveform: Waveform,
    filter: FilterKind,
    frequency_hz: f32,
    amplitude: f32,
    /// Last mapped cutoff, `None` until the pointer has set one.
    cutoff_hz: Option<f32>,
    /// Last mapped central frequency, `None` until the pointer has set one.
    central_hz: Option<f32>,
    coefficients: Option<BiquadCoefficients>,
    reset_epoch: u32,
    tx: Producer<ParamSnapshot>,
    /// Set when the newest snapshot could not be queued.
    dirty: bool,
}

impl ParameterController {
    pub fn new(sample_rate: f32, geometry: ControlGeometry, tx: Producer<ParamSnapshot>) -> Self {
        let defaults = ParamSnapshot::default();
        Self {
            geometry,
            sample_rate,
            generating: defaults.generating,
            waveform: defaults.waveform,
            filter: defaults.filter,
            frequency_hz: defaults.frequency_hz,
            amplitude: defaults.amplitude,
            cutoff_hz: None,
            central_hz: None,
            coefficients: None,
            reset_epoch: defaults.reset_epoch,
            tx,
            dirty: false,
        }
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(x, y),
            InputEvent::PointerDrag { x, y } => self.pointer_drag(x, y),
            InputEvent::PointerUp => self.pointer_up(),
            InputEvent::SelectWaveform(waveform) => self.select_waveform(waveform),
            InputEvent::SelectFilter(kind) => self.select_filter(kind),
            InputEvent::Resize(geometry) => self.set_geometry(geometry),
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.generating = true;
        self.update_signal(x, y);
    }

    pub fn pointer_drag(&mut self, x: f32, y: f32) {
        self.update_signal(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.generating = false;
        self.publish();
    }

    /// Map a point in the control region onto the synthesis parameters.
    ///
    /// Points outside the region are clamped onto its edge.
    pub fn update_signal(&mut self, x: f32, y: f32) {
        let (x, y) = self.geometry.clamp(x, y);
        self.frequency_hz = self.geometry.frequency_at(y);

        match self.filter {
            FilterKind::None => {
                self.amplitude = self.geometry.amplitude_at(x);
            }
            FilterKind::LowPass | FilterKind::HighPass => {
                self.amplitude = 1.0;
                self.cutoff_hz = Some(self.geometry.cutoff_at(x));
                self.reconfigure_filter();
            }
            FilterKind::BandPass => {
                self.amplitude = 1.0;
                self.central_hz = Some(self.geometry.central_at(x));
                self.reconfigure_filter();
            }
        }

        self.publish();
    }

    pub fn select_waveform(&mut self, waveform: Waveform) {
        if self.waveform != waveform {
            debug!(waveform = waveform.label(), "waveform selected");
        }
        self.waveform = waveform;
        self.publish();
    }

    pub fn select_filter(&mut self, kind: FilterKind) {
        debug!(filter = kind.label(), "filter selected");
        self.filter = kind;

        if kind == FilterKind::None {
            self.reset_epoch = self.reset_epoch.wrapping_add(1);
            self.coefficients = None;
        } else {
            self.amplitude = 1.0;
            self.reconfigure_filter();
        }

        self.publish();
    }

    pub fn set_geometry(&mut self, geometry: ControlGeometry) {
        self.geometry = geometry;
    }

    /// Follow the audio session onto a new sample rate: the active filter is
    /// redesigned and the new state published.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if self.sample_rate == sample_rate {
            return;
        }
        debug!(sample_rate, "control sample rate changed");
        self.sample_rate = sample_rate;
        self.reconfigure_filter();
        self.publish();
    }

    /// Retry a snapshot that did not fit in the ring. Returns true when the
    /// audio thread has been handed the current state.
    pub fn flush(&mut self) -> bool {
        if self.dirty {
            self.publish();
        }
        !self.dirty
    }

    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            generating: self.generating,
            waveform: self.waveform,
            frequency_hz: self.frequency_hz,
            amplitude: self.amplitude,
            filter: self.filter,
            design: self.design(),
            coefficients: self.coefficients,
            design_rate: self.sample_rate,
            reset_epoch: self.reset_epoch,
        }
    }

    pub fn summary(&self) -> ParameterSummary {
        ParameterSummary {
            waveform: self.waveform,
            filter: self.filter,
            frequency_hz: self.frequency_hz,
            amplitude: self.amplitude,
            cutoff_hz: self.cutoff_hz.unwrap_or(0.0),
            central_hz: self.central_hz.unwrap_or(0.0),
        }
    }

    pub fn geometry(&self) -> ControlGeometry {
        self.geometry
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    pub fn frequency(&self) -> f32 {
        self.frequency_hz
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn cutoff(&self) -> Option<f32> {
        self.cutoff_hz
    }

    pub fn central(&self) -> Option<f32> {
        self.central_hz
    }

    pub fn coefficients(&self) -> Option<BiquadCoefficients> {
        self.coefficients
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn phase_increment(&self) -> f32 {
        phase_increment(self.frequency_hz, self.sample_rate)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn design(&self) -> Option<FilterDesign> {
        match self.filter {
            FilterKind::None => None,
            FilterKind::LowPass => {
                self.cutoff_hz.map(|cutoff_hz| FilterDesign::LowPass { cutoff_hz })
            }
            FilterKind::HighPass => {
                self.cutoff_hz.map(|cutoff_hz| FilterDesign::HighPass { cutoff_hz })
            }
            FilterKind::BandPass => {
                self.central_hz.map(|central_hz| FilterDesign::BandPass { central_hz })
            }
        }
    }

    fn reconfigure_filter(&mut self) {
        self.coefficients = match self.design() {
            Some(design) => match design.coefficients(self.sample_rate) {
                Ok(coefficients) => Some(coefficients),
                Err(err) => {
                    warn!(%err, "filter design rejected, passing signal through");
                    None
                }
            },
            None => None,
        };
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.dirty = self.tx.push(snapshot).is_err();
        if self.dirty {
            debug!("control ring full, snapshot deferred");
        }
    }
}
