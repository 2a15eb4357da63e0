use rtrb::{Consumer, Producer, RingBuffer};

use crate::dsp::{BiquadCoefficients, FilterDesign, FilterKind, Waveform};

/// Snapshots the control thread may queue before the audio thread drains them.
pub const CONTROL_QUEUE_CAPACITY: usize = 64;

/// Complete synthesis state handed from the control thread to the audio thread.
///
/// Every push carries the whole state, so the audio thread only ever needs the
/// most recent one and a dropped push is repaired by the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    /// Pointer held down inside the control region.
    pub generating: bool,
    pub waveform: Waveform,
    pub frequency_hz: f32,
    pub amplitude: f32,
    pub filter: FilterKind,
    /// Cutoff or central frequency for `filter`, absent until the pointer has set one.
    pub design: Option<FilterDesign>,
    /// `design` evaluated at `design_rate`. The audio thread only installs
    /// these when `design_rate` matches its session rate.
    pub coefficients: Option<BiquadCoefficients>,
    pub design_rate: f32,
    /// Bumped every time the filter is switched to `FilterKind::None`.
    pub reset_epoch: u32,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            generating: false,
            waveform: Waveform::Sine,
            frequency_hz: 440.0,
            amplitude: 0.0,
            filter: FilterKind::None,
            design: None,
            coefficients: None,
            design_rate: 0.0,
            reset_epoch: 0,
        }
    }
}

pub fn control_channel() -> (Producer<ParamSnapshot>, Consumer<ParamSnapshot>) {
    RingBuffer::new(CONTROL_QUEUE_CAPACITY)
}

pub trait SnapshotReceiver {
    fn pop(&mut self) -> Option<ParamSnapshot>;

    /// Drain everything queued and keep only the newest snapshot.
    fn latest(&mut self) -> Option<ParamSnapshot> {
        let mut latest = None;
        while let Some(snapshot) = self.pop() {
            latest = Some(snapshot);
        }
        latest
    }
}

impl SnapshotReceiver for Consumer<ParamSnapshot> {
    fn pop(&mut self) -> Option<ParamSnapshot> {
        Consumer::pop(self).ok()
    }
}
