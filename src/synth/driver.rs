//! Audio callback driver.
//!
//! Session lifecycle:
//!
//! ```text
//!   Uninitialized ──prepare──→ Prepared ──process_block──→ Running
//!         ↑                       ↑                           │
//!         │                       └────────prepare─────── Stopped ←──release──┘
//! ```
//!
//! Per block: drain the control ring down to the newest [`ParamSnapshot`],
//! render the generator into a preallocated mono block, route it through the
//! active filter stage, copy it to every output channel and mirror it into the
//! [`WaveformSnapshot`]. Nothing in `process_block` allocates, locks or logs.

use std::sync::Arc;

use rtrb::Consumer;
use tracing::{info, warn};

use crate::{
    dsp::{FilterBank, FilterKind, Oscillator},
    error::SynthError,
    io::{AudioOutput, WaveformSnapshot},
    synth::message::{ParamSnapshot, SnapshotReceiver},
    MAX_BLOCK_SIZE,
};

/// Fixed for the duration of one audio session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRateContext {
    pub sample_rate: f32,
    /// Block size the device expects to request. Informational; any size is rendered.
    pub block_size: usize,
}

impl SampleRateContext {
    pub fn new(sample_rate: f32, block_size: usize) -> Self {
        Self {
            sample_rate,
            block_size,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.sample_rate > 0.0 && self.sample_rate.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Prepared,
    Running,
    Stopped,
}

pub struct AudioDriver {
    state: SessionState,
    context: Option<SampleRateContext>,
    rx: Consumer<ParamSnapshot>,
    params: ParamSnapshot,
    oscillator: Oscillator,
    filters: FilterBank,
    snapshot: Arc<WaveformSnapshot>,
    block: Vec<f32>,
}

impl AudioDriver {
    pub fn new(rx: Consumer<ParamSnapshot>, snapshot: Arc<WaveformSnapshot>) -> Self {
        Self {
            state: SessionState::Uninitialized,
            context: None,
            rx,
            params: ParamSnapshot::default(),
            oscillator: Oscillator::new(0.0),
            filters: FilterBank::new(),
            snapshot,
            block: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Start (or restart) a session at the given sample rate.
    ///
    /// Rewinds the generator and clears every filter's memory.
    pub fn prepare(&mut self, context: SampleRateContext) {
        if !context.is_valid() {
            warn!(
                sample_rate = context.sample_rate,
                "invalid sample rate, generator will not advance"
            );
        }

        self.oscillator.set_sample_rate(context.sample_rate);
        self.oscillator.reset();
        self.filters.reset_all();
        if let Err(err) = self.filters.redesign_all(context.sample_rate) {
            warn!(%err, "filters pass audio through until redesigned");
        }
        self.context = Some(context);
        self.state = SessionState::Prepared;

        info!(
            sample_rate = context.sample_rate,
            block_size = context.block_size,
            "audio session prepared"
        );
    }

    /// Render `num_samples` frames into every channel of `output`.
    ///
    /// Outside a prepared session the output is silenced and
    /// `UninitializedSession` is returned.
    pub fn process_block(
        &mut self,
        output: &mut AudioOutput,
        num_samples: usize,
    ) -> Result<(), SynthError> {
        let num_samples = num_samples.min(output.frames());
        if !self.begin_block() {
            output.clear();
            return Err(SynthError::UninitializedSession);
        }

        let mut offset = 0;
        while offset < num_samples {
            let frames = (num_samples - offset).min(MAX_BLOCK_SIZE);
            let generating = self.render(offset, frames);

            for channel in &mut output.buffers {
                let dest = &mut channel[offset..offset + frames];
                if generating {
                    dest.copy_from_slice(&self.block[..frames]);
                } else {
                    dest.fill(0.0);
                }
            }

            offset += frames;
        }

        self.finish_block();
        Ok(())
    }

    /// Render into an interleaved device buffer, the same mono value on every channel.
    pub fn process_interleaved(
        &mut self,
        data: &mut [f32],
        channels: usize,
    ) -> Result<(), SynthError> {
        if channels == 0 {
            return Ok(());
        }
        if !self.begin_block() {
            data.fill(0.0);
            return Err(SynthError::UninitializedSession);
        }

        let total_frames = data.len() / channels;
        let mut frames_written = 0;
        while frames_written < total_frames {
            let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            let generating = self.render(frames_written, frames);

            let out_off = frames_written * channels;
            let dest = &mut data[out_off..out_off + frames * channels];
            if generating {
                for (frame, &s) in dest.chunks_exact_mut(channels).zip(&self.block[..frames]) {
                    frame.fill(s);
                }
            } else {
                dest.fill(0.0);
            }

            frames_written += frames;
        }
        data[total_frames * channels..].fill(0.0);

        self.finish_block();
        Ok(())
    }

    /// End the session. Further blocks are rejected until the next `prepare`.
    pub fn release(&mut self) {
        if self.state != SessionState::Stopped {
            self.state = SessionState::Stopped;
            info!("audio session released");
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn context(&self) -> Option<SampleRateContext> {
        self.context
    }

    /// Parameters the most recent block was rendered with.
    pub fn params(&self) -> ParamSnapshot {
        self.params
    }

    pub fn snapshot(&self) -> &Arc<WaveformSnapshot> {
        &self.snapshot
    }

    pub fn filters(&self) -> &FilterBank {
        &self.filters
    }

    fn begin_block(&mut self) -> bool {
        match self.state {
            SessionState::Prepared => {
                self.state = SessionState::Running;
            }
            SessionState::Running => {}
            SessionState::Uninitialized | SessionState::Stopped => return false,
        }

        if let Some(next) = self.rx.latest() {
            self.apply(next);
        }
        true
    }

    fn finish_block(&mut self) {
        if self.params.generating {
            self.snapshot.publish();
        }
    }

    fn apply(&mut self, next: ParamSnapshot) {
        let leaving_filter =
            next.filter == FilterKind::None && self.params.filter != FilterKind::None;
        if leaving_filter || next.reset_epoch != self.params.reset_epoch {
            self.filters.reset_all();
        }

        let session_rate = self.context.map_or(0.0, |context| context.sample_rate);
        if let (Some(stage), Some(design)) = (self.filters.stage_mut(next.filter), next.design) {
            match next.coefficients {
                Some(coefficients) if next.design_rate == session_rate => {
                    stage.install(design, coefficients);
                }
                // Designed for another rate; a rejected rate keeps the stage as it was.
                _ => {
                    let _ = stage.configure(design, session_rate);
                }
            }
        }

        self.oscillator.set_waveform(next.waveform);
        self.oscillator.set_frequency(next.frequency_hz);
        self.oscillator.set_amplitude(next.amplitude);
        self.params = next;
    }

    /// Fill `self.block[..frames]` and mirror it into the scope. Returns false
    /// (leaving generator, filters and scope untouched) while not generating.
    fn render(&mut self, offset: usize, frames: usize) -> bool {
        if !self.params.generating {
            return false;
        }

        let block = &mut self.block[..frames];
        self.oscillator.render(block);
        self.filters.render(self.params.filter, block);
        self.snapshot.write_block(offset, block);
        true
    }
}

impl Drop for AudioDriver {
    fn drop(&mut self) {
        if self.state != SessionState::Uninitialized {
            self.release();
        }
    }
}
