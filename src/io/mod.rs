// Purpose - external interfaces: device-facing output buffers and the scope snapshot

pub mod snapshot;

pub use snapshot::{WaveformSnapshot, SNAPSHOT_LEN};

/// Planar output buffers, one `Vec` per channel.
#[derive(Debug, Default)]
pub struct AudioOutput {
    pub buffers: Vec<Vec<f32>>,
}

impl AudioOutput {
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            buffers: vec![vec![0.0; frames]; channels],
        }
    }

    pub fn channels(&self) -> usize {
        self.buffers.len()
    }

    /// Frames every channel can hold.
    pub fn frames(&self) -> usize {
        self.buffers.iter().map(Vec::len).min().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        for channel in &mut self.buffers {
            channel.fill(0.0);
        }
    }
}
