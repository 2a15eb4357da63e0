//! Latest-block scope buffer shared between the audio and render threads.
//!
//! The audio thread writes samples with relaxed atomic stores and raises a
//! single "update available" flag after each block. Any number of raised flags
//! collapse into one redraw because the reader clears it with a swap. The
//! reader may observe a block that is half old and half new; that is fine for
//! a visualization and keeps the audio side wait-free.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Number of samples held for display.
pub const SNAPSHOT_LEN: usize = 512;

pub struct WaveformSnapshot {
    samples: [AtomicU32; SNAPSHOT_LEN],
    update: AtomicBool,
}

impl WaveformSnapshot {
    pub fn new() -> Self {
        Self {
            samples: std::array::from_fn(|_| AtomicU32::new(0.0f32.to_bits())),
            update: AtomicBool::new(false),
        }
    }

    pub fn capacity(&self) -> usize {
        SNAPSHOT_LEN
    }

    /// Store `sample` at `index`, wrapping the index modulo the capacity.
    #[inline]
    pub fn write(&self, index: usize, sample: f32) {
        self.samples[index % SNAPSHOT_LEN].store(sample.to_bits(), Ordering::Relaxed);
    }

    /// Write `block` starting at `offset` (modulo capacity).
    pub fn write_block(&self, offset: usize, block: &[f32]) {
        for (i, &sample) in block.iter().enumerate() {
            self.write(offset + i, sample);
        }
    }

    #[inline]
    pub fn sample(&self, index: usize) -> f32 {
        f32::from_bits(self.samples[index % SNAPSHOT_LEN].load(Ordering::Relaxed))
    }

    /// Copy up to `out.len()` samples, starting from index 0.
    pub fn read_into(&self, out: &mut [f32]) {
        for (i, slot) in out.iter_mut().take(SNAPSHOT_LEN).enumerate() {
            *slot = self.sample(i);
        }
    }

    pub fn to_vec(&self) -> Vec<f32> {
        let mut out = vec![0.0; SNAPSHOT_LEN];
        self.read_into(&mut out);
        out
    }

    /// Signal that a new block is available. Never blocks.
    pub fn publish(&self) {
        self.update.store(true, Ordering::Release);
    }

    /// Consume the pending update signal, if any.
    pub fn take_update(&self) -> bool {
        self.update.swap(false, Ordering::Acquire)
    }
}

impl Default for WaveformSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_wrap_modulo_capacity() {
        let snapshot = WaveformSnapshot::new();
        snapshot.write(3, 0.5);
        snapshot.write(SNAPSHOT_LEN + 3, -0.25);
        assert_eq!(snapshot.sample(3), -0.25);
    }

    #[test]
    fn block_lands_at_leading_indices() {
        let snapshot = WaveformSnapshot::new();
        let block: Vec<f32> = (0..100).map(|i| i as f32 * 0.01).collect();
        snapshot.write_block(0, &block);

        let contents = snapshot.to_vec();
        assert_eq!(&contents[..100], block.as_slice());
        assert!(contents[100..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn update_signals_coalesce() {
        let snapshot = WaveformSnapshot::new();
        assert!(!snapshot.take_update());

        snapshot.publish();
        snapshot.publish();
        snapshot.publish();
        assert!(snapshot.take_update());
        assert!(!snapshot.take_update());
    }
}
