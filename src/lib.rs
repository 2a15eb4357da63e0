pub mod dsp; // Signal generator and filter primitives
pub mod error;
pub mod io; // Output buffers and the scope snapshot
pub mod synth; // Parameter control and the audio callback driver

pub use error::SynthError;
pub use io::snapshot::{WaveformSnapshot, SNAPSHOT_LEN};

/// Largest block rendered in a single pass. Device callbacks asking for more
/// frames are split into chunks of this size.
pub const MAX_BLOCK_SIZE: usize = 2048;
