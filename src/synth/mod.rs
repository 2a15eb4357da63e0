// Purpose: parameter control on the UI thread and block rendering on the audio thread.
// The two sides only meet through the snapshot ring in `message` and the shared
// `WaveformSnapshot`.

pub mod controller;
pub mod driver;
pub mod message;

pub use controller::{ControlGeometry, InputEvent, ParameterController, ParameterSummary};
pub use driver::{AudioDriver, SampleRateContext, SessionState};
pub use message::{control_channel, ParamSnapshot, SnapshotReceiver};
