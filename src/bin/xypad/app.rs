//! XyPad - audio device setup and runner

use std::{io::stdout, sync::Arc};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    BufferSize, StreamConfig,
};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use tracing::{error, info};

use xypad::{
    synth::{
        control_channel, AudioDriver, ControlGeometry, ParameterController, SampleRateContext,
    },
    WaveformSnapshot, MAX_BLOCK_SIZE,
};

use super::config::Args;
use super::ui::UiApp;

/// Main application: owns the configuration until `run` takes over the terminal
pub struct XyPad {
    args: Args,
}

impl XyPad {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    /// Open the default output device, start the stream and run the UI until quit
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let supported = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;

        let mut config: StreamConfig = supported.into();
        if let Some(frames) = self.args.buffer_size {
            config.buffer_size = BufferSize::Fixed(frames);
        }
        let block_size = self
            .args
            .buffer_size
            .map_or(MAX_BLOCK_SIZE, |frames| frames as usize);

        info!(
            device = %device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels,
            "output device selected"
        );

        // --- Cross-thread state ---
        let snapshot = Arc::new(WaveformSnapshot::new());
        let (tx, rx) = control_channel();

        let mut driver = AudioDriver::new(rx, Arc::clone(&snapshot));
        driver.prepare(SampleRateContext::new(sample_rate, block_size));

        // The driver moves into the callback and is released when the stream drops.
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    // Only fails outside a prepared session; the buffer is silenced then.
                    let _ = driver.process_interleaved(data, channels);
                },
                |err| error!("audio stream error: {err}"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        let mut controller =
            ParameterController::new(sample_rate, ControlGeometry::new(0.0, 0.0), tx);
        controller.select_waveform(self.args.waveform.into());
        controller.select_filter(self.args.filter.into());

        let mut terminal = ratatui::init();
        let res = execute!(stdout(), EnableMouseCapture)
            .wrap_err("failed to enable mouse capture")
            .and_then(|()| {
                UiApp::new(controller, snapshot, sample_rate).run(&mut terminal)
            });

        if let Err(err) = execute!(stdout(), DisableMouseCapture) {
            error!("failed to disable mouse capture: {err}");
        }
        ratatui::restore();

        drop(stream);
        info!("stream closed");
        res
    }
}
