//! Command-line configuration and log setup

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing::Level;
use xypad::dsp::{FilterKind, Waveform};

#[derive(Debug, Parser)]
#[command(name = "xypad", version, about = "Pointer-driven synthesizer with a live scope")]
pub struct Args {
    /// Waveform selected at startup
    #[arg(long, value_enum, default_value_t = WaveformArg::Sine)]
    pub waveform: WaveformArg,

    /// Filter selected at startup
    #[arg(long, value_enum, default_value_t = FilterArg::None)]
    pub filter: FilterArg,

    /// Request a fixed device buffer size in frames
    #[arg(long)]
    pub buffer_size: Option<u32>,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Maximum log level
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WaveformArg {
    Sine,
    PulseTrain,
}

impl From<WaveformArg> for Waveform {
    fn from(arg: WaveformArg) -> Self {
        match arg {
            WaveformArg::Sine => Waveform::Sine,
            WaveformArg::PulseTrain => Waveform::PulseTrain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    None,
    LowPass,
    HighPass,
    BandPass,
}

impl From<FilterArg> for FilterKind {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::None => FilterKind::None,
            FilterArg::LowPass => FilterKind::LowPass,
            FilterArg::HighPass => FilterKind::HighPass,
            FilterArg::BandPass => FilterKind::BandPass,
        }
    }
}

/// Install a file-backed subscriber when `--log-file` is given.
pub fn init_tracing(args: &Args) -> EyreResult<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_startup_selections() {
        let args = Args::try_parse_from([
            "xypad",
            "--waveform",
            "pulse-train",
            "--filter",
            "band-pass",
            "--buffer-size",
            "256",
        ])
        .unwrap();

        assert_eq!(Waveform::from(args.waveform), Waveform::PulseTrain);
        assert_eq!(FilterKind::from(args.filter), FilterKind::BandPass);
        assert_eq!(args.buffer_size, Some(256));
        assert_eq!(args.log_level, Level::INFO);
    }

    #[test]
    fn defaults_to_plain_sine() {
        let args = Args::try_parse_from(["xypad"]).unwrap();
        assert_eq!(args.waveform, WaveformArg::Sine);
        assert_eq!(args.filter, FilterArg::None);
        assert!(args.log_file.is_none());
    }
}
