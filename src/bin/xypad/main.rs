//! xypad - pointer-driven synthesizer with a live scope
//!
//! Run with: cargo run -- --log-file xypad.log
//!
//! Click and drag inside the control pad to play. Keys: [S]ine, [P]ulse train,
//! filter [N]one, [L]ow-pass, [H]igh-pass, [B]and-pass, [Q]uit.

mod app;
mod config;
mod ui;

use app::XyPad;
use clap::Parser;
use config::Args;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    config::init_tracing(&args)?;

    XyPad::new(args).run()
}
