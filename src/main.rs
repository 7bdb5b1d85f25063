mod animation;
mod app;
mod canvas;
mod graphics;
mod interaction;
mod mapper;
mod math;
mod projection;
mod render2d;
mod render3d;
mod state;
mod terminal;
mod vector;

use crate::app::App;
use crate::mapper::DEFAULT_SCALE;
use crate::state::Mode;
use anyhow::{ensure, Context};
use clap::Parser;
use std::io;

/// Interactive linear transformation and vector visualizer for the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Scene shown at startup
    #[arg(long, value_enum, default_value_t = Mode::Flat)]
    pub mode: Mode,

    /// Canvas units per world unit
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    pub scale: f64,

    /// Frame rate cap
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Start with the debug overlay visible
    #[arg(long)]
    pub debug: bool,
}

/// Main function
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    ensure!(
        cli.scale.is_finite() && cli.scale > 0.0,
        "--scale must be a positive number, got {}",
        cli.scale
    );
    log::info!("Starting with {cli:?}");

    let mut stdout = io::stdout();
    terminal::enter(&mut stdout).context("Failed to prepare the terminal")?;
    let result = App::new(&cli).run(&mut stdout);
    terminal::leave(&mut stdout).context("Failed to restore the terminal")?;
    result
}
