use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use spectrabar::{config::Config, ui};

/// Terminal music player with a live spectrum visualizer.
#[derive(Debug, Parser)]
#[command(name = "spectrabar", version, about)]
struct Cli {
    /// Audio file to start with
    file: Option<PathBuf>,

    /// Config file (default: ./spectrabar.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Upper bound on frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Initial volume, 0.0 - 1.0
    #[arg(long)]
    volume: Option<f32>,

    /// Write logs here instead of the default file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config problems are reported once logging is up
    let mut config_error = None;
    let mut config = match Config::locate(cli.config.as_deref()) {
        Some(path) => Config::load(&path).unwrap_or_else(|e| {
            config_error = Some(format!("{e:#}, using defaults"));
            Config::default()
        }),
        None => Config::default(),
    };
    if let Some(fps) = cli.fps {
        config.player.max_fps = fps.max(1);
    }
    if let Some(volume) = cli.volume {
        config.player.volume = volume.clamp(0.0, 1.0);
    }

    let log_path = cli
        .log_file
        .or_else(|| config.log_file.clone())
        .unwrap_or_else(|| std::env::temp_dir().join("spectrabar.log"));
    init_logging(&log_path)?;

    if let Some(e) = config_error {
        warn!("{e}");
    }
    info!("starting with {:?}", config);

    ui::run(&config, cli.file)
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
