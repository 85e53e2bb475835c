//! Celestia: a rotating planet with an atmosphere and pulsing halo, drifting
//! through a procedural starfield.
//!
//! Run with: `cargo run -p celestia-app -- --star-count 500`

mod app;
mod host;

use std::path::PathBuf;

use celestia_config::{CliArgs, Config, default_config_dir};
use clap::Parser;
use tracing::{error, info, warn};

fn log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("celestia").join("logs"))
}

fn main() {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let (mut config, load_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args);

    celestia_log::init_logging(log_dir().as_deref(), cfg!(debug_assertions), Some(&config));

    if let Some(e) = load_error {
        warn!("Using default config, {}: {e}", config_dir.display());
    }
    info!("Celestia v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Window: {}x{} | Stars: {} | Seed: {}",
        config.window.width,
        config.window.height,
        config.scene.star_count,
        config
            .scene
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string())
    );

    if let Err(e) = app::run(config) {
        error!("{e}");
        std::process::exit(1);
    }
}
