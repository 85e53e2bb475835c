//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Celestia command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "celestia", about = "Animated procedural planet and starfield")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of stars in the drifting shell.
    #[arg(long)]
    pub star_count: Option<u32>,

    /// Planet spin increment per tick, in radians.
    #[arg(long)]
    pub rotation_speed: Option<f32>,

    /// Halo pulse frequency, in radians per second.
    #[arg(long)]
    pub pulse_rate: Option<f32>,

    /// Seed for the texture and starfield.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Lock the surface height to this layout section.
    #[arg(long)]
    pub anchor_section: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(count) = args.star_count {
            self.scene.star_count = count;
        }
        if let Some(speed) = args.rotation_speed {
            self.scene.rotation_speed = speed;
        }
        if let Some(rate) = args.pulse_rate {
            self.scene.pulse_rate = rate;
        }
        if let Some(seed) = args.seed {
            self.scene.seed = Some(seed);
        }
        if let Some(ref section) = args.anchor_section {
            self.layout.anchor_section = Some(section.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
