//! Configuration for the Celestia tableau.
//!
//! Settings persist to disk as RON, with every section defaulted so that
//! older or partial files keep loading. CLI flags layer on top via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, LayoutConfig, RotationPacing, SceneConfig, SectionConfig, StarDrift,
    WindowConfig, default_config_dir,
};
pub use error::ConfigError;
