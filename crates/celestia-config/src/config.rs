//! Configuration structs with defaults matching the reference tableau, plus
//! RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    /// Animation and generation parameters for the tableau itself.
    pub scene: SceneConfig,
    /// How the output surface is anchored to the host layout.
    pub layout: LayoutConfig,
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
    /// Clear to fully transparent so the tableau overlays whatever is behind
    /// the window.
    pub transparent: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Celestia".to_string(),
            transparent: false,
            vsync: true,
        }
    }
}

/// How the planet spin increment is applied per frame callback.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RotationPacing {
    /// One fixed increment per callback. Visual speed follows the refresh rate.
    #[default]
    PerFrame,
    /// Increment scaled by elapsed time so one second at 60 Hz equals sixty
    /// callbacks, independent of refresh rate.
    PerSecond,
}

/// How the starfield drifts around the Z axis.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum StarDrift {
    /// Whole field rotates rigidly by `star_drift_angle` per tick.
    #[default]
    Rigid,
    /// Each star advances by its own sampled speed.
    PerStar,
}

/// Parameters of the generated scene and its animation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of starfield points. Fixed for the lifetime of a mount.
    pub star_count: u32,
    /// Inner and outer radius of the star shell.
    pub radius_range: (f32, f32),
    /// Planet spin increment (radians) per tick.
    pub rotation_speed: f32,
    /// Halo pulse angular frequency (radians per second).
    pub pulse_rate: f32,
    /// Amplitude of the planet's tilt oscillation (radians).
    pub tilt_amplitude: f32,
    /// Atmosphere counter-spin relative to the planet spin.
    pub atmosphere_counter_ratio: f32,
    /// Rigid starfield rotation per tick (radians).
    pub star_drift_angle: f32,
    pub halo_base_opacity: f32,
    pub halo_pulse_amplitude: f32,
    /// Horizontal camera sway (world units).
    pub parallax_amplitude: f32,
    /// Edge length of the procedural planet texture.
    pub texture_size: u32,
    /// Seed for texture and starfield generation. `None` draws from entropy.
    pub seed: Option<u64>,
    pub pacing: RotationPacing,
    pub drift: StarDrift,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_count: 350,
            radius_range: (34.0, 64.0),
            rotation_speed: 0.0025,
            pulse_rate: 0.65,
            tilt_amplitude: 0.021,
            atmosphere_counter_ratio: 1.01,
            star_drift_angle: 0.0005,
            halo_base_opacity: 0.10,
            halo_pulse_amplitude: 0.09,
            parallax_amplitude: 0.76,
            texture_size: 256,
            seed: None,
            pacing: RotationPacing::PerFrame,
            drift: StarDrift::Rigid,
        }
    }
}

/// A named host section with a known height, in logical pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionConfig {
    pub name: String,
    pub height: f64,
}

/// Anchoring of the output surface inside the host layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// When set, the surface height locks to this section's height.
    pub anchor_section: Option<String>,
    /// Sections the host can report heights for.
    pub sections: Vec<SectionConfig>,
}

impl LayoutConfig {
    /// Height of the named section, if it is declared.
    pub fn section_height(&self, name: &str) -> Option<f64> {
        self.sections
            .iter()
            .find(|section| section.name == name)
            .map(|section| section.height)
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for Celestia, e.g. `~/.config/celestia`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("celestia")
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    /// Re-read `config.ron`; `Some` only when its contents differ from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = std::fs::read_to_string(config_dir.join(CONFIG_FILE))
            .map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
