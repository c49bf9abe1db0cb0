//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skycanvas_atmosphere::{
    AtmosphereSettings, CLOUD_SPEED_DEFAULT, CLOUD_SPEED_MAX, CLOUD_SPEED_MIN, DirectionalLight,
};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Atmosphere updater settings.
    pub atmosphere: AtmosphereConfig,
    /// The scene the updater runs in.
    pub environment: EnvironmentConfig,
    /// Driver loop settings.
    pub simulation: SimulationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Sun position in the sky, in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SunAngles {
    /// Angle above the horizon.
    pub elevation_deg: f32,
    /// Clockwise from +Z around +Y.
    pub azimuth_deg: f32,
}

impl SunAngles {
    /// A directional light shining from this sky position.
    pub fn to_light(self) -> DirectionalLight {
        DirectionalLight::from_sky_angles(self.elevation_deg, self.azimuth_deg)
    }
}

/// Atmosphere updater configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AtmosphereConfig {
    /// Cloud wind speed multiplier, `0.0..=12.0`.
    pub cloud_speed: f32,
    /// Light to use instead of the scene's default sun.
    pub sun_override: Option<SunAngles>,
}

/// Scene configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// The scene's main directional light. `None` means the scene has no sun.
    pub default_sun: Option<SunAngles>,
}

/// Driver loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of frames to run (0 = until interrupted).
    pub frames: u32,
    /// Radius of the simulated viewer's walk around the origin, in meters.
    pub viewer_orbit_radius: f32,
    /// Head height of the simulated viewer, in meters.
    pub viewer_height: f32,
    /// Frame at which the simulated viewer starts being tracked.
    pub viewer_acquire_frame: u32,
    /// Frames between checks of `config.ron` for edits (0 = never).
    pub reload_interval_frames: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config in debug builds.
    pub file_logging: bool,
}

// --- Default implementations ---

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            cloud_speed: CLOUD_SPEED_DEFAULT,
            sun_override: None,
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            default_sun: Some(SunAngles {
                elevation_deg: 45.0,
                azimuth_deg: 135.0,
            }),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            viewer_orbit_radius: 8.0,
            viewer_height: 1.7,
            viewer_acquire_frame: 30,
            reload_interval_frames: 120,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            file_logging: false,
        }
    }
}

// --- Validation ---

impl AtmosphereConfig {
    /// Updater settings derived from this config.
    pub fn settings(&self) -> AtmosphereSettings {
        AtmosphereSettings::new(self.cloud_speed)
    }
}

impl Config {
    /// Clamp out-of-range values, logging each correction.
    pub fn validated(mut self) -> Self {
        let speed = self.atmosphere.cloud_speed;
        let clamped = self.atmosphere.settings().cloud_speed();
        if speed != clamped {
            log::warn!(
                "cloud_speed {speed} outside {CLOUD_SPEED_MIN}..={CLOUD_SPEED_MAX}, using {clamped}"
            );
            self.atmosphere.cloud_speed = clamped;
        }
        self
    }
}

/// Platform config directory for SkyCanvas, e.g. `~/.config/skycanvas`.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("skycanvas"))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config.validated())
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

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config = ron::from_str::<Config>(&contents)
            .map_err(ConfigError::ParseError)?
            .validated();

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
