//! Configuration for the SkyCanvas atmosphere driver.
//!
//! Settings persist to disk as `config.ron`, accept CLI overrides via clap,
//! and support hot-reload detection so edits can be previewed live.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AtmosphereConfig, Config, DebugConfig, EnvironmentConfig, SimulationConfig, SunAngles,
    default_config_dir,
};
pub use error::ConfigError;
