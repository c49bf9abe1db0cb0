//! Command-line argument parsing for the SkyCanvas driver.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, SunAngles};

/// SkyCanvas command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "skycanvas", about = "Drives sky and cloud atmosphere parameters")]
pub struct CliArgs {
    /// Cloud speed multiplier (0-12).
    #[arg(long)]
    pub cloud_speed: Option<f32>,

    /// Sun override elevation in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub sun_elevation: Option<f32>,

    /// Sun override azimuth in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub sun_azimuth: Option<f32>,

    /// Number of frames to run (0 = until interrupted).
    #[arg(long)]
    pub frames: Option<u32>,

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
        if let Some(speed) = args.cloud_speed {
            self.atmosphere.cloud_speed = speed;
        }
        if args.sun_elevation.is_some() || args.sun_azimuth.is_some() {
            let current = self.atmosphere.sun_override.unwrap_or(SunAngles {
                elevation_deg: 45.0,
                azimuth_deg: 0.0,
            });
            self.atmosphere.sun_override = Some(SunAngles {
                elevation_deg: args.sun_elevation.unwrap_or(current.elevation_deg),
                azimuth_deg: args.sun_azimuth.unwrap_or(current.azimuth_deg),
            });
        }
        if let Some(frames) = args.frames {
            self.simulation.frames = frames;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            cloud_speed: Some(6.0),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.atmosphere.cloud_speed, 6.0);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.simulation.frames, 600);
        assert!(config.atmosphere.sun_override.is_none());
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_partial_sun_override_keeps_other_angle() {
        let mut config = Config::default();
        config.atmosphere.sun_override = Some(SunAngles {
            elevation_deg: 20.0,
            azimuth_deg: 90.0,
        });
        let args = CliArgs {
            sun_azimuth: Some(-45.0),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(
            config.atmosphere.sun_override,
            Some(SunAngles {
                elevation_deg: 20.0,
                azimuth_deg: -45.0,
            })
        );
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "skycanvas",
            "--cloud-speed",
            "2.5",
            "--sun-elevation",
            "-10",
            "--frames",
            "5",
        ])
        .unwrap();
        assert_eq!(args.cloud_speed, Some(2.5));
        assert_eq!(args.sun_elevation, Some(-10.0));
        assert_eq!(args.frames, Some(5));
        assert!(args.config.is_none());
    }
}
