//! Configuration loading. The file path comes from `VOIDLINE_CONFIG`; a
//! missing variable or file means defaults.

use std::path::Path;

use tracing::{info, warn};

use voidline_core::config::VoidlineConfig;

use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "VOIDLINE_CONFIG";

/// Load the config named by `VOIDLINE_CONFIG`, or defaults.
pub fn load() -> Result<VoidlineConfig, ConfigError> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => load_from_path(Path::new(&path)),
        Err(_) => {
            info!("{CONFIG_ENV} not set, using default configuration");
            Ok(VoidlineConfig::default())
        }
    }
}

pub fn load_from_path(path: &Path) -> Result<VoidlineConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let config = parse(&text)?;
            info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(VoidlineConfig::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Parse TOML text. Missing fields take their defaults.
pub fn parse(text: &str) -> Result<VoidlineConfig, ConfigError> {
    let config: VoidlineConfig = toml::from_str(text)?;
    if config.targeting.reacquire_distance_km > config.targeting.max_range_km {
        warn!(
            reacquire = config.targeting.reacquire_distance_km,
            max_range = config.targeting.max_range_km,
            "reacquire_distance_km exceeds max_range_km"
        );
    }
    Ok(config)
}
