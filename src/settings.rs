//! Runtime settings of the `spx-config` tool
//!
//! Layers, lowest priority first: built-in defaults, an optional TOML file,
//! `SPX_*` environment variables.

use std::path::Path;

use config::{Config, ConfigError, Environment, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::can::protocol::MAX_DEVICE_NUMBER;

/// File read when no other path is given
pub const DEFAULT_SETTINGS_FILE: &str = "spx-config.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Invalid settings: {0}")]
    Config(#[from] ConfigError),

    #[error("Device number {0} out of range [0, 62]")]
    DeviceNumber(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// CAN interface name (e.g., "can0", "vcan0")
    pub interface: String,

    /// CAN device number [0, 62]
    pub device_number: u8,

    /// Acknowledge timeout per parameter [ms]
    ///
    /// 0 makes writes fire and forget; reads then wait the channel default.
    pub timeout_ms: u64,

    /// Talk to an in-process simulated device instead of the bus
    pub simulate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interface: "can0".to_string(),
            device_number: 0,
            timeout_ms: 50,
            simulate: false,
        }
    }
}

impl Settings {
    /// Load settings; a missing file is not an error
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let defaults = Config::try_from(&Settings::default())?;
        let settings: Settings = Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("SPX").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if settings.device_number > MAX_DEVICE_NUMBER {
            return Err(SettingsError::DeviceNumber(settings.device_number));
        }

        debug!("Settings: {:?}", settings);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("victor-spx-no-such-settings.toml");
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.timeout_ms, Settings::default().timeout_ms);
        assert_eq!(settings.device_number, Settings::default().device_number);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("victor-spx-settings-{}.toml", std::process::id()));
        std::fs::write(&path, "interface = \"vcan0\"\ndevice_number = 7\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.interface, "vcan0");
        assert_eq!(settings.device_number, 7);
        assert_eq!(settings.timeout_ms, 50);
        assert!(!settings.simulate);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let path = std::env::temp_dir().join(format!("victor-spx-bad-settings-{}.toml", std::process::id()));
        std::fs::write(&path, "device_number = \"seven\"\n").unwrap();

        let result = Settings::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(SettingsError::Config(_))));
    }

    #[test]
    fn test_device_number_out_of_range_rejected() {
        let path = std::env::temp_dir().join(format!("victor-spx-far-settings-{}.toml", std::process::id()));
        std::fs::write(&path, "device_number = 63\n").unwrap();

        let result = Settings::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(SettingsError::DeviceNumber(63))));
    }
}
