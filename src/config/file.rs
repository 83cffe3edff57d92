//! TOML persistence of configuration records
//!
//! Every key is optional; a file only needs the fields that differ from the
//! device defaults.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use super::victor::VictorSpxConfiguration;

#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("File operation error")]
    Io(#[from] io::Error),

    #[error("Invalid configuration file: {0}")]
    Deserialization(#[from] toml::de::Error),

    #[error(transparent)]
    Serialization(#[from] toml::ser::Error),
}

/// Parse a record from TOML text
pub fn from_toml_str(text: &str) -> Result<VictorSpxConfiguration, ConfigFileError> {
    Ok(toml::from_str(text)?)
}

/// Render a record as TOML text
pub fn to_toml_string(config: &VictorSpxConfiguration) -> Result<String, ConfigFileError> {
    Ok(toml::to_string_pretty(config)?)
}

/// Load a record from a TOML file
pub fn load_configuration(path: &Path) -> Result<VictorSpxConfiguration, ConfigFileError> {
    info!("Loading configuration from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    let config = from_toml_str(&text)?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Write a record to a TOML file
pub fn save_configuration(path: &Path, config: &VictorSpxConfiguration) -> Result<(), ConfigFileError> {
    let text = to_toml_string(config)?;
    std::fs::write(path, text)?;
    info!("Configuration saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LimitSwitchNormal, RemoteFeedbackDevice, VelocityMeasPeriod};

    #[test]
    fn test_empty_file_is_default_record() {
        let config = from_toml_str("").unwrap();
        assert_eq!(config, VictorSpxConfiguration::DEFAULT);
    }

    #[test]
    fn test_partial_file() {
        let text = r#"
            neutral_deadband = 0.08
            enable_optimizations = false
            sum0_term = "remote_sensor1"
            forward_limit_switch_normal = "normally_closed"
            velocity_measurement_period = "20ms"

            [slot1]
            kp = 0.25

            [auxiliary_pid]
            selected_feedback_coefficient = 0.5
        "#;
        let config = from_toml_str(text).unwrap();

        assert_eq!(config.base.neutral_deadband, 0.08);
        assert!(!config.enable_optimizations());
        assert_eq!(config.sum0_term, RemoteFeedbackDevice::RemoteSensor1);
        assert_eq!(config.forward_limit_switch_normal, LimitSwitchNormal::NormallyClosed);
        assert_eq!(
            config.base.velocity_measurement_period,
            VelocityMeasPeriod::Period20Ms
        );
        assert_eq!(config.base.slot1.kp, 0.25);
        assert_eq!(config.base.slot1.closed_loop_peak_output, 1.0);
        assert_eq!(config.auxiliary_pid.base.selected_feedback_coefficient, 0.5);
        assert_eq!(config.primary_pid, VictorSpxConfiguration::DEFAULT.primary_pid);
        assert_eq!(config.sum1_term, RemoteFeedbackDevice::RemoteSensor0);
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let result = from_toml_str("diff0_term = \"remote_sensor7\"");
        assert!(matches!(result, Err(ConfigFileError::Deserialization(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("victor-spx-{}.toml", std::process::id()));

        let mut config = VictorSpxConfiguration::default();
        config.base.slot3.kf = 0.125;
        config.reverse_limit_switch_device_id = 5;
        config.primary_pid.selected_feedback_sensor = RemoteFeedbackDevice::SensorSum;

        save_configuration(&path, &config).unwrap();
        let loaded = load_configuration(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
    }
}
