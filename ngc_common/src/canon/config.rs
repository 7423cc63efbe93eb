//! Canonical machine configuration.
//!
//! `MachineConfig` is the `[machine]` table of a simulator configuration
//! file. It carries the limits the machine enforces when the interpreter
//! commits a value.

use crate::canon::consts::{DEFAULT_MAX_FEED_RATE, DEFAULT_MAX_SPINDLE_SPEED, DEFAULT_TOOL_COUNT};
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_max_feed_rate() -> f64 {
    DEFAULT_MAX_FEED_RATE
}

fn default_max_spindle_speed() -> f64 {
    DEFAULT_MAX_SPINDLE_SPEED
}

fn default_tool_count() -> u32 {
    DEFAULT_TOOL_COUNT
}

/// Machine limits and persistence settings.
///
/// # TOML Example
///
/// ```toml
/// [machine]
/// max_feed_rate = 5000.0
/// max_spindle_speed = 18000.0
/// tool_count = 8
/// state_file = "/var/lib/ngc/state.bin"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineConfig {
    /// Maximum feed rate in mm/min.
    #[serde(default = "default_max_feed_rate")]
    pub max_feed_rate: f64,

    /// Maximum spindle speed in RPM.
    #[serde(default = "default_max_spindle_speed")]
    pub max_spindle_speed: f64,

    /// Number of tool slots; valid T words are 0..=tool_count.
    #[serde(default = "default_tool_count")]
    pub tool_count: u32,

    /// Path to the machine state persistence file.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_feed_rate: DEFAULT_MAX_FEED_RATE,
            max_spindle_speed: DEFAULT_MAX_SPINDLE_SPEED,
            tool_count: DEFAULT_TOOL_COUNT,
            state_file: None,
        }
    }
}

impl MachineConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if a limit is not a positive
    /// finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_feed_rate.is_finite() || self.max_feed_rate <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "max_feed_rate must be > 0, got {}",
                self.max_feed_rate
            )));
        }
        if !self.max_spindle_speed.is_finite() || self.max_spindle_speed <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "max_spindle_speed must be > 0, got {}",
                self.max_spindle_speed
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_config_defaults_from_empty_table() {
        let config: MachineConfig = toml::from_str("").unwrap();
        assert_eq!(config, MachineConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_machine_config_rejects_zero_feed_rate() {
        let config = MachineConfig {
            max_feed_rate: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_machine_config_rejects_nan_spindle_speed() {
        let config = MachineConfig {
            max_spindle_speed: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_machine_config_rejects_unknown_field() {
        let result = toml::from_str::<MachineConfig>("max_acceleration = 10.0");
        assert!(result.is_err());
    }
}
