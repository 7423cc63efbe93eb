//! Simulator configuration (`sim.toml`).
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! service_name = "ngc-sim"
//!
//! [machine]
//! max_feed_rate = 5000.0
//! tool_count = 8
//! ```

use ngc_common::canon::config::MachineConfig;
use ngc_common::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default service name when no config file is given.
pub const DEFAULT_SERVICE_NAME: &str = "ngc-sim";

/// Top-level simulator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Logging and identity.
    pub shared: SharedConfig,
    /// Machine limits.
    #[serde(default)]
    pub machine: MachineConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            shared: SharedConfig {
                log_level: LogLevel::Info,
                service_name: DEFAULT_SERVICE_NAME.to_string(),
            },
            machine: MachineConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load and validate a configuration file.
    pub fn load_validated(path: &Path) -> Result<Self, ConfigError> {
        let config = <Self as ConfigLoader>::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.machine.validate()
    }
}
