//! Shared configuration layer.
//!
//! Every binary in the workspace reads one TOML file with a `[shared]`
//! table for logging and identity, plus its own sections. [`ConfigLoader`]
//! is implemented for any deserializable type, so a binary only declares
//! its top-level struct:
//!
//! ```rust,no_run
//! use ngc_common::canon::config::MachineConfig;
//! use ngc_common::config::{ConfigError, ConfigLoader, SharedConfig};
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Deserialize)]
//! struct RunnerConfig {
//!     shared: SharedConfig,
//!     #[serde(default)]
//!     machine: MachineConfig,
//! }
//!
//! fn load() -> Result<RunnerConfig, ConfigError> {
//!     let config = RunnerConfig::load(Path::new("sim.toml"))?;
//!     config.shared.validate()?;
//!     config.machine.validate()?;
//!     Ok(config)
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Why a configuration could not be used.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// No file at the given path.
    #[error("config file {0:?} does not exist")]
    FileNotFound(PathBuf),

    /// Unreadable file or invalid TOML.
    #[error("cannot parse config: {0}")]
    ParseError(String),

    /// Well-formed but out-of-range values.
    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// `log_level` values, written in lowercase in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, includes every parsed statement.
    Trace,
    /// Every canonical machine call.
    Debug,
    /// Lifecycle and messages.
    #[default]
    Info,
    /// Rejected blocks.
    Warn,
    /// Startup failures only.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// The `[shared]` table.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "ngc-sim-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Default tracing level; `RUST_LOG` directives still apply on top.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Name reported in the startup log line.
    pub service_name: String,
}

impl SharedConfig {
    /// Reject a blank `service_name`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "shared.service_name is blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read a TOML file into `Self`. Validation is left to the caller.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load and deserialize `path`.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Reading config {:?}", path);
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(ConfigError::ParseError(format!("{}: {e}", path.display()))),
        };
        toml::from_str(&text).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        shared: SharedConfig,
    }

    fn write_toml(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_log_levels_parse_lowercase_and_map_to_tracing() {
        let cases = [
            ("trace", LogLevel::Trace, tracing::Level::TRACE),
            ("debug", LogLevel::Debug, tracing::Level::DEBUG),
            ("info", LogLevel::Info, tracing::Level::INFO),
            ("warn", LogLevel::Warn, tracing::Level::WARN),
            ("error", LogLevel::Error, tracing::Level::ERROR),
        ];
        for (text, level, tracing_level) in cases {
            let file = write_toml(&format!("[shared]\nlog_level = \"{text}\"\nservice_name = \"x\"\n"));
            let parsed = Wrapper::load(file.path()).unwrap();
            assert_eq!(parsed.shared.log_level, level);
            assert_eq!(tracing::Level::from(level), tracing_level);
        }
    }

    #[test]
    fn test_log_level_defaults_to_info() {
        let file = write_toml("[shared]\nservice_name = \"ngc-test\"\n");
        let parsed = Wrapper::load(file.path()).unwrap();
        assert_eq!(parsed.shared.log_level, LogLevel::Info);
        assert_eq!(parsed.shared.service_name, "ngc-test");
    }

    #[test]
    fn test_blank_service_name_is_invalid() {
        let shared = SharedConfig {
            log_level: LogLevel::Warn,
            service_name: "  ".to_string(),
        };
        assert!(matches!(shared.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = Path::new("/nonexistent/ngc/sim.toml");
        match Wrapper::load(path) {
            Err(ConfigError::FileNotFound(p)) => assert_eq!(p, path),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        let file = write_toml("[shared\nservice_name = ");
        assert!(matches!(Wrapper::load(file.path()), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_unknown_level_is_a_parse_error() {
        let file = write_toml("[shared]\nlog_level = \"loud\"\nservice_name = \"x\"\n");
        assert!(matches!(Wrapper::load(file.path()), Err(ConfigError::ParseError(_))));
    }
}
