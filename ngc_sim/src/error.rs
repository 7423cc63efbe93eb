//! Simulator error types.

use ngc_common::config::ConfigError;
use thiserror::Error;

/// Errors raised outside block interpretation.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration could not be loaded or validated.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Machine state could not be saved or restored.
    #[error("State persistence error: {0}")]
    Persistence(String),

    /// Reading program input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
