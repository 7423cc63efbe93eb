//! Prelude module for common re-exports.
//!
//! ```rust
//! use ngc_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::canon::config::MachineConfig;
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};

// ─── Canonical Machine ──────────────────────────────────────────────
pub use crate::canon::consts::{AXIS_COUNT, MM_PER_INCH};
pub use crate::canon::machine::{CanonError, CanonResult, CanonicalMachine};
pub use crate::canon::types::{
    Axis, DistanceMode, MotionMode, NextAction, Plane, ProgramFlow, SpindleMode, Units,
};
