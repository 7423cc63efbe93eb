//! # NGC Simulator Library
//!
//! A software canonical machine for the NGC interpreter, with state
//! persistence and a line-by-line program runner.
//!
//! # Module Structure
//!
//! - [`machine`] - `SimMachine`, the simulated `CanonicalMachine`
//! - [`state`] - Machine state persistence (bincode)
//! - [`runner`] - Feeds program lines to the interpreter
//! - [`config`] - `sim.toml` configuration
//! - [`error`] - Simulator error types

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod machine;
pub mod runner;
pub mod state;

pub use crate::config::SimConfig;
pub use crate::error::SimError;
pub use crate::machine::{CanonCall, MachineState, SimMachine};
pub use crate::runner::{BlockFailure, RunStop, RunSummary, run_program};
pub use crate::state::StatePersistence;
