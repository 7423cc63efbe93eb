//! NGC Common Library
//!
//! This crate provides the vocabulary shared by every NGC workspace crate:
//! modal enumerations, the canonical-machine interface the interpreter
//! drives, and configuration loading utilities.
//!
//! # Module Structure
//!
//! - [`canon`] - Modal types, `CanonicalMachine` trait, machine configuration
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use ngc_common::prelude::*;
//!
//! assert_eq!(Axis::ALL.len(), 3);
//! ```

pub mod canon;
pub mod config;
pub mod prelude;
