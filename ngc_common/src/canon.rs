//! Canonical machining types and interface.
//!
//! The canonical machine is the component that actually executes motion,
//! spindle and tool commands. The interpreter only talks to it through the
//! [`machine::CanonicalMachine`] trait.

pub mod config;
pub mod consts;
pub mod machine;
pub mod types;
