//! Modal state types.
//!
//! This module defines the modal groups the interpreter reads from a block
//! and hands to the canonical machine:
//! - `Axis` - Linear axis addressed by X, Y, Z words
//! - `MotionMode` - G modal group 1 (G0-G3, G80)
//! - `NextAction` - Pending operation category for a block
//! - `Plane`, `Units`, `DistanceMode` - G17-G19, G20/G21, G90/G91
//! - `SpindleMode`, `ProgramFlow` - M3-M5, M0/M1/M2/M30/M60

use crate::canon::consts::AXIS_COUNT;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; AXIS_COUNT] = [Axis::X, Axis::Y, Axis::Z];

    /// Index into per-axis arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        f.write_str(letter)
    }
}

/// Motion mode (G modal group 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionMode {
    /// G0 - rapid positioning.
    #[default]
    StraightTraverse,
    /// G1 - linear interpolation at feed rate.
    StraightFeed,
    /// G2 - clockwise arc.
    CwArc,
    /// G3 - counterclockwise arc.
    CcwArc,
    /// G80 - cancel motion mode.
    Cancel,
}

impl MotionMode {
    /// Returns true for G2/G3.
    #[inline]
    pub const fn is_arc(self) -> bool {
        matches!(self, MotionMode::CwArc | MotionMode::CcwArc)
    }
}

/// Pending operation category for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    #[default]
    None,
    Motion,
    Dwell,
    GoHome,
    OffsetCoordinates,
}

/// Active plane for arcs (G17/G18/G19).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    #[default]
    Xy,
    Xz,
    Yz,
}

/// Length units (G20/G21).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Inches,
    #[default]
    Millimeters,
}

/// Distance mode (G90/G91).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMode {
    #[default]
    Absolute,
    Incremental,
}

/// Spindle state (M3/M4/M5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpindleMode {
    Cw,
    Ccw,
    #[default]
    Off,
}

/// Program flow request (M0/M1 stop, M2/M30/M60 end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramFlow {
    Stop,
    End,
}
