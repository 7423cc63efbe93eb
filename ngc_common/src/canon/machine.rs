//! Canonical machine trait and error types.
//!
//! This module defines:
//! - `CanonicalMachine` trait - Interface the interpreter dispatches blocks to
//! - `CanonError` enum - Domain errors reported by a canonical machine

use crate::canon::consts::{
    STATUS_FEED_RATE_NOT_SET, STATUS_INVALID_ARC, STATUS_TOOL_OUT_OF_RANGE,
    STATUS_UNSUPPORTED_STATEMENT, STATUS_VALUE_OUT_OF_RANGE,
};
use crate::canon::types::{Axis, DistanceMode, MotionMode, NextAction, Plane, Units};
use thiserror::Error;

/// Error types for canonical machine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanonError {
    /// Value outside the accepted range
    #[error("{what} out of range: {value}")]
    ValueOutOfRange {
        /// Name of the rejected quantity
        what: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Feed motion without a feed rate
    #[error("Feed rate not set")]
    FeedRateNotSet,

    /// Tool number beyond the tool table
    #[error("Tool {tool} out of range (max {max})")]
    ToolOutOfRange {
        /// Requested tool
        tool: u32,
        /// Highest valid tool number
        max: u32,
    },

    /// Arc words do not describe an arc
    #[error("Invalid arc: {0}")]
    InvalidArc(String),

    /// Operation not supported by this machine
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl CanonError {
    /// Numeric status code for console reporting.
    pub const fn code(&self) -> u8 {
        match self {
            CanonError::ValueOutOfRange { .. } => STATUS_VALUE_OUT_OF_RANGE,
            CanonError::FeedRateNotSet => STATUS_FEED_RATE_NOT_SET,
            CanonError::ToolOutOfRange { .. } => STATUS_TOOL_OUT_OF_RANGE,
            CanonError::InvalidArc(_) => STATUS_INVALID_ARC,
            CanonError::Unsupported(_) => STATUS_UNSUPPORTED_STATEMENT,
        }
    }
}

/// Result of a canonical machine action.
pub type CanonResult = Result<(), CanonError>;

/// Trait defining the canonical machining functions.
///
/// The interpreter reads pre-existing modal values through the getters and
/// commits changes only through the actions. Values are passed in the units
/// and coordinate frame of the block; conversion is the machine's job.
///
/// Any `Err` aborts the remaining dispatch of the current block. Changes
/// committed by earlier actions of the same block stay committed.
pub trait CanonicalMachine {
    /// Next action persisted from the previous block.
    fn next_action(&self) -> NextAction;

    /// Current motion mode (G modal group 1).
    fn motion_mode(&self) -> MotionMode;

    /// Current position of `axis` in the active units and work coordinates.
    fn position(&self, axis: Axis) -> f64;

    /// Called once per block, before the getters seed it. Targets the
    /// block does not name are the getter readbacks from this point, in the
    /// units that were active here.
    fn begin_block(&mut self) {}

    /// G93 (true) / G94 (false).
    fn set_inverse_feed_rate_mode(&mut self, enabled: bool) -> CanonResult;

    /// F word.
    fn set_feed_rate(&mut self, feed_rate: f64) -> CanonResult;

    /// S word.
    fn set_spindle_speed(&mut self, speed: f64) -> CanonResult;

    /// T word.
    fn select_tool(&mut self, tool: u32) -> CanonResult;

    /// M6 - swap in the most recently selected tool.
    fn change_tool(&mut self) -> CanonResult;

    /// M3.
    fn start_spindle_clockwise(&mut self) -> CanonResult;

    /// M4.
    fn start_spindle_counterclockwise(&mut self) -> CanonResult;

    /// M5.
    fn stop_spindle_turning(&mut self) -> CanonResult;

    /// G4 with P seconds.
    fn dwell(&mut self, seconds: f64) -> CanonResult;

    /// G17/G18/G19.
    fn select_plane(&mut self, plane: Plane) -> CanonResult;

    /// G20/G21.
    fn use_length_units(&mut self, units: Units) -> CanonResult;

    /// G90/G91.
    fn set_distance_mode(&mut self, mode: DistanceMode) -> CanonResult;

    /// G28/G30.
    fn return_to_home(&mut self) -> CanonResult;

    /// G92 - make the current position read back as (x, y, z).
    fn set_origin_offsets(&mut self, x: f64, y: f64, z: f64) -> CanonResult;

    /// G0.
    fn straight_traverse(&mut self, x: f64, y: f64, z: f64) -> CanonResult;

    /// G1.
    fn straight_feed(&mut self, x: f64, y: f64, z: f64) -> CanonResult;

    /// G2/G3. `offset` holds the I, J, K words; a non-zero `radius` selects
    /// radius format.
    #[allow(clippy::too_many_arguments)]
    fn arc_feed(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        offset0: f64,
        offset1: f64,
        offset2: f64,
        radius: f64,
        mode: MotionMode,
    ) -> CanonResult;
}
