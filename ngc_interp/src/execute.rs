//! Block execution.
//!
//! Calls the canonical machining functions in the order of RS274NGC_3
//! table 8, not in the order the words appear in the block:
//!
//! 1. feed rate mode (G93, G94)
//! 2. feed rate (F)
//! 3. spindle speed (S)
//! 4. select tool (T)
//! 5. change tool (M6)
//! 6. spindle on or off (M3, M4, M5)
//! 7. dwell (G4)
//! 8. active plane (G17, G18, G19)
//! 9. length units (G20, G21)
//! 10. distance mode (G90, G91)
//! 11. home (G28, G30)
//! 12. axis offsets (G92)
//! 13. motion (G0 to G3)
//!
//! Coolant, overrides, cutter compensation, coordinate system selection,
//! path control and retract mode are recognized by the parser but have no
//! step here. The first failing call ends the block; earlier calls stay
//! committed.

use crate::block::ProposedBlock;
use ngc_common::canon::consts::AXIS_COUNT;
use ngc_common::canon::machine::{CanonResult, CanonicalMachine};
use ngc_common::canon::types::{MotionMode, NextAction, SpindleMode};
use tracing::trace;

/// Execute a parsed block against `machine`.
pub fn execute_block<M: CanonicalMachine + ?Sized>(
    block: &ProposedBlock,
    machine: &mut M,
) -> CanonResult {
    let changes = &block.changes;

    if let Some(enabled) = changes.inverse_feed_rate_mode {
        machine.set_inverse_feed_rate_mode(enabled)?;
    }
    if let Some(feed_rate) = changes.feed_rate {
        machine.set_feed_rate(feed_rate)?;
    }
    if let Some(speed) = changes.spindle_speed {
        machine.set_spindle_speed(speed)?;
    }
    if let Some(tool) = changes.tool {
        machine.select_tool(tool)?;
    }
    if changes.change_tool == Some(true) {
        machine.change_tool()?;
    }

    if let Some(mode) = changes.spindle_mode {
        match mode {
            SpindleMode::Cw => machine.start_spindle_clockwise()?,
            SpindleMode::Ccw => machine.start_spindle_counterclockwise()?,
            // failsafe: anything that is not a start request stops the spindle
            _ => machine.stop_spindle_turning()?,
        }
    }

    if block.next_action == NextAction::Dwell {
        machine.dwell(changes.dwell_time.unwrap_or(0.0))?;
    }

    if let Some(plane) = changes.plane {
        machine.select_plane(plane)?;
    }
    if let Some(units) = changes.units {
        machine.use_length_units(units)?;
    }
    if let Some(mode) = changes.distance_mode {
        machine.set_distance_mode(mode)?;
    }

    let [x, y, z] = block.target;

    if block.next_action == NextAction::GoHome {
        machine.return_to_home()?;
    }
    if block.next_action == NextAction::OffsetCoordinates {
        machine.set_origin_offsets(x, y, z)?;
    }

    if block.next_action != NextAction::Motion {
        return Ok(());
    }
    trace!(mode = ?block.motion_mode, x, y, z, "motion");
    match block.motion_mode {
        MotionMode::StraightTraverse => machine.straight_traverse(x, y, z),
        MotionMode::StraightFeed => machine.straight_feed(x, y, z),
        MotionMode::CwArc | MotionMode::CcwArc => {
            let offset: [f64; AXIS_COUNT] = changes.offset.map(|o| o.unwrap_or(0.0));
            machine.arc_feed(
                x,
                y,
                z,
                offset[0],
                offset[1],
                offset[2],
                changes.radius.unwrap_or(0.0),
                block.motion_mode,
            )
        }
        MotionMode::Cancel => Ok(()),
    }
}
