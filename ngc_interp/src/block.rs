//! Block accumulation.
//!
//! A block is parsed into a `ProposedBlock`: the modal values that carry
//! over from the machine (next action, motion mode, target) plus a
//! `BlockChanges` record in which every field set by the block is `Some`.
//! Nothing in a `ProposedBlock` survives past the block it was parsed from.

use crate::error::InterpError;
use crate::statement::{ParserContext, Statement, StatementReader};
use ngc_common::canon::consts::AXIS_COUNT;
use ngc_common::canon::machine::CanonicalMachine;
use ngc_common::canon::types::{
    Axis, DistanceMode, MotionMode, NextAction, Plane, ProgramFlow, SpindleMode, Units,
};
use tracing::{debug, trace};

/// Values explicitly assigned by a block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockChanges {
    /// G0-G4, G28, G30, G92.
    pub next_action: Option<NextAction>,
    /// G0-G3, G80.
    pub motion_mode: Option<MotionMode>,
    /// X, Y, Z.
    pub target: [Option<f64>; AXIS_COUNT],
    /// I, J, K.
    pub offset: [Option<f64>; AXIS_COUNT],
    /// R.
    pub radius: Option<f64>,
    /// F.
    pub feed_rate: Option<f64>,
    /// P.
    pub dwell_time: Option<f64>,
    /// S.
    pub spindle_speed: Option<f64>,
    /// M3, M4, M5.
    pub spindle_mode: Option<SpindleMode>,
    /// T.
    pub tool: Option<u32>,
    /// M6.
    pub change_tool: Option<bool>,
    /// G17, G18, G19.
    pub plane: Option<Plane>,
    /// G20, G21.
    pub units: Option<Units>,
    /// G90, G91.
    pub distance_mode: Option<DistanceMode>,
    /// G93, G94.
    pub inverse_feed_rate_mode: Option<bool>,
    /// G53.
    pub absolute_override: Option<bool>,
    /// G92.
    pub origin_offset_mode: Option<bool>,
    /// M0, M1, M2, M30, M60.
    pub program_flow: Option<ProgramFlow>,
}

impl BlockChanges {
    /// Number of fields assigned by the block.
    pub fn changed_count(&self) -> usize {
        let scalars = [
            self.next_action.is_some(),
            self.motion_mode.is_some(),
            self.radius.is_some(),
            self.feed_rate.is_some(),
            self.dwell_time.is_some(),
            self.spindle_speed.is_some(),
            self.spindle_mode.is_some(),
            self.tool.is_some(),
            self.change_tool.is_some(),
            self.plane.is_some(),
            self.units.is_some(),
            self.distance_mode.is_some(),
            self.inverse_feed_rate_mode.is_some(),
            self.absolute_override.is_some(),
            self.origin_offset_mode.is_some(),
            self.program_flow.is_some(),
        ];
        scalars.iter().filter(|&&set| set).count()
            + self.target.iter().flatten().count()
            + self.offset.iter().flatten().count()
    }
}

/// Next state proposed by one block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposedBlock {
    /// Effective next action (carried over unless the block sets one).
    pub next_action: NextAction,
    /// Effective motion mode (carried over unless the block sets one).
    pub motion_mode: MotionMode,
    /// Effective target per axis (carried over unless the block sets one).
    pub target: [f64; AXIS_COUNT],
    /// Fields assigned by the block.
    pub changes: BlockChanges,
}

impl ProposedBlock {
    /// Start a block from carried-over modal values.
    pub fn new(next_action: NextAction, motion_mode: MotionMode, target: [f64; AXIS_COUNT]) -> Self {
        Self {
            next_action,
            motion_mode,
            target,
            changes: BlockChanges::default(),
        }
    }

    /// Start a block seeded from the machine's persistent state.
    pub fn seeded<M: CanonicalMachine + ?Sized>(machine: &M) -> Self {
        Self::new(
            machine.next_action(),
            machine.motion_mode(),
            Axis::ALL.map(|axis| machine.position(axis)),
        )
    }

    fn set_next_action(&mut self, action: NextAction) {
        self.next_action = action;
        self.changes.next_action = Some(action);
    }

    fn set_motion(&mut self, mode: MotionMode) {
        self.motion_mode = mode;
        self.changes.motion_mode = Some(mode);
        self.set_next_action(NextAction::Motion);
    }

    fn set_target(&mut self, axis: Axis, value: f64) {
        self.target[axis.index()] = value;
        self.changes.target[axis.index()] = Some(value);
    }

    /// Apply one statement.
    ///
    /// # Errors
    ///
    /// Returns `InterpError::UnsupportedStatement` for any letter or code
    /// outside the supported set.
    pub fn apply(&mut self, statement: &Statement) -> Result<(), InterpError> {
        let value = statement.value;
        match statement.letter {
            'G' => return self.apply_g(statement),
            'M' => return self.apply_m(statement),
            'T' => self.changes.tool = Some(tool_number(statement)?),
            'F' => self.changes.feed_rate = Some(value),
            'P' => self.changes.dwell_time = Some(value),
            'S' => self.changes.spindle_speed = Some(value),
            'X' => self.set_target(Axis::X, value),
            'Y' => self.set_target(Axis::Y, value),
            'Z' => self.set_target(Axis::Z, value),
            'I' => self.changes.offset[0] = Some(value),
            'J' => self.changes.offset[1] = Some(value),
            'K' => self.changes.offset[2] = Some(value),
            'R' => self.changes.radius = Some(value),
            'N' => {}
            _ => return Err(unsupported(statement)),
        }
        Ok(())
    }

    fn apply_g(&mut self, statement: &Statement) -> Result<(), InterpError> {
        // truncates toward zero: G92.1 is handled as G92
        match statement.value as i32 {
            0 => self.set_motion(MotionMode::StraightTraverse),
            1 => self.set_motion(MotionMode::StraightFeed),
            2 => self.set_motion(MotionMode::CwArc),
            3 => self.set_motion(MotionMode::CcwArc),
            4 => self.set_next_action(NextAction::Dwell),
            17 => self.changes.plane = Some(Plane::Xy),
            18 => self.changes.plane = Some(Plane::Xz),
            19 => self.changes.plane = Some(Plane::Yz),
            20 => self.changes.units = Some(Units::Inches),
            21 => self.changes.units = Some(Units::Millimeters),
            28 | 30 => self.set_next_action(NextAction::GoHome),
            53 => self.changes.absolute_override = Some(true),
            80 => {
                self.motion_mode = MotionMode::Cancel;
                self.changes.motion_mode = Some(MotionMode::Cancel);
            }
            90 => self.changes.distance_mode = Some(DistanceMode::Absolute),
            91 => self.changes.distance_mode = Some(DistanceMode::Incremental),
            92 => {
                self.changes.origin_offset_mode = Some(true);
                self.set_next_action(NextAction::OffsetCoordinates);
            }
            93 => self.changes.inverse_feed_rate_mode = Some(true),
            94 => self.changes.inverse_feed_rate_mode = Some(false),
            // cutter radius comp cancel, tool length offset cancel, exact path
            40 | 49 | 61 => {}
            _ => return Err(unsupported(statement)),
        }
        Ok(())
    }

    fn apply_m(&mut self, statement: &Statement) -> Result<(), InterpError> {
        match statement.value as i32 {
            0 | 1 => self.changes.program_flow = Some(ProgramFlow::Stop),
            2 | 30 | 60 => self.changes.program_flow = Some(ProgramFlow::End),
            3 => self.changes.spindle_mode = Some(SpindleMode::Cw),
            4 => self.changes.spindle_mode = Some(SpindleMode::Ccw),
            5 => self.changes.spindle_mode = Some(SpindleMode::Off),
            6 => self.changes.change_tool = Some(true),
            // coolant, feed/speed override enable
            7 | 8 | 9 | 48 | 49 => {}
            _ => return Err(unsupported(statement)),
        }
        Ok(())
    }
}

fn unsupported(statement: &Statement) -> InterpError {
    InterpError::UnsupportedStatement {
        letter: statement.letter,
        value: statement.value,
    }
}

fn tool_number(statement: &Statement) -> Result<u32, InterpError> {
    let tool = statement.value.trunc();
    if tool < 0.0 || tool > f64::from(u32::MAX) {
        return Err(unsupported(statement));
    }
    Ok(tool as u32)
}

/// Parse a normalized command into a proposed next state.
///
/// Next action, motion mode and target are seeded from `machine` before the
/// first statement is applied. Parsing stops at the first failing statement.
pub fn parse_block<M: CanonicalMachine + ?Sized>(
    command: &str,
    machine: &M,
) -> Result<ProposedBlock, InterpError> {
    let mut block = ProposedBlock::seeded(machine);
    let mut ctx = ParserContext::default();

    for statement in StatementReader::new(command) {
        let applied = statement.and_then(|statement| {
            ctx.load(&statement);
            trace!(letter = %ctx.letter, value = ctx.value, "statement");
            block.apply(&statement)
        });
        if let Err(e) = applied {
            ctx.fail(&e);
            debug!(status = ctx.status, "Block rejected: {}", e);
            return Err(e);
        }
    }

    debug!(
        changed = block.changes.changed_count(),
        next_action = ?block.next_action,
        motion_mode = ?block.motion_mode,
        "Block parsed"
    );
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applied(statements: &[(char, f64)]) -> ProposedBlock {
        let mut block = ProposedBlock::new(NextAction::None, MotionMode::StraightFeed, [1.0, 2.0, 3.0]);
        for &(letter, value) in statements {
            block.apply(&Statement::new(letter, value)).unwrap();
        }
        block
    }

    #[test]
    fn test_motion_codes_set_mode_and_action() {
        let cases = [
            (0.0, MotionMode::StraightTraverse),
            (1.0, MotionMode::StraightFeed),
            (2.0, MotionMode::CwArc),
            (3.0, MotionMode::CcwArc),
        ];
        for (code, mode) in cases {
            let block = applied(&[('G', code)]);
            assert_eq!(block.motion_mode, mode);
            assert_eq!(block.next_action, NextAction::Motion);
            assert_eq!(block.changes.motion_mode, Some(mode));
            assert_eq!(block.changes.next_action, Some(NextAction::Motion));
        }
    }

    #[test]
    fn test_value_words_set_one_field_each() {
        let cases: [(char, f64, fn(&BlockChanges) -> bool); 11] = [
            ('F', 500.0, |c| c.feed_rate == Some(500.0)),
            ('P', 1.5, |c| c.dwell_time == Some(1.5)),
            ('S', 1200.0, |c| c.spindle_speed == Some(1200.0)),
            ('T', 3.7, |c| c.tool == Some(3)),
            ('X', 10.0, |c| c.target[0] == Some(10.0)),
            ('Y', -4.0, |c| c.target[1] == Some(-4.0)),
            ('Z', 0.5, |c| c.target[2] == Some(0.5)),
            ('I', 1.0, |c| c.offset[0] == Some(1.0)),
            ('J', 2.0, |c| c.offset[1] == Some(2.0)),
            ('K', 3.0, |c| c.offset[2] == Some(3.0)),
            ('R', 5.0, |c| c.radius == Some(5.0)),
        ];
        for (letter, value, check) in cases {
            let block = applied(&[(letter, value)]);
            assert!(check(&block.changes), "{letter}{value}");
            assert_eq!(block.changes.changed_count(), 1, "{letter}{value}");
        }
    }

    #[test]
    fn test_modal_g_codes() {
        let c = applied(&[('G', 18.0), ('G', 20.0), ('G', 91.0), ('G', 93.0), ('G', 53.0)]).changes;
        assert_eq!(c.plane, Some(Plane::Xz));
        assert_eq!(c.units, Some(Units::Inches));
        assert_eq!(c.distance_mode, Some(DistanceMode::Incremental));
        assert_eq!(c.inverse_feed_rate_mode, Some(true));
        assert_eq!(c.absolute_override, Some(true));

        let c = applied(&[('G', 19.0), ('G', 21.0), ('G', 90.0), ('G', 94.0)]).changes;
        assert_eq!(c.plane, Some(Plane::Yz));
        assert_eq!(c.units, Some(Units::Millimeters));
        assert_eq!(c.distance_mode, Some(DistanceMode::Absolute));
        assert_eq!(c.inverse_feed_rate_mode, Some(false));
    }

    #[test]
    fn test_non_modal_g_codes() {
        assert_eq!(applied(&[('G', 4.0)]).next_action, NextAction::Dwell);
        assert_eq!(applied(&[('G', 28.0)]).next_action, NextAction::GoHome);
        assert_eq!(applied(&[('G', 30.0)]).next_action, NextAction::GoHome);

        let block = applied(&[('G', 92.0)]);
        assert_eq!(block.next_action, NextAction::OffsetCoordinates);
        assert_eq!(block.changes.origin_offset_mode, Some(true));
    }

    #[test]
    fn test_g80_cancels_motion_mode_only() {
        let block = applied(&[('G', 80.0)]);
        assert_eq!(block.motion_mode, MotionMode::Cancel);
        assert_eq!(block.next_action, NextAction::None);
        assert!(block.changes.next_action.is_none());
    }

    #[test]
    fn test_m_codes() {
        let cases = [
            (0.0, Some(ProgramFlow::Stop)),
            (1.0, Some(ProgramFlow::Stop)),
            (2.0, Some(ProgramFlow::End)),
            (30.0, Some(ProgramFlow::End)),
            (60.0, Some(ProgramFlow::End)),
        ];
        for (code, flow) in cases {
            assert_eq!(applied(&[('M', code)]).changes.program_flow, flow);
        }
        assert_eq!(applied(&[('M', 3.0)]).changes.spindle_mode, Some(SpindleMode::Cw));
        assert_eq!(applied(&[('M', 4.0)]).changes.spindle_mode, Some(SpindleMode::Ccw));
        assert_eq!(applied(&[('M', 5.0)]).changes.spindle_mode, Some(SpindleMode::Off));
        assert_eq!(applied(&[('M', 6.0)]).changes.change_tool, Some(true));
    }

    #[test]
    fn test_ignored_codes_change_nothing() {
        let block = applied(&[
            ('G', 40.0),
            ('G', 49.0),
            ('G', 61.0),
            ('M', 7.0),
            ('M', 8.0),
            ('M', 9.0),
            ('M', 48.0),
            ('M', 49.0),
            ('N', 120.0),
        ]);
        assert_eq!(block.changes, BlockChanges::default());
        assert_eq!(block.target, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_unsupported_statements() {
        let mut block = ProposedBlock::default();
        for (letter, value) in [('G', 500.0), ('G', -1.0), ('M', 99.0), ('A', 1.0), ('Q', 1.0), ('T', -2.0)] {
            assert_eq!(
                block.apply(&Statement::new(letter, value)),
                Err(InterpError::UnsupportedStatement { letter, value })
            );
        }
    }

    #[test]
    fn test_fractional_g_code_truncates() {
        assert_eq!(applied(&[('G', 1.9)]).motion_mode, MotionMode::StraightFeed);
    }

    #[test]
    fn test_untouched_targets_keep_seed() {
        let block = applied(&[('X', 9.0)]);
        assert_eq!(block.target, [9.0, 2.0, 3.0]);
        assert_eq!(block.changes.target, [Some(9.0), None, None]);
    }
}
