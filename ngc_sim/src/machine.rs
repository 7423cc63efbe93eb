//! Simulated canonical machine.
//!
//! `SimMachine` keeps the persistent machine state in memory and applies
//! each canonical call to it instantly. Positions are stored in millimeters
//! in machine coordinates; the interpreter sees work coordinates in the
//! active units.

use ngc_common::canon::config::MachineConfig;
use ngc_common::canon::consts::{AXIS_COUNT, MM_PER_INCH};
use ngc_common::canon::machine::{CanonError, CanonResult, CanonicalMachine};
use ngc_common::canon::types::{
    Axis, DistanceMode, MotionMode, NextAction, Plane, SpindleMode, Units,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Persistent machine state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineState {
    /// Next action carried into the following block.
    pub next_action: NextAction,
    /// Active motion mode.
    pub motion_mode: MotionMode,
    /// Machine position in mm.
    pub position: [f64; AXIS_COUNT],
    /// G92 offsets in mm (machine = work + offset).
    pub origin_offset: [f64; AXIS_COUNT],
    /// Active length units.
    pub units: Units,
    /// Active distance mode.
    pub distance_mode: DistanceMode,
    /// Active plane.
    pub plane: Plane,
    /// G93 active.
    pub inverse_feed_rate_mode: bool,
    /// Feed rate in mm/min, or 1/min in inverse-time mode.
    pub feed_rate: f64,
    /// Spindle speed in RPM.
    pub spindle_speed: f64,
    /// Spindle direction.
    pub spindle_mode: SpindleMode,
    /// Tool selected by the last T word.
    pub selected_tool: u32,
    /// Tool in the spindle.
    pub active_tool: u32,
    /// Accumulated dwell time in seconds.
    pub dwell_seconds: f64,
    /// Number of motion commands executed.
    pub motion_count: u64,
}

/// One accepted canonical call, with values as the machine stored them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum CanonCall {
    /// G93/G94.
    InverseFeedRateMode {
        /// G93 active.
        enabled: bool,
    },
    /// F word.
    FeedRate {
        /// mm/min, or 1/min in inverse-time mode.
        value: f64,
    },
    /// S word.
    SpindleSpeed {
        /// RPM.
        value: f64,
    },
    /// T word.
    SelectTool {
        /// Selected tool number.
        tool: u32,
    },
    /// M6.
    ChangeTool {
        /// Tool now in the spindle.
        tool: u32,
    },
    /// M3/M4/M5.
    Spindle {
        /// New direction.
        mode: SpindleMode,
    },
    /// G4.
    Dwell {
        /// Dwell time.
        seconds: f64,
    },
    /// G17/G18/G19.
    SelectPlane {
        /// Active plane.
        plane: Plane,
    },
    /// G20/G21.
    LengthUnits {
        /// Active units.
        units: Units,
    },
    /// G90/G91.
    DistanceMode {
        /// Active distance mode.
        mode: DistanceMode,
    },
    /// G28/G30.
    ReturnToHome,
    /// G92.
    OriginOffsets {
        /// Offsets in mm.
        offset: [f64; AXIS_COUNT],
    },
    /// G0 to G3.
    Motion {
        /// Motion mode of the move.
        mode: MotionMode,
        /// End point in machine mm.
        to: [f64; AXIS_COUNT],
    },
}

/// Work position readback the current block was seeded with, taken before
/// a G20/G21 switch.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SeedReadback {
    units: Units,
    work: [f64; AXIS_COUNT],
}

/// Software canonical machine.
#[derive(Debug, Clone)]
pub struct SimMachine {
    config: MachineConfig,
    state: MachineState,
    journal: Vec<CanonCall>,
    seed: Option<SeedReadback>,
}

impl SimMachine {
    /// Create a machine at machine zero.
    pub fn new(config: MachineConfig) -> Self {
        Self::with_state(config, MachineState::default())
    }

    /// Create a machine from restored state.
    pub fn with_state(config: MachineConfig, state: MachineState) -> Self {
        Self {
            config,
            state,
            journal: Vec::new(),
            seed: None,
        }
    }

    /// Current persistent state.
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Machine limits.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Calls accepted since the journal was last taken.
    pub fn journal(&self) -> &[CanonCall] {
        &self.journal
    }

    /// Drain the journal.
    pub fn take_journal(&mut self) -> Vec<CanonCall> {
        std::mem::take(&mut self.journal)
    }

    fn scale(&self) -> f64 {
        units_scale(self.state.units)
    }

    fn work_readback(&self) -> [f64; AXIS_COUNT] {
        let mut work = [0.0; AXIS_COUNT];
        for axis in Axis::ALL {
            work[axis.index()] = self.position(axis);
        }
        work
    }

    /// Work coordinate in active units to machine mm. A value equal to the
    /// readback taken before a units switch in this block is a carried axis
    /// and stays where it is.
    fn axis_to_machine(&self, i: usize, value: f64) -> f64 {
        match self.seed {
            Some(seed) if seed.work[i] == value => {
                debug!(axis = i, units = ?seed.units, "carried axis keeps position");
                self.state.position[i]
            }
            _ => value * self.scale() + self.state.origin_offset[i],
        }
    }

    fn to_machine(&self, work: [f64; AXIS_COUNT]) -> [f64; AXIS_COUNT] {
        let mut out = [0.0; AXIS_COUNT];
        for (i, value) in work.iter().enumerate() {
            out[i] = self.axis_to_machine(i, *value);
        }
        out
    }

    fn accept(&mut self, call: CanonCall) -> CanonResult {
        debug!(?call, "canon");
        self.journal.push(call);
        Ok(())
    }

    fn reject(&self, err: CanonError) -> CanonResult {
        warn!("Canonical call rejected: {}", err);
        Err(err)
    }

    fn require_feed_rate(&self) -> CanonResult {
        if self.state.feed_rate <= 0.0 {
            return self.reject(CanonError::FeedRateNotSet);
        }
        Ok(())
    }

    fn move_to(&mut self, mode: MotionMode, target: [f64; AXIS_COUNT]) -> CanonResult {
        self.state.position = target;
        self.state.next_action = NextAction::Motion;
        self.state.motion_mode = mode;
        self.state.motion_count += 1;
        self.accept(CanonCall::Motion { mode, to: target })
    }

    /// In-plane components of a machine-coordinate vector.
    fn plane_components(&self, v: [f64; AXIS_COUNT]) -> (f64, f64) {
        match self.state.plane {
            Plane::Xy => (v[0], v[1]),
            Plane::Xz => (v[0], v[2]),
            Plane::Yz => (v[1], v[2]),
        }
    }

    fn validate_arc(&self, target: [f64; AXIS_COUNT], offset: [f64; AXIS_COUNT], radius: f64) -> CanonResult {
        if radius == 0.0 {
            let (a, b) = self.plane_components(offset);
            if a == 0.0 && b == 0.0 {
                return self.reject(CanonError::InvalidArc(
                    "neither radius nor center offset given".to_string(),
                ));
            }
            return Ok(());
        }

        let (sa, sb) = self.plane_components(self.state.position);
        let (ea, eb) = self.plane_components(target);
        let chord = ((ea - sa).powi(2) + (eb - sb).powi(2)).sqrt();
        if chord == 0.0 {
            return self.reject(CanonError::InvalidArc(
                "radius format arc with identical end points".to_string(),
            ));
        }
        let radius_mm = radius.abs() * self.scale();
        // small tolerance for endpoints exactly one diameter apart
        if chord > 2.0 * radius_mm + 1e-9 {
            return self.reject(CanonError::InvalidArc(format!(
                "radius {radius} too small for chord {chord:.4} mm"
            )));
        }
        Ok(())
    }
}

fn units_scale(units: Units) -> f64 {
    match units {
        Units::Inches => MM_PER_INCH,
        Units::Millimeters => 1.0,
    }
}

impl CanonicalMachine for SimMachine {
    fn next_action(&self) -> NextAction {
        self.state.next_action
    }

    fn motion_mode(&self) -> MotionMode {
        self.state.motion_mode
    }

    fn begin_block(&mut self) {
        self.seed = None;
    }

    fn position(&self, axis: Axis) -> f64 {
        let i = axis.index();
        (self.state.position[i] - self.state.origin_offset[i]) / self.scale()
    }

    fn set_inverse_feed_rate_mode(&mut self, enabled: bool) -> CanonResult {
        self.state.inverse_feed_rate_mode = enabled;
        self.accept(CanonCall::InverseFeedRateMode { enabled })
    }

    fn set_feed_rate(&mut self, feed_rate: f64) -> CanonResult {
        if !feed_rate.is_finite() || feed_rate < 0.0 {
            return self.reject(CanonError::ValueOutOfRange {
                what: "feed rate",
                value: feed_rate,
            });
        }
        let value = if self.state.inverse_feed_rate_mode {
            feed_rate
        } else {
            feed_rate * self.scale()
        };
        if !self.state.inverse_feed_rate_mode && value > self.config.max_feed_rate {
            return self.reject(CanonError::ValueOutOfRange {
                what: "feed rate",
                value: feed_rate,
            });
        }
        self.state.feed_rate = value;
        self.accept(CanonCall::FeedRate { value })
    }

    fn set_spindle_speed(&mut self, speed: f64) -> CanonResult {
        if !speed.is_finite() || speed < 0.0 || speed > self.config.max_spindle_speed {
            return self.reject(CanonError::ValueOutOfRange {
                what: "spindle speed",
                value: speed,
            });
        }
        self.state.spindle_speed = speed;
        self.accept(CanonCall::SpindleSpeed { value: speed })
    }

    fn select_tool(&mut self, tool: u32) -> CanonResult {
        if tool > self.config.tool_count {
            return self.reject(CanonError::ToolOutOfRange {
                tool,
                max: self.config.tool_count,
            });
        }
        self.state.selected_tool = tool;
        self.accept(CanonCall::SelectTool { tool })
    }

    fn change_tool(&mut self) -> CanonResult {
        let tool = self.state.selected_tool;
        self.state.active_tool = tool;
        self.accept(CanonCall::ChangeTool { tool })
    }

    fn start_spindle_clockwise(&mut self) -> CanonResult {
        self.state.spindle_mode = SpindleMode::Cw;
        self.accept(CanonCall::Spindle {
            mode: SpindleMode::Cw,
        })
    }

    fn start_spindle_counterclockwise(&mut self) -> CanonResult {
        self.state.spindle_mode = SpindleMode::Ccw;
        self.accept(CanonCall::Spindle {
            mode: SpindleMode::Ccw,
        })
    }

    fn stop_spindle_turning(&mut self) -> CanonResult {
        self.state.spindle_mode = SpindleMode::Off;
        self.accept(CanonCall::Spindle {
            mode: SpindleMode::Off,
        })
    }

    fn dwell(&mut self, seconds: f64) -> CanonResult {
        if !seconds.is_finite() || seconds < 0.0 {
            return self.reject(CanonError::ValueOutOfRange {
                what: "dwell time",
                value: seconds,
            });
        }
        self.state.dwell_seconds += seconds;
        self.accept(CanonCall::Dwell { seconds })
    }

    fn select_plane(&mut self, plane: Plane) -> CanonResult {
        self.state.plane = plane;
        self.accept(CanonCall::SelectPlane { plane })
    }

    fn use_length_units(&mut self, units: Units) -> CanonResult {
        if units != self.state.units && self.seed.is_none() {
            self.seed = Some(SeedReadback {
                units: self.state.units,
                work: self.work_readback(),
            });
        }
        self.state.units = units;
        self.accept(CanonCall::LengthUnits { units })
    }

    fn set_distance_mode(&mut self, mode: DistanceMode) -> CanonResult {
        self.state.distance_mode = mode;
        self.accept(CanonCall::DistanceMode { mode })
    }

    fn return_to_home(&mut self) -> CanonResult {
        self.state.position = [0.0; AXIS_COUNT];
        self.accept(CanonCall::ReturnToHome)
    }

    fn set_origin_offsets(&mut self, x: f64, y: f64, z: f64) -> CanonResult {
        let mut offset = [0.0; AXIS_COUNT];
        for (i, work) in [x, y, z].iter().enumerate() {
            // work distance in mm from the current origin
            let work_mm = self.axis_to_machine(i, *work) - self.state.origin_offset[i];
            offset[i] = self.state.position[i] - work_mm;
        }
        self.state.origin_offset = offset;
        self.accept(CanonCall::OriginOffsets { offset })
    }

    fn straight_traverse(&mut self, x: f64, y: f64, z: f64) -> CanonResult {
        let target = self.to_machine([x, y, z]);
        self.move_to(MotionMode::StraightTraverse, target)
    }

    fn straight_feed(&mut self, x: f64, y: f64, z: f64) -> CanonResult {
        self.require_feed_rate()?;
        let target = self.to_machine([x, y, z]);
        self.move_to(MotionMode::StraightFeed, target)
    }

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
    ) -> CanonResult {
        if !mode.is_arc() {
            return self.reject(CanonError::Unsupported(format!("arc feed in {mode:?} mode")));
        }
        self.require_feed_rate()?;
        let target = self.to_machine([x, y, z]);
        self.validate_arc(target, [offset0, offset1, offset2], radius)?;
        self.move_to(mode, target)
    }
}
