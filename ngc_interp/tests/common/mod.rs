//! Recording canonical machine shared by the interpreter tests.

#![allow(dead_code)]

use ngc_common::prelude::*;

/// One canonical machine call, with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    InverseFeedRateMode(bool),
    FeedRate(f64),
    SpindleSpeed(f64),
    SelectTool(u32),
    ChangeTool,
    SpindleCw,
    SpindleCcw,
    SpindleStop,
    Dwell(f64),
    Plane(Plane),
    Units(Units),
    DistanceMode(DistanceMode),
    Home,
    OriginOffsets(f64, f64, f64),
    Traverse(f64, f64, f64),
    Feed(f64, f64, f64),
    Arc {
        target: [f64; 3],
        offset: [f64; 3],
        radius: f64,
        mode: MotionMode,
    },
}

impl Call {
    fn name(&self) -> &'static str {
        match self {
            Call::InverseFeedRateMode(_) => "inverse_feed_rate_mode",
            Call::FeedRate(_) => "feed_rate",
            Call::SpindleSpeed(_) => "spindle_speed",
            Call::SelectTool(_) => "select_tool",
            Call::ChangeTool => "change_tool",
            Call::SpindleCw => "spindle_cw",
            Call::SpindleCcw => "spindle_ccw",
            Call::SpindleStop => "spindle_stop",
            Call::Dwell(_) => "dwell",
            Call::Plane(_) => "plane",
            Call::Units(_) => "units",
            Call::DistanceMode(_) => "distance_mode",
            Call::Home => "home",
            Call::OriginOffsets(..) => "origin_offsets",
            Call::Traverse(..) => "traverse",
            Call::Feed(..) => "feed",
            Call::Arc { .. } => "arc",
        }
    }
}

/// Machine that records every call and can be told to reject one.
#[derive(Debug, Default)]
pub struct RecordingMachine {
    pub next_action: NextAction,
    pub motion_mode: MotionMode,
    pub position: [f64; 3],
    pub calls: Vec<Call>,
    pub fail_on: Option<&'static str>,
    pub blocks_begun: usize,
}

impl RecordingMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn failing_on(call: &'static str) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::default()
        }
    }

    fn record(&mut self, call: Call) -> CanonResult {
        let name = call.name();
        self.calls.push(call);
        if self.fail_on == Some(name) {
            return Err(CanonError::ValueOutOfRange {
                what: name,
                value: 0.0,
            });
        }
        Ok(())
    }
}

impl CanonicalMachine for RecordingMachine {
    fn next_action(&self) -> NextAction {
        self.next_action
    }

    fn motion_mode(&self) -> MotionMode {
        self.motion_mode
    }

    fn begin_block(&mut self) {
        self.blocks_begun += 1;
    }

    fn position(&self, axis: Axis) -> f64 {
        self.position[axis.index()]
    }

    fn set_inverse_feed_rate_mode(&mut self, enabled: bool) -> CanonResult {
        self.record(Call::InverseFeedRateMode(enabled))
    }

    fn set_feed_rate(&mut self, feed_rate: f64) -> CanonResult {
        self.record(Call::FeedRate(feed_rate))
    }

    fn set_spindle_speed(&mut self, speed: f64) -> CanonResult {
        self.record(Call::SpindleSpeed(speed))
    }

    fn select_tool(&mut self, tool: u32) -> CanonResult {
        self.record(Call::SelectTool(tool))
    }

    fn change_tool(&mut self) -> CanonResult {
        self.record(Call::ChangeTool)
    }

    fn start_spindle_clockwise(&mut self) -> CanonResult {
        self.record(Call::SpindleCw)
    }

    fn start_spindle_counterclockwise(&mut self) -> CanonResult {
        self.record(Call::SpindleCcw)
    }

    fn stop_spindle_turning(&mut self) -> CanonResult {
        self.record(Call::SpindleStop)
    }

    fn dwell(&mut self, seconds: f64) -> CanonResult {
        self.record(Call::Dwell(seconds))
    }

    fn select_plane(&mut self, plane: Plane) -> CanonResult {
        self.record(Call::Plane(plane))
    }

    fn use_length_units(&mut self, units: Units) -> CanonResult {
        self.record(Call::Units(units))
    }

    fn set_distance_mode(&mut self, mode: DistanceMode) -> CanonResult {
        self.record(Call::DistanceMode(mode))
    }

    fn return_to_home(&mut self) -> CanonResult {
        self.record(Call::Home)
    }

    fn set_origin_offsets(&mut self, x: f64, y: f64, z: f64) -> CanonResult {
        self.record(Call::OriginOffsets(x, y, z))
    }

    fn straight_traverse(&mut self, x: f64, y: f64, z: f64) -> CanonResult {
        self.record(Call::Traverse(x, y, z))?;
        self.position = [x, y, z];
        self.next_action = NextAction::Motion;
        self.motion_mode = MotionMode::StraightTraverse;
        Ok(())
    }

    fn straight_feed(&mut self, x: f64, y: f64, z: f64) -> CanonResult {
        self.record(Call::Feed(x, y, z))?;
        self.position = [x, y, z];
        self.next_action = NextAction::Motion;
        self.motion_mode = MotionMode::StraightFeed;
        Ok(())
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
        self.record(Call::Arc {
            target: [x, y, z],
            offset: [offset0, offset1, offset2],
            radius,
            mode,
        })?;
        self.position = [x, y, z];
        self.next_action = NextAction::Motion;
        self.motion_mode = mode;
        Ok(())
    }
}
