//! Canonical machine constants.

/// Millimeters per inch, used for G20 unit conversion.
pub const MM_PER_INCH: f64 = 25.4;

/// Number of linear axes addressed by a block (X, Y, Z).
pub const AXIS_COUNT: usize = 3;

/// Default maximum feed rate in mm/min.
pub const DEFAULT_MAX_FEED_RATE: f64 = 10_000.0;

/// Default maximum spindle speed in RPM.
pub const DEFAULT_MAX_SPINDLE_SPEED: f64 = 24_000.0;

/// Default number of tool slots.
pub const DEFAULT_TOOL_COUNT: u32 = 24;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/ngc/sim.toml";

// Status codes reported alongside a failed block
/// Block executed
pub const STATUS_OK: u8 = 0;
/// Quit interpreter mode
pub const STATUS_QUIT: u8 = 1;
/// Found a non-letter where a command letter was required
pub const STATUS_EXPECTED_COMMAND_LETTER: u8 = 10;
/// No numeric characters after a command letter
pub const STATUS_BAD_NUMBER_FORMAT: u8 = 11;
/// Letter/value combination not supported
pub const STATUS_UNSUPPORTED_STATEMENT: u8 = 12;
/// Command portion exceeds the block buffer
pub const STATUS_BLOCK_TOO_LONG: u8 = 13;
/// Value outside the machine's accepted range
pub const STATUS_VALUE_OUT_OF_RANGE: u8 = 20;
/// Feed motion requested without a feed rate
pub const STATUS_FEED_RATE_NOT_SET: u8 = 21;
/// Tool number beyond the tool table
pub const STATUS_TOOL_OUT_OF_RANGE: u8 = 22;
/// Arc cannot be constructed from the given words
pub const STATUS_INVALID_ARC: u8 = 23;
