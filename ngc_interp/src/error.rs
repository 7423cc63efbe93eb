//! Interpreter status and error types.
//!
//! A block either completes (`Completion`) or fails with an `InterpError`.
//! Every outcome maps to a numeric status code for console reporting.

use ngc_common::canon::consts::{
    STATUS_BAD_NUMBER_FORMAT, STATUS_BLOCK_TOO_LONG, STATUS_EXPECTED_COMMAND_LETTER, STATUS_OK,
    STATUS_QUIT, STATUS_UNSUPPORTED_STATEMENT,
};
use ngc_common::canon::machine::CanonError;
use thiserror::Error;

/// Successful outcome of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Block executed, or nothing to execute.
    Ok,
    /// `Q` sentinel: caller should leave interpreter mode.
    Quit,
}

impl Completion {
    /// Numeric status code.
    pub const fn code(self) -> u8 {
        match self {
            Completion::Ok => STATUS_OK,
            Completion::Quit => STATUS_QUIT,
        }
    }
}

/// Errors that abort a block.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpError {
    /// A statement did not start with an uppercase letter.
    #[error("Expected command letter, found '{found}' at position {position}")]
    ExpectedCommandLetter {
        /// Offending character
        found: char,
        /// Byte offset in the normalized command
        position: usize,
    },

    /// No numeric characters followed a command letter.
    #[error("Bad number format after '{letter}' at position {position}")]
    BadNumberFormat {
        /// Letter the number belonged to
        letter: char,
        /// Byte offset of the missing number
        position: usize,
    },

    /// Letter/value combination outside the supported set.
    #[error("Unsupported statement {letter}{value}")]
    UnsupportedStatement {
        /// Statement letter
        letter: char,
        /// Statement value
        value: f64,
    },

    /// Command portion does not fit the block buffer.
    #[error("Block exceeds {max} characters")]
    BlockTooLong {
        /// Buffer capacity
        max: usize,
    },

    /// Canonical machine rejected a call.
    #[error(transparent)]
    Machine(#[from] CanonError),
}

impl InterpError {
    /// Numeric status code; machine errors pass their own code through.
    pub const fn code(&self) -> u8 {
        match self {
            InterpError::ExpectedCommandLetter { .. } => STATUS_EXPECTED_COMMAND_LETTER,
            InterpError::BadNumberFormat { .. } => STATUS_BAD_NUMBER_FORMAT,
            InterpError::UnsupportedStatement { .. } => STATUS_UNSUPPORTED_STATEMENT,
            InterpError::BlockTooLong { .. } => STATUS_BLOCK_TOO_LONG,
            InterpError::Machine(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_codes() {
        assert_eq!(Completion::Ok.code(), STATUS_OK);
        assert_eq!(Completion::Quit.code(), STATUS_QUIT);
    }

    #[test]
    fn test_machine_error_passes_code_through() {
        let err = InterpError::from(CanonError::FeedRateNotSet);
        assert_eq!(err.code(), CanonError::FeedRateNotSet.code());
        assert_eq!(err.to_string(), "Feed rate not set");
    }

    #[test]
    fn test_unsupported_statement_display() {
        let err = InterpError::UnsupportedStatement {
            letter: 'G',
            value: 500.0,
        };
        assert_eq!(err.to_string(), "Unsupported statement G500");
        assert_eq!(err.code(), STATUS_UNSUPPORTED_STATEMENT);
    }
}
