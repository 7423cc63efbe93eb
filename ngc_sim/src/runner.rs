//! Program runner.
//!
//! Feeds a program to the interpreter one line at a time. A failed block is
//! reported with its status code and the offending line, then the run
//! continues with the next line. The run ends at end of input, at the `Q`
//! sentinel, or at a program end (M2/M30/M60).

use crate::error::SimError;
use ngc_common::canon::machine::CanonicalMachine;
use ngc_common::canon::types::ProgramFlow;
use ngc_interp::{Completion, Interpreter, MessageSink};
use std::io::BufRead;
use tracing::{error, info};

/// Why a run ended before end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStop {
    /// `Q` sentinel.
    Quit,
    /// M2, M30 or M60.
    ProgramEnd,
}

/// A block the interpreter rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockFailure {
    /// 1-based input line number.
    pub line_number: usize,
    /// Raw line text.
    pub line: String,
    /// Status code.
    pub code: u8,
    /// Error description.
    pub message: String,
}

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Lines read.
    pub lines: usize,
    /// Lines that completed without error.
    pub completed: usize,
    /// M0/M1 pauses seen.
    pub pauses: usize,
    /// Rejected blocks.
    pub failures: Vec<BlockFailure>,
    /// Early stop, if any.
    pub stop: Option<RunStop>,
}

impl RunSummary {
    /// True if no block failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run every line of `input` through `interp`.
///
/// # Errors
///
/// Returns `SimError::Io` if reading the input fails. Block errors are
/// collected in the summary instead.
pub fn run_program<M, R>(
    interp: &mut Interpreter<M>,
    input: R,
    sink: &mut dyn MessageSink,
) -> Result<RunSummary, SimError>
where
    M: CanonicalMachine,
    R: BufRead,
{
    let mut summary = RunSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        summary.lines += 1;

        match interp.execute_line(&line, sink) {
            Ok(Completion::Quit) => {
                info!("Quit requested at line {}", index + 1);
                summary.completed += 1;
                summary.stop = Some(RunStop::Quit);
                break;
            }
            Ok(Completion::Ok) => {
                summary.completed += 1;
                match interp.last_program_flow() {
                    Some(ProgramFlow::End) => {
                        info!("Program end at line {}", index + 1);
                        summary.stop = Some(RunStop::ProgramEnd);
                        break;
                    }
                    Some(ProgramFlow::Stop) => {
                        info!("Program paused at line {}", index + 1);
                        summary.pauses += 1;
                    }
                    None => {}
                }
            }
            Err(e) => {
                error!("status {}: {} in block \"{}\"", e.code(), e, line);
                summary.failures.push(BlockFailure {
                    line_number: index + 1,
                    line,
                    code: e.code(),
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(summary)
}
