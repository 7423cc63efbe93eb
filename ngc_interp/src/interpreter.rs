//! Interpreter entry point.
//!
//! `Interpreter::execute_line` runs one raw line through normalization,
//! parsing and execution. Each call builds its own transient block state and
//! drops it before returning; the only state that outlives a call is the
//! canonical machine's.

use crate::block::parse_block;
use crate::error::{Completion, InterpError};
use crate::execute::execute_block;
use crate::normalize::normalize_block;
use ngc_common::canon::machine::CanonicalMachine;
use ngc_common::canon::types::ProgramFlow;
use tracing::{debug, info};

/// Output channel for `(MSG ...)` comments.
pub trait MessageSink {
    /// Deliver one message.
    fn message(&mut self, text: &str);
}

impl MessageSink for Vec<String> {
    fn message(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Sink that logs messages at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn message(&mut self, text: &str) {
        info!(target: "ngc::message", "{}", text);
    }
}

/// RS274/NGC interpreter bound to one canonical machine.
///
/// Calls must be serialized; `execute_line` takes `&mut self` so a block is
/// always parsed and dispatched before the next one starts.
#[derive(Debug)]
pub struct Interpreter<M> {
    machine: M,
    last_program_flow: Option<ProgramFlow>,
    blocks_executed: u64,
}

impl<M: CanonicalMachine> Interpreter<M> {
    /// Create an interpreter driving `machine`.
    pub fn new(machine: M) -> Self {
        Self {
            machine,
            last_program_flow: None,
            blocks_executed: 0,
        }
    }

    /// Interpret one line.
    ///
    /// Messages are delivered to `sink` as soon as the line is normalized,
    /// even if the command portion later fails.
    ///
    /// # Returns
    ///
    /// * `Ok(Completion::Ok)` - Block executed, or the line held no command
    /// * `Ok(Completion::Quit)` - Line was the `Q` sentinel
    /// * `Err(InterpError)` - Parsing failed (nothing was dispatched) or the
    ///   machine rejected a call (earlier calls stay committed)
    pub fn execute_line(
        &mut self,
        line: &str,
        sink: &mut dyn MessageSink,
    ) -> Result<Completion, InterpError> {
        self.last_program_flow = None;

        let block = normalize_block(line)?;
        if let Some(text) = &block.message {
            sink.message(text);
        }
        if block.is_empty() {
            return Ok(Completion::Ok);
        }
        if block.is_quit() {
            debug!("Quit sentinel received");
            return Ok(Completion::Quit);
        }

        self.machine.begin_block();
        let proposed = parse_block(&block.command, &self.machine)?;
        execute_block(&proposed, &mut self.machine)?;

        self.blocks_executed += 1;
        self.last_program_flow = proposed.changes.program_flow;
        Ok(Completion::Ok)
    }

    /// Program flow request (M0/M1/M2/M30/M60) of the last line, if it
    /// executed successfully.
    pub fn last_program_flow(&self) -> Option<ProgramFlow> {
        self.last_program_flow
    }

    /// Number of blocks dispatched successfully.
    pub fn blocks_executed(&self) -> u64 {
        self.blocks_executed
    }

    /// Canonical machine.
    pub fn machine(&self) -> &M {
        &self.machine
    }

    /// Canonical machine, mutably.
    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }

    /// Release the canonical machine.
    pub fn into_machine(self) -> M {
        self.machine
    }
}
