//! # NGC Interpreter Library
//!
//! Turns one line of RS274/NGC code into calls against a
//! [`CanonicalMachine`](ngc_common::canon::machine::CanonicalMachine).
//!
//! ## Pipeline
//!
//! ```text
//! raw line ─► normalize ─► StatementReader ─► ProposedBlock ─► execute_block
//!             (comments,    (letter/value)     (seeded state +   (fixed RS274
//!              MSG, '/')                        BlockChanges)     order)
//! ```
//!
//! Parsing errors abort the block before anything is dispatched. Machine
//! errors abort the rest of the dispatch sequence.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ngc_interp::{Completion, Interpreter, LogSink};
//!
//! let mut interp = Interpreter::new(machine);
//! assert_eq!(interp.execute_line("G1 X10 F500", &mut LogSink)?, Completion::Ok);
//! ```

pub mod block;
pub mod error;
pub mod execute;
pub mod interpreter;
pub mod normalize;
pub mod statement;

pub use crate::block::{BlockChanges, ProposedBlock, parse_block};
pub use crate::error::{Completion, InterpError};
pub use crate::execute::execute_block;
pub use crate::interpreter::{Interpreter, LogSink, MessageSink};
pub use crate::normalize::{MAX_BLOCK_LEN, NormalizedBlock, normalize_block};
pub use crate::statement::{ParserContext, Statement, StatementReader};
