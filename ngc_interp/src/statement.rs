//! Statement tokenizer.
//!
//! Walks a normalized command and yields `(letter, value, fraction)`
//! statements left to right. The reader keeps a single cursor, so repeated
//! calls resume where the previous one stopped.

use crate::error::InterpError;
use ngc_common::canon::consts::STATUS_OK;

/// One letter/value pair, e.g. `X10.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statement {
    /// Uppercase command letter.
    pub letter: char,
    /// Signed decimal value.
    pub value: f64,
    /// `value - trunc(value)`.
    pub fraction: f64,
}

impl Statement {
    /// Build a statement, deriving the fractional part.
    pub fn new(letter: char, value: f64) -> Self {
        Self {
            letter,
            value,
            fraction: value - value.trunc(),
        }
    }
}

/// Cursor over a normalized command.
#[derive(Debug, Clone)]
pub struct StatementReader<'a> {
    line: &'a str,
    cursor: usize,
    failed: bool,
}

impl<'a> StatementReader<'a> {
    /// Start reading at the beginning of `line`.
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            cursor: 0,
            failed: false,
        }
    }

    /// Byte offset of the next unread character.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Read the next statement.
    ///
    /// Returns `Ok(None)` at end of line.
    ///
    /// # Errors
    ///
    /// - `InterpError::ExpectedCommandLetter` if the cursor is not on an
    ///   uppercase letter
    /// - `InterpError::BadNumberFormat` if no number follows the letter
    pub fn next_statement(&mut self) -> Result<Option<Statement>, InterpError> {
        let bytes = self.line.as_bytes();
        let Some(&first) = bytes.get(self.cursor) else {
            return Ok(None);
        };

        if !first.is_ascii_uppercase() {
            let found = self.line[self.cursor..].chars().next().unwrap_or('\0');
            return Err(InterpError::ExpectedCommandLetter {
                found,
                position: self.cursor,
            });
        }
        let letter = first as char;
        self.cursor += 1;

        let start = self.cursor;
        let end = scan_decimal(bytes, start);
        let value = self.line[start..end]
            .parse::<f64>()
            .map_err(|_| InterpError::BadNumberFormat {
                letter,
                position: start,
            })?;
        self.cursor = end;

        Ok(Some(Statement::new(letter, value)))
    }
}

impl Iterator for StatementReader<'_> {
    type Item = Result<Statement, InterpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.next_statement().transpose();
        if matches!(result, Some(Err(_))) {
            self.failed = true;
        }
        result
    }
}

impl std::iter::FusedIterator for StatementReader<'_> {}

/// End of the longest signed decimal starting at `start`, or `start` if
/// there is none.
fn scan_decimal(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut digits = i - int_start;

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        digits += i - frac_start;
    }

    if digits == 0 { start } else { i }
}

/// Per-statement scratch for one parse pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParserContext {
    /// Letter of the statement being applied.
    pub letter: char,
    /// Its value.
    pub value: f64,
    /// Its fractional part.
    pub fraction: f64,
    /// Status code of the last statement.
    pub status: u8,
}

impl Default for ParserContext {
    fn default() -> Self {
        Self {
            letter: '\0',
            value: 0.0,
            fraction: 0.0,
            status: STATUS_OK,
        }
    }
}

impl ParserContext {
    /// Load the next statement.
    pub fn load(&mut self, statement: &Statement) {
        self.letter = statement.letter;
        self.value = statement.value;
        self.fraction = statement.fraction;
    }

    /// Record a failure.
    pub fn fail(&mut self, error: &InterpError) {
        self.status = error.code();
    }
}
