//! Block normalization.
//!
//! Splits a raw line into its command and comment portions. The command is
//! upper-cased and stripped of whitespace, control characters and invalid
//! punctuation. A comment always terminates the block; text following it is
//! dropped, so embedded comments are not supported.
//!
//! Valid command characters (RS274NGC_3 Appendix E):
//!
//! | Class | Characters |
//! |-------|------------|
//! | letters, digits | passed, letters upper-cased |
//! | punctuation | `+ - . / * < = > \| # ) [ ] { }` passed |
//! | spaces, tabs, controls, DEL | dropped |
//! | invalid punctuation | ``! $ % , ; : ? @ ^ _ ~ ` ' "`` dropped |
//! | `(` | starts the comment |
//!
//! A leading `/` is the block-delete character and discards the line.

use crate::error::InterpError;

/// Capacity of the normalized command buffer.
pub const MAX_BLOCK_LEN: usize = 255;

/// Normalized command text.
pub type CommandBuf = heapless::String<MAX_BLOCK_LEN>;

/// Result of normalizing one raw line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBlock {
    /// Canonical command string.
    pub command: CommandBuf,
    /// Text of a `(MSG ...)` comment.
    pub message: Option<String>,
}

impl NormalizedBlock {
    /// Nothing to parse (pure comment, blank line or deleted block).
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }

    /// Command is the quit sentinel.
    pub fn is_quit(&self) -> bool {
        self.command.as_str() == "Q"
    }
}

enum CharClass {
    Keep,
    Drop,
    CommentStart,
}

fn classify(c: char) -> CharClass {
    match c {
        'A'..='Z' | '0'..='9' => CharClass::Keep,
        '(' => CharClass::CommentStart,
        '\0'..=' ' | '\x7f' => CharClass::Drop,
        '!' | '$' | '%' | ',' | ';' | ':' | '?' | '@' | '^' | '_' | '~' | '`' | '\'' | '"' => {
            CharClass::Drop
        }
        c if c.is_ascii() => CharClass::Keep,
        _ => CharClass::Drop,
    }
}

/// Normalize a raw line.
///
/// # Errors
///
/// Returns `InterpError::BlockTooLong` if the command portion exceeds
/// [`MAX_BLOCK_LEN`] characters.
pub fn normalize_block(raw: &str) -> Result<NormalizedBlock, InterpError> {
    let mut block = NormalizedBlock::default();
    let mut comment = None;

    for (i, c) in raw.char_indices() {
        let c = c.to_ascii_uppercase();
        match classify(c) {
            CharClass::Keep if c == '/' && block.command.is_empty() => {
                return Ok(NormalizedBlock::default());
            }
            CharClass::Keep => block
                .command
                .push(c)
                .map_err(|_| InterpError::BlockTooLong { max: MAX_BLOCK_LEN })?,
            CharClass::Drop => {}
            CharClass::CommentStart => {
                comment = Some(&raw[i + 1..]);
                break;
            }
        }
    }

    block.message = comment.and_then(extract_message);
    Ok(block)
}

/// Message text of a comment starting with `MSG` (any case), up to the
/// closing parenthesis or end of line.
fn extract_message(comment: &str) -> Option<String> {
    let prefix = comment.get(..3)?;
    if !prefix.eq_ignore_ascii_case("MSG") {
        return None;
    }
    let body = &comment[3..];
    let body = match body.find(')') {
        Some(end) => &body[..end],
        None => body,
    };
    Some(body.trim_start().to_string())
}
