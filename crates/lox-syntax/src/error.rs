//! Error types for the engine.
//!
//! Syntax errors never abort a parse. They are collected on the
//! [`SyntaxTree`](crate::SyntaxTree) as [`SyntaxError`] diagnostics next to
//! the `ERROR` nodes recovery produced. [`ParseError`] is reserved for the
//! one condition checked before parsing starts.

use std::fmt;
use std::ops::Range;

use thiserror::Error;

use crate::lexer::LexErrorKind;

/// What went wrong at a recovery point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SyntaxErrorKind {
    /// The tokenizer matched nothing under the state's lexical mode.
    #[error(transparent)]
    LexError(#[from] LexErrorKind),
    /// A well-formed token the state has no action for.
    #[error("unexpected token")]
    UnexpectedToken,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

/// A diagnostic recorded during error recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    /// Bytes of the offending token or character.
    pub range: Range<usize>,
    /// Name of the offending symbol, for [`SyntaxErrorKind::UnexpectedToken`].
    pub found: Option<&'static str>,
    /// Names of the terminals the failing state had an action for.
    pub expected: Vec<&'static str>,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.found) {
            (SyntaxErrorKind::UnexpectedToken, Some(found)) => {
                write!(f, "unexpected token `{found}`")?
            }
            (kind, _) => write!(f, "{kind}")?,
        }
        write!(f, " at {}..{}", self.range.start, self.range.end)?;

        match self.expected.as_slice() {
            [] => Ok(()),
            [only] => write!(f, ", expected `{only}`"),
            many => {
                f.write_str(", expected one of ")?;
                for (index, name) in many.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "`{name}`")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Failure to start a parse at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("input is {len} bytes, over the {limit} byte limit")]
    InputTooLarge { len: usize, limit: usize },
}
