//! Parse failure type.

use serde::Serialize;

/// A template that could not be parsed.
///
/// Carries the position of the offending token so callers can report it
/// the same way as a rule diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message} (line {line}, column {column})")]
pub struct ParseError {
    /// Human-readable reason.
    pub message: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed).
    pub column: usize,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}
