//! Error types for line parsing and input checks.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur before a record reaches the resolver:
//! lines that cannot be parsed, and input files that fail the pre-flight
//! check.

use std::fmt;
use thiserror::Error;

/// Maximum number of characters of the offending line kept as context.
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// Error types that can occur while reading input.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum ParsingErrorType {
    /// Line is at least as long as the configured maximum
    LineTooLong { len: usize, max: usize },
    /// First token is not a decimal integer
    InvalidNodeId,
    /// Line consists of spaces only
    EmptyLine,
    /// Path cannot be stat-ed or is not a regular file
    NotAccessible(String),
    /// File is larger than the configured maximum
    InputTooLarge { size: u64, max: u64 },
    IoError(String),
}

impl ParsingErrorType {
    /// Returns `true` for kinds concerning a single line, after which
    /// decoding may continue with the next line.
    pub fn is_line_local(&self) -> bool {
        matches!(
            self,
            ParsingErrorType::LineTooLong { .. }
                | ParsingErrorType::InvalidNodeId
                | ParsingErrorType::EmptyLine
        )
    }
}

impl fmt::Display for ParsingErrorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParsingErrorType::LineTooLong { len, max } => {
                write!(f, "Line too long ({len} bytes, limit is {max})")
            }
            ParsingErrorType::InvalidNodeId => write!(f, "Cannot parse node identifier"),
            ParsingErrorType::EmptyLine => write!(f, "Line contains no tokens"),
            ParsingErrorType::NotAccessible(msg) => write!(f, "Input not accessible - {msg}"),
            ParsingErrorType::InputTooLarge { size, max } => {
                write!(f, "Input too large ({size} bytes, limit is {max})")
            }
            ParsingErrorType::IoError(msg) => write!(f, "IO error - {msg}"),
        }
    }
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================$=
/// Parsing error with contextual information (line number and line text).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{}", .kind, location(.line, .context))]
pub struct ParsingError {
    kind: ParsingErrorType,
    /// 1-based line number, 0 if not tied to a line
    line: usize,
    context: String,
}

fn location(line: &usize, context: &str) -> String {
    match (*line, context.is_empty()) {
        (0, _) => String::new(),
        (line, true) => format!(" at line {line}"),
        (line, false) => format!(" at line {line}\n  Context: {context}"),
    }
}

impl ParsingError {
    /// Creates a ParsingError for a line, keeping the start of the line as
    /// context.
    pub fn at_line(kind: ParsingErrorType, line: usize, text: &str) -> Self {
        Self {
            kind,
            line,
            context: text.chars().take(DEFAULT_CONTEXT_LENGTH).collect(),
        }
    }

    /// Creates a ParsingError not tied to any line (file checks, IO).
    pub fn without_context(kind: ParsingErrorType) -> Self {
        Self {
            kind,
            line: 0,
            context: String::new(),
        }
    }

    /// Convenience constructor for NotAccessible
    pub fn not_accessible(msg: String) -> Self {
        Self::without_context(ParsingErrorType::NotAccessible(msg))
    }

    /// Convenience constructor for InputTooLarge
    pub fn input_too_large(size: u64, max: u64) -> Self {
        Self::without_context(ParsingErrorType::InputTooLarge { size, max })
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the line where the error occurred, 0 if none
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the (possibly shortened) offending line
    pub fn context(&self) -> &str {
        &self.context
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        // No line, no context for IO errors
        Self::without_context(ParsingErrorType::IoError(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_line_and_context() {
        let err = ParsingError::at_line(ParsingErrorType::InvalidNodeId, 7, "abc 1 2");
        assert_eq!(
            err.to_string(),
            "Cannot parse node identifier at line 7\n  Context: abc 1 2"
        );
        assert!(err.kind().is_line_local());
    }

    #[test]
    fn test_display_without_context() {
        let err = ParsingError::input_too_large(20, 10);
        assert_eq!(err.to_string(), "Input too large (20 bytes, limit is 10)");
        assert_eq!(err.line(), 0);
        assert!(!err.kind().is_line_local());
    }

    #[test]
    fn test_context_is_shortened() {
        let long = "x".repeat(200);
        let err = ParsingError::at_line(ParsingErrorType::EmptyLine, 1, &long);
        assert_eq!(err.context().len(), DEFAULT_CONTEXT_LENGTH);
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: ParsingError = io.into();
        assert_eq!(err.kind(), &ParsingErrorType::IoError("boom".to_string()));
    }
}
