//! Parser turning one input line into a [NodeRecord].
//!
//! # Line format
//! ```text
//! <id> [<left> [<right>]] [<label ...>]
//! ```
//! Tokens are separated by spaces. The first token is the identifier of the
//! node and must be a decimal integer. Following tokens are taken as child
//! identifiers while they parse as integers, at most two of them. The first
//! token that is not an integer, or a third integer, starts the label, which
//! extends verbatim to the end of the line.
//!
//! # Complete-tree mode
//! In complete-tree mode (default), nodes are assumed to have zero or two
//! children. A single integer followed by a label is therefore the first
//! word of the label, not a child: `5 9 hello world` has label
//! `9 hello world` and no children.

use std::borrow::Cow;

use crate::model::{NodeId, NodeRecord};
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};

/// Default maximum line length in bytes; lines of this length or longer
/// are rejected.
pub const DEFAULT_MAX_LINE_LEN: usize = 1024;

// =#========================================================================#=
// LINE PARSER
// =#========================================================================#=
/// Configurable parser for single input lines.
///
/// # Example
/// ```
/// use treeweave::parser::LineParser;
///
/// let parser = LineParser::new();
/// let record = parser.parse_line("1 2 3 root node", 1).unwrap();
/// assert_eq!(record.id, 1);
/// assert_eq!((record.left, record.right), (Some(2), Some(3)));
/// assert_eq!(record.label.as_deref(), Some("root node"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParser {
    complete_tree: bool,
    max_line_len: usize,
}

impl Default for LineParser {
    fn default() -> Self {
        Self {
            complete_tree: true,
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

impl LineParser {
    /// Creates a parser in complete-tree mode with the default line limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets complete-tree mode (`true`, default) or incomplete-tree mode,
    /// which allows nodes with a single child.
    pub fn with_complete_tree(mut self, complete_tree: bool) -> Self {
        self.complete_tree = complete_tree;
        self
    }

    /// Sets the maximum line length in bytes (exclusive).
    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    /// Returns whether complete-tree mode is active.
    pub fn complete_tree(&self) -> bool {
        self.complete_tree
    }

    /// Returns the maximum line length in bytes.
    pub fn max_line_len(&self) -> usize {
        self.max_line_len
    }

    /// Parses a single line.
    ///
    /// The returned record is always described: its label is `Some`, empty
    /// if the line carried no label text.
    ///
    /// # Arguments
    /// * `line` - The line, without line terminator
    /// * `line_number` - 1-based line number, used for error reporting
    ///
    /// # Errors
    /// * [ParsingErrorType::LineTooLong] if `line` has `max_line_len` bytes or more
    /// * [ParsingErrorType::EmptyLine] if `line` holds no token
    /// * [ParsingErrorType::InvalidNodeId] if the first token is no integer
    pub fn parse_line(&self, line: &str, line_number: usize) -> Result<NodeRecord, ParsingError> {
        self.check_len(line.len(), line_number, || line.into())?;
        self.parse_fields(line, line_number)
    }

    /// Parses a single raw input line, decoding invalid UTF-8 lossily.
    ///
    /// The length limit applies to the raw bytes, so replacement characters
    /// do not count against it.
    ///
    /// # Errors
    /// Same as [LineParser::parse_line].
    pub fn parse_bytes(&self, line: &[u8], line_number: usize) -> Result<NodeRecord, ParsingError> {
        self.check_len(line.len(), line_number, || String::from_utf8_lossy(line))?;
        self.parse_fields(&String::from_utf8_lossy(line), line_number)
    }

    fn check_len<'a>(
        &self,
        len: usize,
        line_number: usize,
        text: impl FnOnce() -> Cow<'a, str>,
    ) -> Result<(), ParsingError> {
        if len >= self.max_line_len {
            return Err(ParsingError::at_line(
                ParsingErrorType::LineTooLong {
                    len,
                    max: self.max_line_len,
                },
                line_number,
                &text(),
            ));
        }
        Ok(())
    }

    fn parse_fields(&self, line: &str, line_number: usize) -> Result<NodeRecord, ParsingError> {
        let fail = |kind| Err(ParsingError::at_line(kind, line_number, line));

        let mut tokens = Tokens::new(line);
        let Some((_, first)) = tokens.next() else {
            return fail(ParsingErrorType::EmptyLine);
        };
        let Some(id) = parse_id(first) else {
            return fail(ParsingErrorType::InvalidNodeId);
        };

        let mut children: Vec<(NodeId, &str)> = Vec::with_capacity(2);
        let mut label = None;
        for (offset, token) in tokens {
            match parse_id(token) {
                Some(child) if children.len() < 2 => children.push((child, token)),
                _ => {
                    label = Some(&line[offset..]);
                    break;
                }
            }
        }

        let mut record = NodeRecord::new(id, label.unwrap_or_default());
        match (children.as_slice(), label) {
            // Lone child followed by a label is the label's first word
            ([(_, token)], Some(rest)) if self.complete_tree => {
                record.label = Some(format!("{} {}", token, rest));
            }
            _ => {
                let mut ids = children.iter().map(|(child, _)| *child);
                record.left = ids.next();
                record.right = ids.next();
            }
        }
        Ok(record)
    }
}

/// Parses a token as decimal integer with optional sign.
fn parse_id(token: &str) -> Option<NodeId> {
    token.parse().ok()
}

/// Iterator over the space separated tokens of a line, together with their
/// byte offsets. Runs of spaces yield no empty tokens.
struct Tokens<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.line.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos] == b' ' {
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            return None;
        }

        let start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos] != b' ' {
            self.pos += 1;
        }
        Some((start, &self.line[start..self.pos]))
    }
}
