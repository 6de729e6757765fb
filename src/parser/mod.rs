//! Input handling ahead of resolution.
//!
//! This module turns raw input into [NodeRecord](crate::model::NodeRecord)s:
//! a line parser, the pre-flight check for input files, and the error type
//! shared by both.

pub mod file_check;
pub mod line_parser;
pub mod parsing_error;

pub use file_check::{DEFAULT_MAX_FILE_SIZE, check_file};
pub use line_parser::{DEFAULT_MAX_LINE_LEN, LineParser};
pub use parsing_error::{ParsingError, ParsingErrorType};
