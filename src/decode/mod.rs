//! Decoding of line-based node descriptions into a [DecodedTree].
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`decode_file`] - checks and decodes a file
//! * [`decode_str`] - decodes an in-memory string
//!
//! # Full API
//! For more control, configure a [`DecodeConfig`] and use a [`Decoder`]:
//! * [`Decoder::decode_file`] - decode a file
//! * [`Decoder::decode_reader`] - decode any [`BufRead`](std::io::BufRead)
//! * [`Decoder::decode_reader_with`] - decode into a custom
//!   [`TreeBuilder`](crate::model::TreeBuilder)
//!
//! Lines that cannot be parsed are skipped with a warning, every other
//! problem aborts the decode.

mod config;
mod decoder;

pub use self::config::DecodeConfig;
pub use self::decoder::{DecodeError, DecodeStats, Decoder};

use crate::model::DecodedTree;
use std::path::Path;

// ============================================================================
// QUICK DECODING API (pub)
// ============================================================================
/// Decodes a file with default settings (complete-tree mode, duplicate
/// identifiers rejected).
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
///
/// # Returns
/// * [`DecodedTree`] - The linked tree
/// * [`DecodeError`] - If the file fails the checks or the records do not
///   form exactly one tree
///
/// # Example
/// ```no_run
/// use treeweave::decode::decode_file;
///
/// let tree = decode_file("nodes.txt").unwrap();
/// println!("{}", tree.bfs_labels());
/// ```
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DecodedTree, DecodeError> {
    Decoder::new(DecodeConfig::default()).decode_file(path)
}

/// Decodes a string with default settings.
///
/// # Example
/// ```
/// use treeweave::decode::decode_str;
///
/// let tree = decode_str("1 2 3 root\n2 left\n3 right\n").unwrap();
/// assert_eq!(tree.bfs_labels(), "root left right ");
/// ```
pub fn decode_str<S: AsRef<str>>(input: S) -> Result<DecodedTree, DecodeError> {
    Decoder::new(DecodeConfig::default()).decode_str(input.as_ref())
}
