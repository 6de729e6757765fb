//! Options of a decode.

use crate::parser::{DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_LINE_LEN, LineParser};
use crate::resolver::ResolverConfig;

// =#========================================================================#=
// DECODE CONFIG
// =#========================================================================#=
/// All options of a [Decoder](crate::decode::Decoder).
///
/// # Defaults
/// * `complete_tree` - `true`, a lone child token before a label is label text
/// * `duplicate_ids` - `false`, ambiguous identifiers abort the decode
/// * `max_file_size` - 100 MiB
/// * `max_line_len` - 1024 bytes (exclusive)
///
/// # Example
/// ```
/// use treeweave::decode::DecodeConfig;
///
/// let config = DecodeConfig::new()
///     .with_complete_tree(false)
///     .with_duplicate_ids(true);
/// assert!(!config.complete_tree);
/// assert!(config.duplicate_ids);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    pub complete_tree: bool,
    pub duplicate_ids: bool,
    pub max_file_size: u64,
    pub max_line_len: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            complete_tree: true,
            duplicate_ids: false,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

impl DecodeConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets complete-tree mode; `false` allows nodes with a single child.
    pub fn with_complete_tree(mut self, complete_tree: bool) -> Self {
        self.complete_tree = complete_tree;
        self
    }

    /// Sets whether the same identifier may name several distinct nodes.
    pub fn with_duplicate_ids(mut self, duplicate_ids: bool) -> Self {
        self.duplicate_ids = duplicate_ids;
        self
    }

    /// Sets the maximum input file size in bytes.
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Sets the maximum line length in bytes (exclusive).
    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    /// Returns a line parser configured accordingly.
    pub fn line_parser(&self) -> LineParser {
        LineParser::new()
            .with_complete_tree(self.complete_tree)
            .with_max_line_len(self.max_line_len)
    }

    /// Returns the resolver part of this configuration.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::new().with_duplicate_ids(self.duplicate_ids)
    }
}
