//! Treeweave rebuilds binary trees from unordered per-node text records.
//!
//! Each input line describes one node: its integer identifier, up to two
//! child identifiers, and a free text label. Lines may come in any order:
//! children may be named long before they are described, and a node first
//! taken for the root may later turn out to be somebody's child.
//! Core functionality provided:
//! - Resolver: incremental reference resolution, linking records into one
//!   tree with bounded work per record, re-anchoring the root as parents
//!   arrive, detecting conflicting and incomplete input.
//! - Line parser: tokenizes lines into records, with complete-tree mode
//!   (default, a lone integer before a label is label text) and
//!   incomplete-tree mode (allowing single-child nodes).
//! - Tree model: [DecodedTree] using the arena pattern, with breadth-first
//!   and depth-first traversals. Custom output trees can be built by
//!   implementing [TreeBuilder](crate::model::TreeBuilder).
//! - Configurability:
//!   - Duplicate-identifier mode: the same identifier may name several
//!     distinct nodes, matched in arrival order
//!   - Maximum file size and maximum line length
//!
//! Limitations:
//! - Only binary trees
//! - One tree per input
//!
//! # Usage patterns
//! Can decode input in two main ways:
//! 1. Quick access with default settings: [decode_file] and [decode_str].
//! 2. Configure a [Decoder](crate::decode::Decoder) with a
//!    [DecodeConfig](crate::decode::DecodeConfig), or drive a
//!    [Resolver](crate::resolver::Resolver) with records directly.
//!
//! ## Example Default Configuration
//!
//! ```
//! use treeweave::decode_str;
//!
//! let tree = decode_str("2 left\n3 right\n1 2 3 root\n").unwrap();
//! assert_eq!(tree.bfs_labels(), "root left right ");
//! assert_eq!(tree.in_order_labels(), "left root right ");
//! ```
//!
//! ## Example Configuration
//!
//! ```no_run
//! use treeweave::decode::{DecodeConfig, Decoder};
//!
//! let config = DecodeConfig::new()
//!     .with_complete_tree(false)   // Allow single-child nodes
//!     .with_duplicate_ids(true)    // Same id may name several nodes
//!     .with_max_file_size(1 << 20);
//!
//! let mut decoder = Decoder::new(config);
//! let tree = decoder.decode_file("nodes.txt")?;
//! println!("Decoded {} nodes", tree.num_vertices());
//! # Ok::<(), treeweave::decode::DecodeError>(())
//! ```

pub mod decode;
pub mod model;
pub mod parser;
pub mod resolver;

use crate::decode::DecodeError;
use crate::model::DecodedTree;
use std::path::Path;

// ============================================================================
// Quick API
// ============================================================================
/// Decodes a file using default settings.
///
/// See [`decode::decode_file`] for full documentation.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DecodedTree, DecodeError> {
    decode::decode_file(path)
}

/// Decodes a string using default settings.
///
/// See [`decode::decode_str`] for full documentation.
pub fn decode_str<S: AsRef<str>>(input: S) -> Result<DecodedTree, DecodeError> {
    decode::decode_str(input)
}
