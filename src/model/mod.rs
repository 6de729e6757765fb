//! Data model for records, nodes under construction, and decoded trees.
//!
//! # Input side
//! Each input line becomes a [NodeRecord]: an identifier, an optional label,
//! and up to two child identifiers. A record without a label is a
//! *placeholder*, synthesized because some other record named it as a child.
//!
//! # Construction side
//! While records are being resolved, nodes live as [TreeNode]s in the
//! resolver's arena and are addressed by [NodeHandle]. A [Slot] names a
//! location that can hold a node: the root, or the left/right field of an
//! already allocated node. Relinking only ever rewrites slots, node contents
//! are never copied.
//!
//! # Output side
//! A finished decode is handed over as a [DecodedTree], a compact arena of
//! [TreeVertex] values referenced by [VertexIndex]. Trees are produced through
//! the [TreeBuilder] trait, so a caller can plug in their own representation:
//!
//! - [DecodedTreeBuilder] → [DecodedTree]

pub mod node_record;
pub mod tree;
pub mod tree_builder;
pub mod tree_node;
pub mod vertex;

// Records
pub use node_record::{NodeId, NodeRecord};
// Nodes under construction
pub use tree_node::{ChildSide, NodeHandle, Slot, TreeNode};
// Decoded tree
pub use tree::{DecodedTree, VertexIndex};
pub use tree_builder::{DecodedTreeBuilder, TreeBuilder};
pub use vertex::TreeVertex;
