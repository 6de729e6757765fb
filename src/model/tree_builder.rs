//! Trait for constructing output trees once resolution is complete.
//!
//! The [`TreeBuilder`] trait decouples the resolver from concrete tree
//! representations. When a decode finishes, the resolver walks the resolved
//! nodes top-down (breadth-first) and calls the builder for each of them;
//! the builder assembles whatever tree structure it wants.
//!
//! # Built-in implementations
//! * [`DecodedTreeBuilder`] - Builds a [`DecodedTree`]
//!
//! # Custom implementations
//! You can implement [`TreeBuilder`] to construct your own tree representation,
//! allowing you to reuse the resolution logic without adopting this crate's
//! tree model.
//!
//! # Builder lifecycle
//! ```text
//! Empty ──→ init_next() ──→ Building ──→ add_root/add_child ──→ finish_tree() ──→ Empty
//! ```

use crate::model::node_record::NodeId;
use crate::model::tree::{DecodedTree, VertexIndex};
use crate::model::tree_node::ChildSide;

// =#========================================================================#=
// TREE BUILDER (trait)
// =#========================================================================T=
/// Abstraction for constructing trees from resolved nodes.
///
/// The resolver drives the lifecycle:
///
/// 1. [`init_next`](Self::init_next) -> prepare for a new tree
/// 2. [`add_root`](Self::add_root) once, then
///    [`add_child`](Self::add_child) for every other node; a parent is
///    always added before its children
/// 3. [`finish_tree`](Self::finish_tree) -> finalize and return the tree
pub trait TreeBuilder {
    /// The type used to identify vertices during construction.
    ///
    /// Returned by the `add_*` methods, then passed to
    /// [`add_child`](Self::add_child) to connect children to their parent.
    type VertexIdx: Copy;

    /// The tree type produced by this builder.
    type Tree;

    /// Prepares the builder for constructing a new tree.
    ///
    /// # Arguments
    /// * `num_vertices` — Number of vertices that will be added
    fn init_next(&mut self, num_vertices: usize);

    /// Adds the root vertex.
    fn add_root(&mut self, id: NodeId, label: String) -> Self::VertexIdx;

    /// Adds a vertex as the `side` child of `parent`.
    fn add_child(
        &mut self,
        parent: Self::VertexIdx,
        side: ChildSide,
        id: NodeId,
        label: String,
    ) -> Self::VertexIdx;

    /// Finalizes the building process and returns the resulting tree.
    ///
    /// Returns `None` if [`init_next`](Self::init_next) was not called.
    fn finish_tree(&mut self) -> Option<Self::Tree>;
}

// =#========================================================================#=
// DECODED TREE BUILDER
// =#========================================================================#=
/// Builder that constructs [DecodedTree] instances.
#[derive(Debug, Default)]
pub struct DecodedTreeBuilder {
    current_tree: Option<DecodedTree>,
}

impl DecodedTreeBuilder {
    /// Creates a new builder in the empty state.
    pub fn new() -> Self {
        Self { current_tree: None }
    }
}

impl TreeBuilder for DecodedTreeBuilder {
    type VertexIdx = VertexIndex;
    type Tree = DecodedTree;

    fn init_next(&mut self, num_vertices: usize) {
        self.current_tree = Some(DecodedTree::new(num_vertices));
    }

    fn add_root(&mut self, id: NodeId, label: String) -> VertexIndex {
        let tree = self.current_tree.as_mut().expect("init not called");
        tree.add_root(id, label)
    }

    fn add_child(
        &mut self,
        parent: VertexIndex,
        side: ChildSide,
        id: NodeId,
        label: String,
    ) -> VertexIndex {
        let tree = self.current_tree.as_mut().expect("init not called");
        tree.add_child(parent, side, id, label)
    }

    fn finish_tree(&mut self) -> Option<DecodedTree> {
        self.current_tree.take()
    }
}
