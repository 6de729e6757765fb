//! Vertex type of a [DecodedTree](crate::model::DecodedTree).

use crate::model::node_record::NodeId;
use crate::model::tree::VertexIndex;
use crate::model::tree_node::ChildSide;

// =#========================================================================#=
// TREE VERTEX
// =#========================================================================#=
/// A vertex of a decoded binary tree.
///
/// Unlike the nodes used during resolution, a vertex knows its parent, and
/// its children are indices into the same arena.
///
/// # Invariants
/// - `index` is the position of this vertex in the arena
/// - The root has no parent, every other vertex has one
/// - A vertex has zero, one, or two children; a single child may sit on
///   either side (incomplete trees)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeVertex {
    /// Index of this vertex in the tree arena
    index: VertexIndex,
    /// Identifier as given in the input
    id: NodeId,
    /// Label text, possibly empty
    label: String,
    /// Index of the parent vertex, `None` for the root
    parent: Option<VertexIndex>,
    /// Index of the left child vertex
    left: Option<VertexIndex>,
    /// Index of the right child vertex
    right: Option<VertexIndex>,
}

impl TreeVertex {
    /// Creates a new root vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `id` - Identifier from the input
    /// * `label` - Label text
    pub fn new_root(index: VertexIndex, id: NodeId, label: String) -> Self {
        Self {
            index,
            id,
            label,
            parent: None,
            left: None,
            right: None,
        }
    }

    /// Creates a new non-root vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `id` - Identifier from the input
    /// * `label` - Label text
    /// * `parent` - Index of the parent vertex
    pub fn new_child(index: VertexIndex, id: NodeId, label: String, parent: VertexIndex) -> Self {
        Self {
            index,
            id,
            label,
            parent: Some(parent),
            left: None,
            right: None,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        self.index
    }

    /// Returns the identifier of this vertex.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the label of this vertex.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the index of the parent, `None` for the root.
    pub fn parent(&self) -> Option<VertexIndex> {
        self.parent
    }

    /// Returns `true` if this vertex has a parent set.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Returns `true` if this vertex is the root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the index of the left child.
    pub fn left(&self) -> Option<VertexIndex> {
        self.left
    }

    /// Returns the index of the right child.
    pub fn right(&self) -> Option<VertexIndex> {
        self.right
    }

    /// Returns the index of the child on the given side.
    pub fn child(&self, side: ChildSide) -> Option<VertexIndex> {
        match side {
            ChildSide::Left => self.left,
            ChildSide::Right => self.right,
        }
    }

    /// Returns the indices of present children, left first.
    pub fn children(&self) -> impl Iterator<Item = VertexIndex> {
        self.left.into_iter().chain(self.right)
    }

    /// Returns the number of children (0, 1, or 2).
    pub fn num_children(&self) -> usize {
        self.left.is_some() as usize + self.right.is_some() as usize
    }

    /// Returns `true` if this vertex has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Sets the child on the given side.
    ///
    /// # Panics
    /// Panics if that child is already set.
    pub(crate) fn set_child(&mut self, side: ChildSide, child: VertexIndex) {
        let field = match side {
            ChildSide::Left => &mut self.left,
            ChildSide::Right => &mut self.right,
        };
        assert!(
            field.is_none(),
            "Child {:?} of vertex {} is already set",
            side,
            self.index
        );
        *field = Some(child);
    }
}
