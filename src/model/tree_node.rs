//! Nodes and slots used while a tree is still being resolved.

use crate::model::node_record::NodeId;

/// Stable handle of a [TreeNode] in the resolver's arena.
///
/// Handles are never reused within one decode, so a handle kept in a
/// [Slot] stays meaningful even after other nodes were released.
pub type NodeHandle = usize;

// =#========================================================================#=
// CHILD SIDE / SLOT
// =#========================================================================#=
/// Which child field of a node is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildSide {
    Left,
    Right,
}

/// A location that can hold a [TreeNode].
///
/// Either the root of the tree or a child field of an already allocated node.
/// Resolution moves nodes around by rewriting which slot holds which handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The root of the tree under construction
    Root,
    /// Child field `side` of node `parent`
    Child {
        /// Node owning the field
        parent: NodeHandle,
        /// Which of the two fields
        side: ChildSide,
    },
}

impl Slot {
    /// Creates a slot for the left child field of `parent`.
    pub fn left_of(parent: NodeHandle) -> Self {
        Slot::Child {
            parent,
            side: ChildSide::Left,
        }
    }

    /// Creates a slot for the right child field of `parent`.
    pub fn right_of(parent: NodeHandle) -> Self {
        Slot::Child {
            parent,
            side: ChildSide::Right,
        }
    }

}

// =#========================================================================#=
// TREE NODE
// =#========================================================================#=
/// A node of the tree under construction.
///
/// Children are referenced by [NodeHandle] and filled in one at a time while
/// the record that named them is being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub(crate) id: NodeId,
    pub(crate) label: String,
    pub(crate) left: Option<NodeHandle>,
    pub(crate) right: Option<NodeHandle>,
    pub(crate) placeholder: bool,
}

impl TreeNode {
    /// Creates a fully described node without children.
    pub fn described(id: NodeId, label: String) -> Self {
        Self {
            id,
            label,
            left: None,
            right: None,
            placeholder: false,
        }
    }

    /// Creates a placeholder node with an empty label, standing in for a
    /// node whose description has not arrived yet.
    pub fn placeholder(id: NodeId) -> Self {
        Self {
            id,
            label: String::new(),
            left: None,
            right: None,
            placeholder: true,
        }
    }

    /// Returns the identifier of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the label; empty for placeholders.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns whether this is a placeholder node.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Returns the handle held in the given child field.
    pub fn child(&self, side: ChildSide) -> Option<NodeHandle> {
        match side {
            ChildSide::Left => self.left,
            ChildSide::Right => self.right,
        }
    }

    pub(crate) fn child_mut(&mut self, side: ChildSide) -> &mut Option<NodeHandle> {
        match side {
            ChildSide::Left => &mut self.left,
            ChildSide::Right => &mut self.right,
        }
    }

    /// Returns the handles of present children, left first.
    pub fn children(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.left.into_iter().chain(self.right)
    }
}
