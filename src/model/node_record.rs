//! Records as produced by the line parser.

use crate::model::tree_node::ChildSide;

/// Identifier of a node as written in the input.
///
/// Identifiers are not required to be unique when duplicate-identifier mode
/// is enabled, so they are never used to address nodes directly.
pub type NodeId = i64;

// =#========================================================================#=
// NODE RECORD
// =#========================================================================#=
/// One line's worth of information about a node.
///
/// # Invariants
/// - `label` is `None` exactly when the record is a placeholder, i.e. it was
///   synthesized because another record named `id` as a child.
/// - `label` is `Some` (possibly empty) when the record came from an input
///   line describing `id`.
/// - `left` is set before `right`; a record never names a right child
///   without a left one when produced by the line parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    /// Identifier of the described node
    pub id: NodeId,
    /// Free text label, `None` for placeholders
    pub label: Option<String>,
    /// Identifier of the left child, if named
    pub left: Option<NodeId>,
    /// Identifier of the right child, if named
    pub right: Option<NodeId>,
}

impl NodeRecord {
    /// Creates a described record without children.
    ///
    /// # Arguments
    /// * `id` - Identifier of the node
    /// * `label` - Label text, may be empty
    pub fn new<S: Into<String>>(id: NodeId, label: S) -> Self {
        Self {
            id,
            label: Some(label.into()),
            left: None,
            right: None,
        }
    }

    /// Creates a placeholder record, standing for a child reference.
    pub fn placeholder(id: NodeId) -> Self {
        Self {
            id,
            label: None,
            left: None,
            right: None,
        }
    }

    /// Sets the left child identifier.
    pub fn with_left(mut self, left: NodeId) -> Self {
        self.left = Some(left);
        self
    }

    /// Sets the right child identifier.
    pub fn with_right(mut self, right: NodeId) -> Self {
        self.right = Some(right);
        self
    }

    /// Sets both child identifiers.
    pub fn with_children(self, left: NodeId, right: NodeId) -> Self {
        self.with_left(left).with_right(right)
    }

    /// Returns `true` if this record carries no label and thus only
    /// references its identifier.
    pub fn is_placeholder(&self) -> bool {
        self.label.is_none()
    }

    /// Turns a placeholder into a described record with an empty label.
    ///
    /// Records ingested at the top level always stem from an input line,
    /// so they are described even if the line had no label text.
    pub fn into_described(mut self) -> Self {
        if self.label.is_none() {
            self.label = Some(String::new());
        }
        self
    }

    /// Returns the named children in order, left first.
    pub fn children(&self) -> Vec<(ChildSide, NodeId)> {
        let mut children = Vec::with_capacity(2);
        if let Some(left) = self.left {
            children.push((ChildSide::Left, left));
        }
        if let Some(right) = self.right {
            children.push((ChildSide::Right, right));
        }
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_has_no_label() {
        let record = NodeRecord::placeholder(4);
        assert!(record.is_placeholder());
        assert!(record.children().is_empty());

        let described = record.into_described();
        assert!(!described.is_placeholder());
        assert_eq!(described.label.as_deref(), Some(""));
    }

    #[test]
    fn test_children_in_order() {
        let record = NodeRecord::new(1, "root").with_children(2, 3);
        assert_eq!(
            record.children(),
            vec![(ChildSide::Left, 2), (ChildSide::Right, 3)]
        );

        let unary = NodeRecord::new(5, "unary").with_left(9);
        assert_eq!(unary.children(), vec![(ChildSide::Left, 9)]);
    }
}
