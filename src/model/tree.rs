//! Provides the decoded tree representation.
//!
//! Provides core data structures for a finished decode:
//! * [DecodedTree] - Binary tree using the arena pattern
//! * [VertexIndex] as type used to index vertices in tree
//! * Traversal iterators (breadth-first, in-order, pre-order, post-order),
//!   all stack or queue based, so deep trees do not exhaust the call stack

use crate::model::node_record::NodeId;
use crate::model::tree_node::ChildSide;
use crate::model::vertex::TreeVertex;
use std::collections::VecDeque;
use std::fmt::Write;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: VertexIndex = usize::MAX;

// =$========================================================================$=
// DECODED TREE
// =$========================================================================$=
/// A binary tree rebuilt from node records, represented using the arena
/// pattern on [TreeVertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex]. Vertices know their parent as well as their children.
///
/// # Structure
/// - All vertices are stored in the arena, the index of the root is maintained.
/// - When produced by the resolver, vertices are added in breadth-first
///   order, so two decodes of the same tree shape compare equal.
/// - Identifiers are not necessarily unique (duplicate-identifier mode).
///
/// # Construction
/// Construct top-down: [add_root](Self::add_root) first, then
/// [add_child](Self::add_child) for each child with the index of its parent.
/// Test validity with [`DecodedTree::is_valid()`].
///
/// # Example
/// ```
/// use treeweave::model::{ChildSide, DecodedTree};
///
/// let mut tree = DecodedTree::new(3);
/// let root = tree.add_root(1, "root".to_string());
/// tree.add_child(root, ChildSide::Left, 2, "left".to_string());
/// tree.add_child(root, ChildSide::Right, 3, "right".to_string());
///
/// assert!(tree.is_valid());
/// assert_eq!(tree.bfs_labels(), "root left right ");
/// assert_eq!(tree.in_order_labels(), "left root right ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<TreeVertex>,

    /// Index of the root of this tree
    root_index: VertexIndex,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl DecodedTree {
    /// Creates a new, empty tree with capacity for `num_vertices` vertices.
    pub fn new(num_vertices: usize) -> Self {
        DecodedTree {
            vertices: Vec::with_capacity(num_vertices),
            root_index: NO_ROOT_SET_INDEX,
        }
    }

    /// Adds the root vertex, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `id` - Identifier from the input
    /// * `label` - Label text
    ///
    /// # Panics
    /// Panics if a root has already been added.
    pub fn add_root(&mut self, id: NodeId, label: String) -> VertexIndex {
        assert!(!self.is_root_set(), "Root has already been set");
        let index = self.vertices.len();
        self.vertices.push(TreeVertex::new_root(index, id, label));
        self.root_index = index;
        index
    }

    /// Adds a child vertex below `parent`, assigning a unique index,
    /// which gets returned.
    ///
    /// # Arguments
    /// * `parent` - Index of the parent vertex
    /// * `side` - Which child field of the parent to fill
    /// * `id` - Identifier from the input
    /// * `label` - Label text
    ///
    /// # Panics
    /// Panics if `parent` is out of bounds or already has a child on `side`.
    pub fn add_child(
        &mut self,
        parent: VertexIndex,
        side: ChildSide,
        id: NodeId,
        label: String,
    ) -> VertexIndex {
        let index = self.vertices.len();
        self[parent].set_child(side, index);
        self.vertices
            .push(TreeVertex::new_child(index, id, label, parent));
        index
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set.
    pub fn root(&self) -> &TreeVertex {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &TreeVertex {
        &self[index]
    }

    /// Returns all vertices carrying the given identifier, in arena order.
    ///
    /// Yields at most one vertex unless duplicate identifiers were allowed.
    pub fn vertices_with_id(&self, id: NodeId) -> impl Iterator<Item = &TreeVertex> {
        self.vertices.iter().filter(move |v| v.id() == id)
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_leaf()).count()
    }

    /// Returns the depth of this tree, i.e. the number of edges on the
    /// longest path from the root to a leaf; 0 for a single vertex.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.vertices.len()];
        let mut max_depth = 0;
        for vertex in self.bfs_iter() {
            let depth = vertex.parent().map_or(0, |p| depths[p] + 1);
            depths[vertex.index()] = depth;
            max_depth = max_depth.max(depth);
        }
        max_depth
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is valid and the root has no parent
    /// - All vertex indices match their position in the arena
    /// - All child indices are valid and point back to correct parent
    /// - Every non-root vertex has a parent listing it as a child
    /// - All vertices are reachable from the root
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if self.root_index >= self.vertices.len() {
            return false;
        }

        if self.vertices[self.root_index].has_parent() {
            return false;
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex.index() != index {
                return false;
            }

            // Children in bounds and pointing back to this vertex
            for child in vertex.children() {
                if child >= self.vertices.len() || self.vertices[child].parent() != Some(index) {
                    return false;
                }
            }

            // Parent in bounds and listing this vertex as child
            if index != self.root_index {
                match vertex.parent() {
                    None => return false,
                    Some(parent) => {
                        if parent >= self.vertices.len()
                            || !self.vertices[parent].children().any(|c| c == index)
                        {
                            return false;
                        }
                    }
                }
            }
        }

        // Parent links are consistent, so a full count rules out cycles
        self.bfs_iter().take(self.vertices.len() + 1).count() == self.vertices.len()
    }
}

impl std::ops::Index<VertexIndex> for DecodedTree {
    type Output = TreeVertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<VertexIndex> for DecodedTree {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
impl DecodedTree {
    /// Returns the labels in breadth-first order, each followed by a space.
    pub fn bfs_labels(&self) -> String {
        join_labels(self.bfs_iter())
    }

    /// Returns the labels in in-order (left, self, right), each followed
    /// by a space.
    pub fn in_order_labels(&self) -> String {
        join_labels(self.in_order_iter())
    }

    /// Renders an indented outline of the tree, one vertex per line.
    ///
    /// # Example Output
    /// ```text
    /// [0] 1 "root"
    ///   ├─ [1] 2 "left"
    ///   └─ [2] 3 "right"
    /// ```
    pub fn to_outline(&self) -> String {
        let mut outline = String::new();
        if !self.is_root_set() {
            outline.push_str("(No root set)\n");
            return outline;
        }

        // (index, prefix, is_last)
        let mut stack = vec![(self.root_index, String::new(), true)];
        while let Some((index, prefix, is_last)) = stack.pop() {
            let vertex = &self[index];
            let connector = if index == self.root_index {
                ""
            } else if is_last {
                "└─ "
            } else {
                "├─ "
            };
            let _ = writeln!(
                outline,
                "{}{}[{}] {} {:?}",
                prefix,
                connector,
                index,
                vertex.id(),
                vertex.label()
            );

            let child_prefix = if index == self.root_index {
                "  ".to_string()
            } else {
                format!("{}{}  ", prefix, if is_last { " " } else { "│" })
            };
            let children: Vec<_> = vertex.children().collect();
            // Push last child first so the first one is printed first
            for (position, child) in children.iter().enumerate().rev() {
                let last = position + 1 == children.len();
                stack.push((*child, child_prefix.clone(), last));
            }
        }

        outline
    }

    /// Prints a visual representation of the tree to the console.
    pub fn print_tree(&self) {
        println!("Tree with {} vertices:", self.vertices.len());
        print!("{}", self.to_outline());
    }
}

fn join_labels<'a>(vertices: impl Iterator<Item = &'a TreeVertex>) -> String {
    let mut joined = String::new();
    for vertex in vertices {
        joined.push_str(vertex.label());
        joined.push(' ');
    }
    joined
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl DecodedTree {
    /// Returns an iterator over the tree in breadth-first order
    /// (level by level, left to right).
    pub fn bfs_iter(&self) -> BfsIter<'_> {
        BfsIter::new(self)
    }

    /// Returns an iterator over the tree in in-order
    /// (left subtree, vertex, right subtree).
    pub fn in_order_iter(&self) -> InOrderIter<'_> {
        InOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Returns an iterator over the tree in post-order (children before parents).
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }
}

/// Iterator for breadth-first traversal.
pub struct BfsIter<'a> {
    tree: &'a DecodedTree,
    queue: VecDeque<VertexIndex>,
}

impl<'a> BfsIter<'a> {
    fn new(tree: &'a DecodedTree) -> Self {
        let mut queue = VecDeque::new();
        if tree.is_root_set() {
            queue.push_back(tree.root_index);
        }
        BfsIter { tree, queue }
    }
}

impl<'a> Iterator for BfsIter<'a> {
    type Item = &'a TreeVertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.queue.pop_front()?;
        let vertex = &self.tree[index];
        self.queue.extend(vertex.children());
        Some(vertex)
    }
}

/// Iterator for in-order traversal (left, vertex, right).
///
/// Descends along left children using an explicit stack.
pub struct InOrderIter<'a> {
    tree: &'a DecodedTree,
    stack: Vec<VertexIndex>,
    current: Option<VertexIndex>,
}

impl<'a> InOrderIter<'a> {
    fn new(tree: &'a DecodedTree) -> Self {
        let current = tree.is_root_set().then_some(tree.root_index);
        InOrderIter {
            tree,
            stack: Vec::new(),
            current,
        }
    }
}

impl<'a> Iterator for InOrderIter<'a> {
    type Item = &'a TreeVertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.current {
            self.stack.push(index);
            self.current = self.tree[index].left();
        }

        let index = self.stack.pop()?;
        let vertex = &self.tree[index];
        self.current = vertex.right();
        Some(vertex)
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PreOrderIter<'a> {
    tree: &'a DecodedTree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a DecodedTree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a TreeVertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        // Push children onto stack (right first, so left is processed first)
        self.stack.extend(vertex.right());
        self.stack.extend(vertex.left());

        Some(vertex)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// Each vertex is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a DecodedTree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a DecodedTree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a TreeVertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }

            self.stack.push((index, true));
            if let Some(right) = vertex.right() {
                self.stack.push((right, false));
            }
            if let Some(left) = vertex.left() {
                self.stack.push((left, false));
            }
        }
        None
    }
}
