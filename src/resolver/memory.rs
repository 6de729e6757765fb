//! Node arena with explicit ownership tracking.
//!
//! Every [TreeNode] created during a decode lives in [TreeMemory] and is
//! addressed by its [NodeHandle]. Each live node has exactly one [Owner]:
//! either a [Slot] (the root or a child field of another node) or the
//! pending table, for nodes that are described but not attached yet.
//! Nodes are released exactly once, either when superseded, when moved out
//! into the finished tree, or at teardown.

use crate::model::{ChildSide, NodeHandle, Slot, TreeBuilder, TreeNode};
use std::collections::VecDeque;

/// Who currently holds a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// Held by an `AwaitingContent` entry of the pending table
    Pending,
    /// Held by a slot of the tree or of a detached fragment
    Slot(Slot),
}

/// Where a node ends up when following owners upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Top of a detached fragment, owned by the pending table
    Detached(NodeHandle),
    /// Part of the tree hanging off the root
    Rooted,
    /// Inside a cycle of slots that never reaches an owner
    Unanchored,
}

/// Allocation counters of a [TreeMemory].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Nodes ever allocated
    pub allocated: usize,
    /// Nodes released again (superseded, moved out or torn down)
    pub released: usize,
}

impl MemoryStats {
    /// Returns the number of nodes currently alive.
    pub fn live(&self) -> usize {
        self.allocated - self.released
    }

    /// Returns `true` if every allocated node has been released.
    pub fn is_balanced(&self) -> bool {
        self.allocated == self.released
    }
}

#[derive(Debug)]
struct Cell {
    node: TreeNode,
    owner: Owner,
}

// =#========================================================================#=
// TREE MEMORY
// =#========================================================================#=
/// Arena of all nodes of one decode.
///
/// # Invariants
/// - A handle is never reused; released cells stay empty
/// - A slot holds at most one node and a node sits in at most one slot
/// - `root` is the occupant of [Slot::Root]
#[derive(Debug, Default)]
pub struct TreeMemory {
    cells: Vec<Option<Cell>>,
    root: Option<NodeHandle>,
    allocated: usize,
    released: usize,
}

// ============================================================================
// Allocation, placement (pub(crate))
// ============================================================================
impl TreeMemory {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `node`, initially owned by the pending table.
    pub fn allocate(&mut self, node: TreeNode) -> NodeHandle {
        let handle = self.cells.len();
        self.cells.push(Some(Cell {
            node,
            owner: Owner::Pending,
        }));
        self.allocated += 1;
        handle
    }

    /// Releases the node at `handle` and returns it.
    ///
    /// The caller is responsible for the node no longer being referenced by
    /// any slot. Returns `None` if the node was already released.
    pub fn release(&mut self, handle: NodeHandle) -> Option<TreeNode> {
        let cell = self.cells.get_mut(handle)?.take()?;
        self.released += 1;
        if self.root == Some(handle) {
            self.root = None;
        }
        Some(cell.node)
    }

    /// Returns the node at `handle`, if still alive.
    pub fn node(&self, handle: NodeHandle) -> Option<&TreeNode> {
        self.cells.get(handle)?.as_ref().map(|cell| &cell.node)
    }

    /// Returns the owner of the node at `handle`, if still alive.
    pub fn owner(&self, handle: NodeHandle) -> Option<Owner> {
        self.cells.get(handle)?.as_ref().map(|cell| cell.owner)
    }

    /// Returns the handle of the current root.
    pub fn root(&self) -> Option<NodeHandle> {
        self.root
    }

    /// Returns the node currently held by `slot`.
    pub fn occupant(&self, slot: Slot) -> Option<NodeHandle> {
        match slot {
            Slot::Root => self.root,
            Slot::Child { parent, side } => self.node(parent)?.child(side),
        }
    }

    /// Writes `handle` into `slot`.
    ///
    /// If the node sat in another slot before, that slot is cleared, so the
    /// node is moved rather than shared. The previous occupant of `slot`, if
    /// any, becomes pending-owned and is returned to the caller, who has to
    /// release or re-register it.
    ///
    /// # Panics
    /// Panics in debug builds if `handle` or the parent of `slot` is not alive.
    pub fn place(&mut self, slot: Slot, handle: NodeHandle) -> Option<NodeHandle> {
        if let Some(Owner::Slot(old)) = self.owner(handle) {
            if old != slot {
                self.write_slot(old, None);
            }
        }

        let displaced = self.write_slot(slot, Some(handle)).filter(|h| *h != handle);
        if let Some(displaced) = displaced {
            self.set_owner(displaced, Owner::Pending);
        }
        self.set_owner(handle, Owner::Slot(slot));
        displaced
    }

    fn write_slot(&mut self, slot: Slot, value: Option<NodeHandle>) -> Option<NodeHandle> {
        match slot {
            Slot::Root => std::mem::replace(&mut self.root, value),
            Slot::Child { parent, side } => match self.cell_mut(parent) {
                Some(cell) => std::mem::replace(cell.node.child_mut(side), value),
                None => {
                    debug_assert!(false, "Slot parent {} not alive", parent);
                    None
                }
            },
        }
    }

    fn set_owner(&mut self, handle: NodeHandle, owner: Owner) {
        match self.cell_mut(handle) {
            Some(cell) => cell.owner = owner,
            None => debug_assert!(false, "Node {} not alive", handle),
        }
    }

    fn cell_mut(&mut self, handle: NodeHandle) -> Option<&mut Cell> {
        self.cells.get_mut(handle)?.as_mut()
    }
}

// ============================================================================
// Structure queries (pub(crate))
// ============================================================================
impl TreeMemory {
    /// Follows owners upward from `handle` until a pending-owned node or the
    /// root slot is reached.
    ///
    /// The walk is bounded by the number of live nodes, so a cycle of slots
    /// yields [Anchor::Unanchored] instead of looping.
    pub fn anchor_of(&self, handle: NodeHandle) -> Anchor {
        let mut current = handle;
        for _ in 0..=self.live() {
            match self.owner(current) {
                Some(Owner::Pending) => return Anchor::Detached(current),
                Some(Owner::Slot(Slot::Root)) => return Anchor::Rooted,
                Some(Owner::Slot(Slot::Child { parent, .. })) => current = parent,
                None => return Anchor::Unanchored,
            }
        }
        Anchor::Unanchored
    }

    /// Counts the nodes reachable from `start` through child fields.
    pub fn count_reachable(&self, start: NodeHandle) -> usize {
        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![start];
        let mut count = 0;

        while let Some(handle) = stack.pop() {
            let Some(node) = self.node(handle) else {
                continue;
            };
            if std::mem::replace(&mut visited[handle], true) {
                continue;
            }
            count += 1;
            stack.extend(node.children());
        }
        count
    }

    /// Returns the number of nodes currently alive.
    pub fn live(&self) -> usize {
        self.allocated - self.released
    }

    /// Returns the allocation counters.
    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            allocated: self.allocated,
            released: self.released,
        }
    }
}

// ============================================================================
// Draining, teardown (pub(crate))
// ============================================================================
impl TreeMemory {
    /// Moves the tree below the root into `builder`, breadth-first, releasing
    /// every node on the way.
    ///
    /// Placeholder labels are already empty strings, so every vertex handed
    /// to the builder carries a printable label.
    ///
    /// # Returns
    /// The finished tree, or `None` if there is no root.
    pub fn drain_into<B: TreeBuilder>(&mut self, builder: &mut B) -> Option<B::Tree> {
        let root = self.root?;
        builder.init_next(self.count_reachable(root));

        let node = self.release(root)?;
        let root_index = builder.add_root(node.id, node.label);
        let mut queue = VecDeque::new();
        queue.push_back((root_index, node.left, node.right));

        while let Some((parent, left, right)) = queue.pop_front() {
            for (side, child) in [(ChildSide::Left, left), (ChildSide::Right, right)] {
                let Some(node) = child.and_then(|h| self.release(h)) else {
                    continue;
                };
                let index = builder.add_child(parent, side, node.id, node.label);
                queue.push_back((index, node.left, node.right));
            }
        }

        builder.finish_tree()
    }

    /// Releases `start` and everything reachable below it.
    ///
    /// # Returns
    /// Number of nodes released.
    pub fn release_subtree(&mut self, start: NodeHandle) -> usize {
        let mut released = 0;
        let mut stack = vec![start];
        while let Some(handle) = stack.pop() {
            if let Some(node) = self.release(handle) {
                released += 1;
                stack.extend(node.children());
            }
        }
        released
    }

    /// Releases every node still alive: the tree below the root first, then
    /// pending-owned fragments, then whatever is left (cycles cut off from
    /// both). Calling it again releases nothing.
    ///
    /// # Returns
    /// Number of nodes released by this call.
    pub fn teardown(&mut self) -> usize {
        let mut released = 0;
        if let Some(root) = self.root {
            released += self.release_subtree(root);
        }

        for handle in 0..self.cells.len() {
            if self.owner(handle) == Some(Owner::Pending) {
                released += self.release_subtree(handle);
            }
        }
        for handle in 0..self.cells.len() {
            released += self.release_subtree(handle);
        }

        debug_assert_eq!(self.live(), 0);
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DecodedTreeBuilder, NodeId};

    fn described(memory: &mut TreeMemory, id: NodeId, label: &str) -> NodeHandle {
        memory.allocate(TreeNode::described(id, label.to_string()))
    }

    #[test]
    fn test_place_moves_and_displaces() {
        let mut memory = TreeMemory::new();
        let root = described(&mut memory, 1, "root");
        assert_eq!(memory.place(Slot::Root, root), None);

        let placeholder = memory.allocate(TreeNode::placeholder(2));
        memory.place(Slot::left_of(root), placeholder);
        assert_eq!(memory.occupant(Slot::left_of(root)), Some(placeholder));
        assert!(memory.node(placeholder).is_some_and(TreeNode::is_placeholder));

        let full = described(&mut memory, 2, "left");
        assert!(!memory.node(full).is_some_and(TreeNode::is_placeholder));
        assert_eq!(memory.place(Slot::left_of(root), full), Some(placeholder));
        assert_eq!(memory.owner(placeholder), Some(Owner::Pending));
        assert!(memory.release(placeholder).is_some());
        assert!(memory.release(placeholder).is_none());

        assert_eq!(memory.owner(full), Some(Owner::Slot(Slot::left_of(root))));
        assert_eq!(memory.stats(), MemoryStats { allocated: 3, released: 1 });
    }

    #[test]
    fn test_anchor_of_fragments_and_root() {
        let mut memory = TreeMemory::new();
        let root = described(&mut memory, 1, "root");
        memory.place(Slot::Root, root);
        let top = described(&mut memory, 5, "top");
        let mid = described(&mut memory, 6, "mid");
        memory.place(Slot::right_of(top), mid);

        assert_eq!(memory.anchor_of(mid), Anchor::Detached(top));
        assert_eq!(memory.anchor_of(top), Anchor::Detached(top));
        assert_eq!(memory.anchor_of(root), Anchor::Rooted);

        // Re-anchor: old root below mid, top becomes root
        memory.place(Slot::left_of(mid), root);
        assert_eq!(memory.root(), None);
        memory.place(Slot::Root, top);
        assert_eq!(memory.root(), Some(top));
        assert_eq!(memory.anchor_of(root), Anchor::Rooted);
        assert_eq!(memory.count_reachable(top), 3);
    }

    #[test]
    fn test_anchor_of_cycle() {
        let mut memory = TreeMemory::new();
        let a = described(&mut memory, 1, "a");
        let b = described(&mut memory, 2, "b");
        memory.place(Slot::left_of(a), b);
        memory.place(Slot::left_of(b), a);
        assert_eq!(memory.anchor_of(a), Anchor::Unanchored);
        assert_eq!(memory.count_reachable(a), 2);

        assert_eq!(memory.teardown(), 2);
        assert!(memory.stats().is_balanced());
    }

    #[test]
    fn test_drain_into_builder() {
        let mut memory = TreeMemory::new();
        let root = described(&mut memory, 1, "root");
        memory.place(Slot::Root, root);
        let right = described(&mut memory, 3, "right");
        memory.place(Slot::right_of(root), right);
        let left = memory.allocate(TreeNode::placeholder(2));
        memory.place(Slot::left_of(root), left);

        let tree = memory
            .drain_into(&mut DecodedTreeBuilder::new())
            .expect("tree expected");
        assert_eq!(tree.num_vertices(), 3);
        assert_eq!(tree.bfs_labels(), "root  right ");
        assert!(memory.stats().is_balanced());
        assert_eq!(memory.teardown(), 0);
    }

    #[test]
    fn test_teardown_releases_everything_once() {
        let mut memory = TreeMemory::new();
        let root = described(&mut memory, 1, "root");
        memory.place(Slot::Root, root);
        let child = memory.allocate(TreeNode::placeholder(2));
        memory.place(Slot::left_of(root), child);
        let pending = described(&mut memory, 7, "pending");
        let below = memory.allocate(TreeNode::placeholder(8));
        memory.place(Slot::left_of(pending), below);

        assert_eq!(memory.live(), 4);
        assert_eq!(memory.teardown(), 4);
        assert_eq!(memory.teardown(), 0);
        assert_eq!(memory.stats(), MemoryStats { allocated: 4, released: 4 });
    }
}
