//! The stitching automaton.
//!
//! [Resolver] consumes [NodeRecord]s one at a time and links them into a
//! single tree, no matter in which order parents and children arrive.
//! For every record it either satisfies a pending reference, registers a
//! new one, or re-anchors the root below a newly discovered parent.

use crate::model::{
    DecodedTree, DecodedTreeBuilder, NodeHandle, NodeId, NodeRecord, Slot, TreeBuilder, TreeNode,
};
use crate::resolver::memory::{Anchor, MemoryStats, TreeMemory};
use crate::resolver::pending_table::{EntryRef, Lookup, PendingEntry, PendingReferenceTable};
use crate::resolver::resolve_error::{ConflictReason, ResolveError};

// =#========================================================================#=
// RESOLVER CONFIG
// =#========================================================================#=
/// Options of a [Resolver].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Allow the same identifier for several distinct nodes
    pub duplicate_ids: bool,
}

impl ResolverConfig {
    /// Creates the default configuration (duplicate identifiers rejected).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the same identifier may name several distinct nodes.
    ///
    /// When enabled, a record that cannot be matched unambiguously opens a
    /// fresh, independent entry instead of failing.
    pub fn with_duplicate_ids(mut self, duplicate_ids: bool) -> Self {
        self.duplicate_ids = duplicate_ids;
        self
    }
}

/// One record waiting to be resolved, with the slot it should end up in.
#[derive(Debug)]
struct WorkItem {
    record: NodeRecord,
    slot: Slot,
    /// Node owning `slot`, `None` for top-level records
    parent: Option<NodeHandle>,
}

// =#========================================================================#=
// RESOLVER
// =#========================================================================#=
/// Incremental reference-resolution engine.
///
/// Feed records with [ingest](Self::ingest) in input order, then call
/// [finalize](Self::finalize) once. A resolver is single-use: after
/// finalizing (successfully or not) all nodes are released and the
/// resolver should be discarded.
///
/// # Example
/// ```
/// use treeweave::model::NodeRecord;
/// use treeweave::resolver::Resolver;
///
/// let mut resolver = Resolver::new();
/// resolver.ingest(NodeRecord::new(2, "left")).unwrap();
/// resolver.ingest(NodeRecord::new(1, "root").with_children(2, 3)).unwrap();
/// resolver.ingest(NodeRecord::new(3, "right")).unwrap();
///
/// let tree = resolver.finalize().unwrap();
/// assert_eq!(tree.bfs_labels(), "root left right ");
/// ```
#[derive(Debug, Default)]
pub struct Resolver {
    config: ResolverConfig,
    table: PendingReferenceTable,
    memory: TreeMemory,
    records_ingested: usize,
}

// ============================================================================
// New, Getters (pub)
// ============================================================================
impl Resolver {
    /// Creates a resolver rejecting duplicate identifiers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with the given configuration.
    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            config,
            table: PendingReferenceTable::new(),
            memory: TreeMemory::new(),
            records_ingested: 0,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> ResolverConfig {
        self.config
    }

    /// Returns the number of references still waiting for resolution.
    pub fn wait_count(&self) -> usize {
        self.table.wait_count()
    }

    /// Returns the identifier of the current root, if any.
    pub fn root_id(&self) -> Option<NodeId> {
        self.memory
            .root()
            .and_then(|root| self.memory.node(root))
            .map(TreeNode::id)
    }

    /// Returns the allocation counters of the node arena.
    pub fn memory_stats(&self) -> MemoryStats {
        self.memory.stats()
    }

    /// Returns the number of records accepted so far.
    pub fn records_ingested(&self) -> usize {
        self.records_ingested
    }

    /// Returns the pending reference table.
    pub fn table(&self) -> &PendingReferenceTable {
        &self.table
    }
}

// ============================================================================
// Ingestion (pub)
// ============================================================================
impl Resolver {
    /// Ingests one record from the input.
    ///
    /// The record is treated as a description of its node even if it
    /// carries no label. Named children are resolved right after the
    /// record itself, left first, using a work-list rather than recursion.
    ///
    /// # Errors
    /// [ResolveError::ConflictingIdentifier] if an identifier cannot be
    /// matched unambiguously and duplicate identifiers are not allowed, or if
    /// the record would close a cycle. Work already linked stays linked; the
    /// decode as a whole is expected to be abandoned.
    pub fn ingest(&mut self, record: NodeRecord) -> Result<(), ResolveError> {
        let mut work = vec![WorkItem {
            record: record.into_described(),
            slot: Slot::Root,
            parent: None,
        }];

        while let Some(item) = work.pop() {
            let children = item.record.children();
            let Some(handle) = self.resolve(item)? else {
                continue;
            };
            // Reversed, so the left child is popped first
            for (side, child) in children.into_iter().rev() {
                work.push(WorkItem {
                    record: NodeRecord::placeholder(child),
                    slot: Slot::Child {
                        parent: handle,
                        side,
                    },
                    parent: Some(handle),
                });
            }
        }

        self.records_ingested += 1;
        Ok(())
    }

    /// Resolves a single record against the table.
    ///
    /// # Returns
    /// The handle of a newly allocated described node whose children still
    /// have to be resolved, or `None` if nothing further is needed.
    fn resolve(&mut self, item: WorkItem) -> Result<Option<NodeHandle>, ResolveError> {
        let id = item.record.id;
        match self.table.find_resolvable(id, true) {
            Lookup::Absent => Ok(self.register(item)),
            Lookup::Unresolvable => self.ambiguous(item, ConflictReason::AlreadyPlaced),
            Lookup::AwaitingSlot(at, slot) => self.fill_slot(item, at, slot),
            Lookup::AwaitingContent(at, node) => self.attach(item, at, node),
            Lookup::Root(at) => self.reanchor_root(item, at),
        }
    }

    /// Opens a new entry for a record without a usable prior trace.
    fn register(&mut self, item: WorkItem) -> Option<NodeHandle> {
        let WorkItem { record, slot, .. } = item;
        let id = record.id;

        match record.label {
            Some(label) => {
                let handle = self.memory.allocate(TreeNode::described(id, label));
                if self.memory.root().is_none() {
                    self.memory.place(Slot::Root, handle);
                    self.table.insert(PendingEntry::resolved(id, Slot::Root));
                } else {
                    self.table.insert(PendingEntry::awaiting_content(id, handle));
                }
                Some(handle)
            }
            None => {
                let handle = self.memory.allocate(TreeNode::placeholder(id));
                self.memory.place(slot, handle);
                self.table.insert(PendingEntry::awaiting_slot(id, slot));
                None
            }
        }
    }

    /// Handles a record that cannot be matched unambiguously.
    fn ambiguous(
        &mut self,
        item: WorkItem,
        reason: ConflictReason,
    ) -> Result<Option<NodeHandle>, ResolveError> {
        if self.config.duplicate_ids {
            tracing::debug!(
                "Identifier {} is ambiguous ({}), opening an independent entry",
                item.record.id,
                reason
            );
            return Ok(self.register(item));
        }
        tracing::debug!("Conflict on identifier {}: {}", item.record.id, reason);
        Err(ResolveError::conflict(item.record.id, reason))
    }

    /// A placeholder waits in `slot` and a description has arrived.
    fn fill_slot(
        &mut self,
        item: WorkItem,
        at: EntryRef,
        slot: Slot,
    ) -> Result<Option<NodeHandle>, ResolveError> {
        if item.record.is_placeholder() {
            return self.ambiguous(item, ConflictReason::UndescribedReference);
        }

        let NodeRecord { id, label, .. } = item.record;
        let handle = self
            .memory
            .allocate(TreeNode::described(id, label.unwrap_or_default()));
        if let Some(placeholder) = self.memory.place(slot, handle) {
            self.memory.release(placeholder);
        }
        self.table.mark_resolved(at, slot);
        Ok(Some(handle))
    }

    /// A described, unattached node waits and a bare reference has arrived.
    fn attach(
        &mut self,
        item: WorkItem,
        at: EntryRef,
        node: NodeHandle,
    ) -> Result<Option<NodeHandle>, ResolveError> {
        if !item.record.is_placeholder() || item.slot == Slot::Root {
            return self.ambiguous(item, ConflictReason::DuplicateDescription);
        }
        if item.parent == Some(node) {
            return Err(ResolveError::conflict(
                item.record.id,
                ConflictReason::SelfReference,
            ));
        }

        self.memory.place(item.slot, node);
        self.table.mark_resolved(at, item.slot);
        Ok(None)
    }

    /// The current root is referenced as a child: it moves into the
    /// referencing slot and the top of the fragment holding that slot
    /// becomes the new root.
    fn reanchor_root(
        &mut self,
        item: WorkItem,
        root_entry: EntryRef,
    ) -> Result<Option<NodeHandle>, ResolveError> {
        if !item.record.is_placeholder() {
            return self.ambiguous(item, ConflictReason::DuplicateDescription);
        }
        let id = item.record.id;
        let Some(parent) = item.parent else {
            return Err(ResolveError::conflict(id, ConflictReason::RootWithoutParent));
        };

        let top = match self.memory.anchor_of(parent) {
            Anchor::Detached(top) => top,
            Anchor::Rooted | Anchor::Unanchored => {
                tracing::debug!("Root {} referenced from inside its own tree", id);
                return Err(ResolveError::conflict(id, ConflictReason::CyclicReference));
            }
        };
        let top_entry = self
            .memory
            .node(top)
            .and_then(|node| self.table.find_content_entry(node.id(), top))
            .ok_or_else(|| ResolveError::conflict(id, ConflictReason::CyclicReference))?;
        let Some(old_root) = self.memory.root() else {
            return Err(ResolveError::conflict(id, ConflictReason::RootWithoutParent));
        };

        self.memory.place(item.slot, old_root);
        self.memory.place(Slot::Root, top);
        self.table.mark_resolved(root_entry, item.slot);
        self.table.mark_resolved(top_entry, Slot::Root);

        tracing::debug!(
            "Re-anchored root {} below {}, new root is {}",
            id,
            self.memory.node(parent).map_or(id, TreeNode::id),
            top_entry.id
        );
        Ok(None)
    }
}

// ============================================================================
// Finalization, teardown (pub)
// ============================================================================
impl Resolver {
    /// Checks completeness and returns the decoded tree.
    ///
    /// All nodes are released afterwards, whether the check succeeds or not.
    ///
    /// # Errors
    /// - [ResolveError::Incomplete] if references remain unresolved
    /// - [ResolveError::EmptyInput] if no root was ever established
    /// - [ResolveError::Disconnected] if nodes cannot be reached from the root
    pub fn finalize(&mut self) -> Result<DecodedTree, ResolveError> {
        self.finalize_with(&mut DecodedTreeBuilder::new())
    }

    /// Like [finalize](Self::finalize), but hands the resolved nodes to a
    /// custom [TreeBuilder], parents before children.
    pub fn finalize_with<B: TreeBuilder>(&mut self, builder: &mut B) -> Result<B::Tree, ResolveError> {
        let result = self.build(builder);
        self.memory.teardown();
        result
    }

    fn build<B: TreeBuilder>(&mut self, builder: &mut B) -> Result<B::Tree, ResolveError> {
        let unresolved = self.table.wait_count();
        if unresolved > 0 {
            return Err(ResolveError::Incomplete {
                unresolved,
                ids: self.table.waiting_ids(),
            });
        }

        let root = self.memory.root().ok_or(ResolveError::EmptyInput)?;
        let reachable = self.memory.count_reachable(root);
        let live = self.memory.live();
        if reachable != live {
            return Err(ResolveError::Disconnected {
                orphaned: live - reachable,
            });
        }

        self.memory
            .drain_into(builder)
            .ok_or(ResolveError::EmptyInput)
    }

    /// Releases every node without building a tree.
    ///
    /// # Returns
    /// Number of nodes released; 0 if already disposed or finalized.
    pub fn dispose(&mut self) -> usize {
        self.memory.teardown()
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        self.memory.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChildSide;

    fn ingest_all(resolver: &mut Resolver, records: Vec<NodeRecord>) -> Result<(), ResolveError> {
        records.into_iter().try_for_each(|r| resolver.ingest(r))
    }

    #[test]
    fn test_parent_first() {
        let mut resolver = Resolver::new();
        resolver
            .ingest(NodeRecord::new(1, "root").with_children(2, 3))
            .unwrap();
        assert_eq!(resolver.wait_count(), 2);
        resolver.ingest(NodeRecord::new(2, "left")).unwrap();
        resolver.ingest(NodeRecord::new(3, "right")).unwrap();
        assert_eq!(resolver.wait_count(), 0);

        let tree = resolver.finalize().unwrap();
        assert_eq!(tree.bfs_labels(), "root left right ");
        assert_eq!(tree.in_order_labels(), "left root right ");
        assert!(resolver.memory_stats().is_balanced());
    }

    #[test]
    fn test_child_first_reanchors_root() {
        let mut resolver = Resolver::new();
        resolver.ingest(NodeRecord::new(2, "left")).unwrap();
        assert_eq!(resolver.root_id(), Some(2));

        resolver
            .ingest(NodeRecord::new(1, "root").with_children(2, 3))
            .unwrap();
        assert_eq!(resolver.root_id(), Some(1));
        assert_eq!(resolver.wait_count(), 1);

        resolver.ingest(NodeRecord::new(3, "right")).unwrap();
        let tree = resolver.finalize().unwrap();
        assert_eq!(tree.root().id(), 1);
        let left = tree.root().child(ChildSide::Left).unwrap();
        assert_eq!(tree[left].id(), 2);
    }

    #[test]
    fn test_reanchor_through_fragment() {
        let mut resolver = Resolver::new();
        ingest_all(
            &mut resolver,
            vec![
                NodeRecord::new(4, "c"),
                NodeRecord::new(1, "root").with_children(2, 3),
                NodeRecord::new(2, "a").with_children(4, 5),
                NodeRecord::new(3, "b"),
                NodeRecord::new(5, "d"),
            ],
        )
        .unwrap();
        assert_eq!(resolver.root_id(), Some(1));

        let tree = resolver.finalize().unwrap();
        assert_eq!(tree.bfs_labels(), "root a b c d ");
        assert!(tree.is_valid());
    }

    #[test]
    fn test_conflicting_descriptions() {
        let mut resolver = Resolver::new();
        resolver
            .ingest(NodeRecord::new(1, "root").with_children(2, 3))
            .unwrap();
        resolver.ingest(NodeRecord::new(2, "a")).unwrap();
        let err = resolver.ingest(NodeRecord::new(2, "b")).unwrap_err();
        assert_eq!(
            err,
            ResolveError::ConflictingIdentifier {
                id: 2,
                reason: ConflictReason::AlreadyPlaced
            }
        );
        resolver.dispose();
        assert!(resolver.memory_stats().is_balanced());
    }

    #[test]
    fn test_self_reference() {
        let mut resolver = Resolver::new();
        resolver.ingest(NodeRecord::new(1, "root").with_children(2, 3)).unwrap();
        let err = resolver
            .ingest(NodeRecord::new(5, "x").with_children(5, 6))
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::ConflictingIdentifier {
                id: 5,
                reason: ConflictReason::SelfReference
            }
        );
    }

    #[test]
    fn test_root_cycle() {
        let mut resolver = Resolver::new();
        let err = resolver
            .ingest(NodeRecord::new(1, "root").with_children(1, 2))
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::ConflictingIdentifier {
                id: 1,
                reason: ConflictReason::CyclicReference
            }
        );
    }

    #[test]
    fn test_finalize_errors_release_memory() {
        let mut resolver = Resolver::new();
        assert_eq!(resolver.finalize().unwrap_err(), ResolveError::EmptyInput);

        let mut resolver = Resolver::new();
        resolver
            .ingest(NodeRecord::new(1, "root").with_children(2, 3))
            .unwrap();
        resolver.ingest(NodeRecord::new(3, "right")).unwrap();
        assert_eq!(
            resolver.finalize().unwrap_err(),
            ResolveError::Incomplete {
                unresolved: 1,
                ids: vec![2]
            }
        );
        assert_eq!(resolver.memory_stats().allocated, 4);
        assert!(resolver.memory_stats().is_balanced());
        assert_eq!(resolver.dispose(), 0);
    }

    #[test]
    fn test_duplicate_ids_fifo() {
        let config = ResolverConfig::new().with_duplicate_ids(true);
        let mut resolver = Resolver::with_config(config);
        ingest_all(
            &mut resolver,
            vec![
                NodeRecord::new(1, "root").with_children(3, 3),
                NodeRecord::new(3, "a"),
                NodeRecord::new(3, "b"),
            ],
        )
        .unwrap();
        let tree = resolver.finalize().unwrap();
        assert_eq!(tree.in_order_labels(), "a root b ");
        assert_eq!(tree.vertices_with_id(3).count(), 2);
    }
}
