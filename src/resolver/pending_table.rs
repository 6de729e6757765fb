//! Identifier-keyed table of pending references.
//!
//! For every identifier seen so far, the [PendingReferenceTable] keeps the
//! sequence of [PendingEntry] values in arrival order. Entries are never
//! removed or reordered, so an [EntryRef] (identifier plus position) stays
//! valid for the whole decode.

use crate::model::{NodeHandle, NodeId, Slot};
use std::collections::HashMap;

// =#========================================================================#=
// PENDING ENTRY
// =#========================================================================#=
/// Resolution state of one occurrence of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// A fully described node exists but is not attached to any slot yet.
    AwaitingContent(NodeHandle),
    /// The slot holds a placeholder waiting for its description.
    AwaitingSlot(Slot),
    /// Matched; the slot the node currently occupies.
    Resolved(Slot),
}

impl EntryState {
    /// Returns `true` for the two waiting states.
    pub fn is_live(&self) -> bool {
        !matches!(self, EntryState::Resolved(_))
    }
}

/// One occurrence of an identifier in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEntry {
    pub id: NodeId,
    pub state: EntryState,
}

impl PendingEntry {
    pub fn awaiting_content(id: NodeId, node: NodeHandle) -> Self {
        Self {
            id,
            state: EntryState::AwaitingContent(node),
        }
    }

    pub fn awaiting_slot(id: NodeId, slot: Slot) -> Self {
        Self {
            id,
            state: EntryState::AwaitingSlot(slot),
        }
    }

    pub fn resolved(id: NodeId, slot: Slot) -> Self {
        Self {
            id,
            state: EntryState::Resolved(slot),
        }
    }
}

/// Stable reference to an entry: its identifier and position in the
/// identifier's sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRef {
    pub id: NodeId,
    pub position: usize,
}

/// Result of [PendingReferenceTable::find_resolvable].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// First live entry holds an unattached, described node.
    AwaitingContent(EntryRef, NodeHandle),
    /// First live entry holds a placeholder in the given slot.
    AwaitingSlot(EntryRef, Slot),
    /// No live entry, but the identifier currently sits at the root.
    Root(EntryRef),
    /// Identifier known, but every occurrence is already resolved.
    Unresolvable,
    /// Identifier never seen.
    Absent,
}

// =#========================================================================#=
// PENDING REFERENCE TABLE
// =#========================================================================#=
/// Table of all identifier occurrences together with the number of
/// occurrences still waiting for resolution.
///
/// # Invariants
/// - `wait_count` equals the number of live entries across all sequences
/// - At most one entry across the table is `Resolved(Slot::Root)` once the
///   resolver maintains it
#[derive(Debug, Default)]
pub struct PendingReferenceTable {
    entries: HashMap<NodeId, Vec<PendingEntry>>,
    wait_count: usize,
}

impl PendingReferenceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry` to the sequence of its identifier and returns a
    /// reference to it. Live entries increase the wait count.
    pub fn insert(&mut self, entry: PendingEntry) -> EntryRef {
        if entry.state.is_live() {
            self.wait_count += 1;
        }
        let sequence = self.entries.entry(entry.id).or_default();
        sequence.push(entry);
        EntryRef {
            id: entry.id,
            position: sequence.len() - 1,
        }
    }

    /// Finds the entry a new occurrence of `id` should be matched against.
    ///
    /// Scans the sequence in arrival order and returns the first live entry.
    /// If there is none and `consider_root` is set, the entry currently
    /// resolved to the root slot is returned, so that the root can be
    /// re-anchored below a newly arriving parent.
    pub fn find_resolvable(&self, id: NodeId, consider_root: bool) -> Lookup {
        let Some(sequence) = self.entries.get(&id) else {
            return Lookup::Absent;
        };

        let mut root = None;
        for (position, entry) in sequence.iter().enumerate() {
            let at = EntryRef { id, position };
            match entry.state {
                EntryState::AwaitingContent(node) => return Lookup::AwaitingContent(at, node),
                EntryState::AwaitingSlot(slot) => return Lookup::AwaitingSlot(at, slot),
                EntryState::Resolved(Slot::Root) if root.is_none() => root = Some(at),
                EntryState::Resolved(_) => {}
            }
        }

        match root {
            Some(at) if consider_root => Lookup::Root(at),
            _ => Lookup::Unresolvable,
        }
    }

    /// Finds the `AwaitingContent` entry holding exactly `node`.
    pub fn find_content_entry(&self, id: NodeId, node: NodeHandle) -> Option<EntryRef> {
        self.entries.get(&id)?.iter().enumerate().find_map(|(position, entry)| {
            (entry.state == EntryState::AwaitingContent(node)).then_some(EntryRef { id, position })
        })
    }

    /// Marks the referenced entry as resolved to `slot`.
    ///
    /// Decrements the wait count if the entry was live. Also used to move an
    /// already resolved entry to a new slot (root re-anchoring).
    pub fn mark_resolved(&mut self, at: EntryRef, slot: Slot) {
        let Some(entry) = self
            .entries
            .get_mut(&at.id)
            .and_then(|sequence| sequence.get_mut(at.position))
        else {
            debug_assert!(false, "Unknown entry {:?}", at);
            return;
        };

        if entry.state.is_live() {
            debug_assert!(self.wait_count > 0);
            self.wait_count = self.wait_count.saturating_sub(1);
        }
        entry.state = EntryState::Resolved(slot);
    }

    /// Returns the referenced entry.
    pub fn get(&self, at: EntryRef) -> Option<&PendingEntry> {
        self.entries.get(&at.id)?.get(at.position)
    }

    /// Returns the number of live entries.
    pub fn wait_count(&self) -> usize {
        self.wait_count
    }

    /// Returns the sorted, deduplicated identifiers that still have a
    /// live entry.
    pub fn waiting_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .entries
            .iter()
            .filter(|(_, sequence)| sequence.iter().any(|e| e.state.is_live()))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the number of distinct identifiers seen.
    pub fn num_ids(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of entries across all identifiers.
    pub fn num_entries(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
