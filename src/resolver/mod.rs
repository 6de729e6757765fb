//! Incremental reference resolution.
//!
//! Contains the engine that links unordered node records into one tree:
//! * [Resolver] - Ingests records and finalizes the tree
//! * [PendingReferenceTable] - Occurrences of each identifier and their state
//! * [TreeMemory] - Node arena with explicit ownership and counters
//! * [ResolveError] - Fatal conditions of a decode

pub mod engine;
pub mod memory;
pub mod pending_table;
pub mod resolve_error;

pub use engine::{Resolver, ResolverConfig};
pub use memory::{Anchor, MemoryStats, Owner, TreeMemory};
pub use pending_table::{EntryRef, EntryState, Lookup, PendingEntry, PendingReferenceTable};
pub use resolve_error::{ConflictReason, ResolveError};
