//! Error types for reference resolution.
//!
//! Every [ResolveError] is fatal to a decode. Per-line problems are
//! reported as [ParsingError](crate::parser::ParsingError) instead and
//! never reach the resolver.

use crate::model::NodeId;
use thiserror::Error;

// =#========================================================================#=
// CONFLICT REASON
// =#========================================================================#=
/// Why an identifier could not be matched unambiguously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConflictReason {
    #[error("identifier is described more than once")]
    DuplicateDescription,
    #[error("identifier is referenced again before being described")]
    UndescribedReference,
    #[error("identifier is already placed in the tree")]
    AlreadyPlaced,
    #[error("node names itself as a child")]
    SelfReference,
    #[error("root is referenced by one of its own descendants")]
    CyclicReference,
    #[error("root cannot be re-anchored without a parent")]
    RootWithoutParent,
}

// =#========================================================================#=
// RESOLVE ERROR
// =#========================================================================$=
/// Fatal conditions that abort a decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// An identifier cannot be matched without ambiguity (default mode).
    #[error("conflicting identifier {id} - {reason}")]
    ConflictingIdentifier { id: NodeId, reason: ConflictReason },

    /// Forward references remained unsatisfied at the end of input.
    #[error("incomplete tree - {unresolved} unresolved reference(s), ids {ids:?}")]
    Incomplete { unresolved: usize, ids: Vec<NodeId> },

    /// No record established a root.
    #[error("could not build any tree - no records")]
    EmptyInput,

    /// Nodes remained that cannot be reached from the root.
    #[error("{orphaned} node(s) form a cycle disconnected from the root")]
    Disconnected { orphaned: usize },
}

impl ResolveError {
    pub(crate) fn conflict(id: NodeId, reason: ConflictReason) -> Self {
        ResolveError::ConflictingIdentifier { id, reason }
    }
}
