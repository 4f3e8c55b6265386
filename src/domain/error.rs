//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::ConceptId;

/// Structural defects detected by [`ConceptTree::verify`](super::ConceptTree::verify).
///
/// None of these can be produced by valid input; each one means the tree has
/// been corrupted and must not be used further.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("dangling concept id: {0}")]
    DanglingId(ConceptId),

    #[error("root {0} has a parent")]
    RootHasParent(ConceptId),

    #[error("parent link of {child} does not match children of {parent}")]
    ParentMismatch { child: ConceptId, parent: ConceptId },

    #[error("concept not reachable from root: {0}")]
    Orphan(ConceptId),

    #[error("duplicate concept text: {0}")]
    DuplicateConcept(String),

    #[error("cycle detected in hierarchy at: {0}")]
    CycleDetected(ConceptId),

    #[error("'{child}' is not contained in its parent '{parent}'")]
    ContainmentViolated { child: String, parent: String },
}
