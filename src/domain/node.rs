//! Concept node stored in the tree arena.

use std::fmt;

use generational_arena::Index;

/// Handle to a concept stored in a [`ConceptTree`](super::ConceptTree).
///
/// Handles stay valid for the lifetime of the tree since concepts are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConceptId(pub(crate) Index);

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}.{}", slot, generation)
    }
}

/// Tree node holding one concept.
#[derive(Debug)]
pub struct ConceptNode {
    text: String,
    /// Case-folded text used for dedup and containment checks
    key: String,
    /// Parent concept, None for the root
    pub(crate) parent: Option<ConceptId>,
    /// Sub-concepts in attachment order
    pub(crate) children: Vec<ConceptId>,
}

impl ConceptNode {
    pub(crate) fn new(text: String, key: String) -> Self {
        Self {
            text,
            key,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub fn parent(&self) -> Option<ConceptId> {
        self.parent
    }

    pub fn children(&self) -> &[ConceptId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for ConceptNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
