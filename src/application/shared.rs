//! Shared handle to one concept tree.
//!
//! All mutation goes through a single write lock, so an insertion is observed
//! either completely or not at all. Queries take the read lock and run
//! concurrently with each other.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, instrument};

use crate::domain::{ConceptId, ConceptTree, DomainError, TreeDisplay, TreeStats};

/// Owned copy of a concept, safe to hold after the lock is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptSnapshot {
    pub id: ConceptId,
    pub text: String,
    pub parent: Option<ConceptId>,
    pub children: Vec<ConceptId>,
}

impl ConceptSnapshot {
    fn capture(tree: &ConceptTree, id: ConceptId) -> Option<Self> {
        let node = tree.get(id)?;
        Some(Self {
            id,
            text: node.text().to_string(),
            parent: node.parent(),
            children: node.children().to_vec(),
        })
    }
}

/// Cloneable, thread-safe handle to a [`ConceptTree`].
#[derive(Debug, Clone, Default)]
pub struct SharedConceptTree {
    inner: Arc<RwLock<ConceptTree>>,
    verify_on_insert: bool,
}

impl SharedConceptTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-check every invariant after each insertion and panic on the first defect.
    pub fn with_verification(mut self, enabled: bool) -> Self {
        self.verify_on_insert = enabled;
        self
    }

    /// # Panics
    /// Panics if verification is enabled and the insertion corrupted the tree.
    pub fn insert(&self, text: &str) -> ConceptSnapshot {
        self.insert_with_status(text).0
    }

    /// Inserts `text` and tells whether this call created the concept.
    ///
    /// Creation is decided under the same write lock as the insertion, so of
    /// several callers racing on one text exactly one sees `true`.
    ///
    /// # Panics
    /// Panics if verification is enabled and the insertion corrupted the tree.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_with_status(&self, text: &str) -> (ConceptSnapshot, bool) {
        let mut tree = self.inner.write();
        let before = tree.len();
        let id = tree.insert(text);
        let created = tree.len() > before;
        if created && self.verify_on_insert {
            if let Err(e) = tree.verify() {
                panic!("concept tree corrupted after inserting '{}': {}", text, e);
            }
        }
        match ConceptSnapshot::capture(&tree, id) {
            Some(snapshot) => (snapshot, created),
            None => panic!("inserted concept {} missing from tree", id),
        }
    }

    pub fn find_exact(&self, text: &str) -> Option<ConceptSnapshot> {
        let tree = self.inner.read();
        tree.find_exact(text)
            .and_then(|id| ConceptSnapshot::capture(&tree, id))
    }

    pub fn find_related(&self, query: &str) -> Vec<ConceptSnapshot> {
        let tree = self.inner.read();
        let related: Vec<ConceptSnapshot> = tree
            .find_related(query)
            .into_iter()
            .filter_map(|id| ConceptSnapshot::capture(&tree, id))
            .collect();
        debug!(count = related.len(), "related concepts");
        related
    }

    pub fn snapshot(&self, id: ConceptId) -> Option<ConceptSnapshot> {
        ConceptSnapshot::capture(&self.inner.read(), id)
    }

    pub fn stats(&self) -> TreeStats {
        self.inner.read().stats()
    }

    pub fn verify(&self) -> Result<(), DomainError> {
        self.inner.read().verify()
    }

    pub fn render(&self) -> String {
        self.inner.read().to_tree_string().to_string()
    }

    /// Runs `f` against a consistent view of the tree.
    pub fn read<R>(&self, f: impl FnOnce(&ConceptTree) -> R) -> R {
        f(&self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_insert_returns_snapshot_with_links() {
        let shared = SharedConceptTree::new().with_verification(true);
        let cat = shared.insert("cat");
        let cats = shared.insert("cats");

        assert_eq!(cats.parent, Some(cat.id));
        assert_eq!(shared.snapshot(cat.id).unwrap().children, vec![cats.id]);
    }

    #[test]
    fn test_insert_with_status_reports_creation_once() {
        let shared = SharedConceptTree::new();
        let (first, created) = shared.insert_with_status("Cat");
        assert!(created);
        let (again, created) = shared.insert_with_status("cat");
        assert!(!created);
        assert_eq!(first.id, again.id);
    }

    #[test]
    fn test_clones_share_the_same_tree() {
        let shared = SharedConceptTree::new();
        let other = shared.clone();
        let id = shared.insert("cat").id;
        assert_eq!(other.find_exact("CAT").map(|s| s.id), Some(id));
    }

    #[test]
    fn test_concurrent_inserts_keep_invariants() {
        let shared = SharedConceptTree::new().with_verification(true);
        shared.insert("root");

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        shared.insert(&format!("concept {}", i));
                        shared.insert(&format!("worker {} concept {}", worker, i));
                        let _ = shared.find_related("concept");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // 1 root + 50 shared + 8 * 50 per worker
        assert_eq!(shared.stats().total_nodes, 1 + 50 + 400);
        shared.verify().unwrap();
    }
}
