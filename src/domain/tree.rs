//! Arena-based concept hierarchy.
//!
//! Nodes live in a generational arena and refer to each other by [`ConceptId`].
//! `children` is the owning direction; `parent` is a lookup kept in sync by the
//! insertion code and checked by [`ConceptTree::verify`].

use std::collections::{HashMap, HashSet};

use generational_arena::Arena;
use tracing::{debug, instrument, trace};

use crate::domain::error::DomainError;
use crate::domain::node::{ConceptId, ConceptNode};
use crate::domain::relation::{fold, relation_folded, Relation};
use crate::domain::stats::TreeStats;

/// Where a new concept goes relative to the children of the node being visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// New concept is contained in this child: continue below it
    Descend(ConceptId),
    /// New concept contains this child: take its slot and adopt it
    Absorb { slot: usize, child: ConceptId },
    /// No child is related: append to the visited node
    Append,
}

/// Concept hierarchy ordered by textual containment.
///
/// The first inserted concept becomes the root and stays the root. Every later
/// concept is deduplicated case-insensitively and placed by walking down from the
/// root, see [`ConceptTree::insert`].
#[derive(Debug)]
pub struct ConceptTree {
    arena: Arena<ConceptNode>,
    root: Option<ConceptId>,
    /// Insertion order, append-only
    nodes: Vec<ConceptId>,
    /// Folded text to concept
    index: HashMap<String, ConceptId>,
}

impl Default for ConceptTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ConceptTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Inserts a concept and returns its handle.
    ///
    /// Inserting text that already exists (ignoring case) returns the existing
    /// handle and leaves the tree untouched.
    ///
    /// Placement starts at the root and looks at the children of the visited
    /// node in order; the first related child decides:
    /// - new concept contained in the child: continue below that child
    /// - new concept contains the child: the new concept takes the child's slot
    ///   and the child moves beneath it
    ///
    /// Without a related child the concept is appended to the visited node.
    ///
    /// # Panics
    /// Panics if the arena links are found inconsistent while rewiring. That
    /// can only happen through a defect in this module.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, text: &str) -> ConceptId {
        let key = fold(text);
        if let Some(&existing) = self.index.get(&key) {
            debug!(%existing, "concept already present");
            return existing;
        }

        let id = ConceptId(self.arena.insert(ConceptNode::new(text.to_string(), key.clone())));

        match self.root {
            None => {
                debug!(%id, "concept becomes root");
                self.root = Some(id);
            }
            Some(root) => {
                let to_root = relation_folded(&key, self.node(root).key());
                debug!(%id, relation = %to_root, "classified against root");
                self.place(root, id, &key);
            }
        }

        self.index.insert(key, id);
        self.nodes.push(id);
        id
    }

    fn place(&mut self, start: ConceptId, new: ConceptId, key: &str) {
        let mut current = start;
        loop {
            match self.placement_at(current, key) {
                Placement::Descend(child) => {
                    trace!(from = %current, to = %child, "descending");
                    current = child;
                }
                Placement::Absorb { slot, child } => {
                    self.absorb(current, slot, child, new);
                    return;
                }
                Placement::Append => {
                    self.attach(current, new);
                    return;
                }
            }
        }
    }

    fn placement_at(&self, current: ConceptId, key: &str) -> Placement {
        self.node(current)
            .children
            .iter()
            .enumerate()
            .find_map(|(slot, &child)| {
                match relation_folded(key, self.node(child).key()) {
                    Relation::Sub => Some(Placement::Descend(child)),
                    Relation::Super => Some(Placement::Absorb { slot, child }),
                    Relation::Unrelated => None,
                }
            })
            .unwrap_or(Placement::Append)
    }

    fn attach(&mut self, parent: ConceptId, new: ConceptId) {
        debug!(%parent, %new, "appending concept");
        let node = self.node_mut(new);
        assert!(node.parent.is_none(), "new concept {} already has a parent", new);
        node.parent = Some(parent);
        self.node_mut(parent).children.push(new);
    }

    fn absorb(&mut self, parent: ConceptId, slot: usize, child: ConceptId, new: ConceptId) {
        debug!(%parent, %new, %child, "concept takes over child slot");
        let parent_node = self.node_mut(parent);
        assert_eq!(
            parent_node.children.get(slot).copied(),
            Some(child),
            "child {} not found in slot {} of {}",
            child,
            slot,
            parent
        );
        parent_node.children[slot] = new;

        let child_node = self.node_mut(child);
        assert_eq!(
            child_node.parent,
            Some(parent),
            "parent link of {} does not point to {}",
            child,
            parent
        );
        child_node.parent = Some(new);

        let new_node = self.node_mut(new);
        assert!(new_node.parent.is_none(), "new concept {} already has a parent", new);
        new_node.parent = Some(parent);
        new_node.children.push(child);
    }

    fn node(&self, id: ConceptId) -> &ConceptNode {
        match self.arena.get(id.0) {
            Some(node) => node,
            None => panic!("dangling concept id {}", id),
        }
    }

    fn node_mut(&mut self, id: ConceptId) -> &mut ConceptNode {
        match self.arena.get_mut(id.0) {
            Some(node) => node,
            None => panic!("dangling concept id {}", id),
        }
    }

    /// Case-insensitive exact lookup.
    #[instrument(level = "trace", skip(self))]
    pub fn find_exact(&self, text: &str) -> Option<ConceptId> {
        self.index.get(&fold(text)).copied()
    }

    /// Concepts containing at least one whitespace-separated token of `query`,
    /// in insertion order.
    #[instrument(level = "debug", skip(self))]
    pub fn find_related(&self, query: &str) -> Vec<ConceptId> {
        let folded = fold(query);
        let tokens: Vec<&str> = folded.split_whitespace().collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        self.nodes
            .iter()
            .copied()
            .filter(|&id| {
                let key = self.node(id).key();
                tokens.iter().any(|&token| key.contains(token))
            })
            .collect()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            total_nodes: self.nodes.len(),
            root_text: self.root.map(|root| self.node(root).text().to_string()),
            depth: self.depth(),
        }
    }

    pub fn get(&self, id: ConceptId) -> Option<&ConceptNode> {
        self.arena.get(id.0)
    }

    pub fn text(&self, id: ConceptId) -> Option<&str> {
        self.get(id).map(ConceptNode::text)
    }

    pub fn parent(&self, id: ConceptId) -> Option<ConceptId> {
        self.get(id).and_then(ConceptNode::parent)
    }

    pub fn children(&self, id: ConceptId) -> &[ConceptId] {
        self.get(id).map(ConceptNode::children).unwrap_or(&[])
    }

    pub fn root(&self) -> Option<ConceptId> {
        self.root
    }

    /// All concepts in insertion order.
    pub fn nodes(&self) -> &[ConceptId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Longest root-to-leaf path counted in nodes, 0 for an empty tree.
    ///
    /// Chains of ever longer concepts make the tree arbitrarily deep, so heights
    /// are accumulated bottom-up in post-order instead of by recursion.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut heights: HashMap<ConceptId, usize> = HashMap::with_capacity(self.nodes.len());
        let mut depth = 0;
        for (id, node) in self.iter_postorder() {
            let height = 1 + node
                .children
                .iter()
                .filter_map(|child| heights.get(child))
                .max()
                .copied()
                .unwrap_or(0);
            heights.insert(id, height);
            depth = height;
        }
        // Post-order ends at the root
        depth
    }

    /// Level of a concept, the root being at level 1.
    pub fn depth_of(&self, id: ConceptId) -> Option<usize> {
        self.get(id)?;
        Some(self.ancestors(id).len() + 1)
    }

    /// Parent chain of `id`, nearest first, ending at the root.
    ///
    /// # Panics
    /// Panics when the parent chain is longer than the number of concepts,
    /// which means the tree contains a cycle.
    pub fn ancestors(&self, id: ConceptId) -> Vec<ConceptId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            chain.push(ancestor);
            assert!(chain.len() <= self.nodes.len(), "cycle above concept {}", id);
            current = self.parent(ancestor);
        }
        chain
    }

    /// Concepts without sub-concepts, in pre-order.
    pub fn leaf_nodes(&self) -> Vec<ConceptId> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(id, _)| id)
            .collect()
    }

    /// Checks every structural invariant of the tree.
    ///
    /// Containment is only required below the first level: the root's direct
    /// children include every concept unrelated to everything else.
    #[instrument(level = "debug", skip(self))]
    pub fn verify(&self) -> Result<(), DomainError> {
        let Some(root) = self.root else {
            if let Some(&id) = self.nodes.first() {
                return Err(DomainError::Orphan(id));
            }
            return Ok(());
        };

        let root_node = self.get(root).ok_or(DomainError::DanglingId(root))?;
        if root_node.parent.is_some() {
            return Err(DomainError::RootHasParent(root));
        }

        let mut keys = HashSet::new();
        for &id in &self.nodes {
            let node = self.get(id).ok_or(DomainError::DanglingId(id))?;
            if !keys.insert(node.key()) || self.index.get(node.key()) != Some(&id) {
                return Err(DomainError::DuplicateConcept(node.text().to_string()));
            }

            for &child in &node.children {
                let child_node = self.get(child).ok_or(DomainError::DanglingId(child))?;
                if child_node.parent != Some(id) {
                    return Err(DomainError::ParentMismatch { child, parent: id });
                }
            }

            if let Some(parent) = node.parent {
                let parent_node = self.get(parent).ok_or(DomainError::DanglingId(parent))?;
                let occurrences = parent_node.children.iter().filter(|&&c| c == id).count();
                if occurrences != 1 {
                    return Err(DomainError::ParentMismatch { child: id, parent });
                }
                if parent != root && relation_folded(node.key(), parent_node.key()) != Relation::Sub {
                    return Err(DomainError::ContainmentViolated {
                        child: node.text().to_string(),
                        parent: parent_node.text().to_string(),
                    });
                }
            }
        }

        // Reachability from the root, without trusting the parent links
        let mut visited = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                return Err(DomainError::CycleDetected(id));
            }
            let node = self.get(id).ok_or(DomainError::DanglingId(id))?;
            stack.extend(node.children.iter().copied());
        }

        if let Some(&orphan) = self.nodes.iter().find(|id| !visited.contains(id)) {
            return Err(DomainError::Orphan(orphan));
        }
        if visited.len() != self.nodes.len() || self.arena.len() != self.nodes.len() {
            let stray = self
                .arena
                .iter()
                .map(|(idx, _)| ConceptId(idx))
                .find(|id| !self.index.values().any(|v| v == id))
                .unwrap_or(root);
            return Err(DomainError::Orphan(stray));
        }

        Ok(())
    }
}

/// Pre-order traversal, children left to right.
pub struct TreeIterator<'a> {
    tree: &'a ConceptTree,
    stack: Vec<ConceptId>,
}

impl<'a> TreeIterator<'a> {
    #[instrument(level = "trace", skip(tree))]
    fn new(tree: &'a ConceptTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (ConceptId, &'a ConceptNode);

    #[instrument(level = "trace", skip(self))]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = self.tree.get(current)?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev().copied());
        Some((current, node))
    }
}

/// Post-order traversal, children before their parent.
pub struct PostOrderIterator<'a> {
    tree: &'a ConceptTree,
    stack: Vec<(ConceptId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    #[instrument(level = "trace", skip(tree))]
    fn new(tree: &'a ConceptTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (ConceptId, &'a ConceptNode);

    #[instrument(level = "trace", skip(self))]
    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                if visited {
                    return Some((current, node));
                }
                self.stack.push((current, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
