//! Text rendering of a concept tree.

use std::collections::HashMap;

use termtree::Tree;

use crate::domain::{ConceptId, ConceptTree};

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for ConceptTree {
    fn to_tree_string(&self) -> Tree<String> {
        // Children are rendered before their parent, so no recursion is needed
        // however deep the hierarchy gets.
        let mut rendered: HashMap<ConceptId, Tree<String>> = HashMap::new();
        for (id, node) in self.iter_postorder() {
            let leaves: Vec<Tree<String>> = node
                .children()
                .iter()
                .filter_map(|child| rendered.remove(child))
                .collect();
            rendered.insert(id, Tree::new(node.text().to_string()).with_leaves(leaves));
        }

        self.root()
            .and_then(|root| rendered.remove(&root))
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}
