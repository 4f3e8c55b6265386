//! Structural properties of ConceptTree under different insertion sequences

use rstest::rstest;

use conceptree::domain::{relation, ConceptTree, Relation};
use conceptree::util::testing::{child_texts, init_test_setup, tree_of};

// ============================================================
// Helpers
// ============================================================

/// Deterministic pseudo-random concepts over a tiny alphabet, so that
/// containment between them is frequent.
fn generated_concepts(seed: u64, count: usize) -> Vec<String> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };
    (0..count)
        .map(|_| {
            let len = 1 + next() % 4;
            (0..len)
                .map(|_| ["a", "b", "C", " "][next() % 4])
                .collect::<String>()
        })
        .collect()
}

fn assert_invariants(tree: &ConceptTree) {
    tree.verify().unwrap();

    let root = tree.root().expect("non-empty tree");
    let depth = tree.stats().depth;
    let mut longest = 0;

    for &id in tree.nodes() {
        // No cycles: parent chain reaches the root within depth steps
        let ancestors = tree.ancestors(id);
        assert!(ancestors.len() < depth);
        assert_eq!(ancestors.last().copied().unwrap_or(id), root);
        longest = longest.max(ancestors.len() + 1);

        // Containment below the first level
        if let Some(parent) = tree.parent(id) {
            if parent != root {
                assert_eq!(
                    relation(tree.text(id).unwrap(), tree.text(parent).unwrap()),
                    Relation::Sub
                );
            }
        }
    }

    // Depth is the longest root-to-leaf path
    assert_eq!(longest, depth);

    // No duplicates
    let mut folded: Vec<String> = tree
        .nodes()
        .iter()
        .map(|&id| tree.text(id).unwrap().to_lowercase())
        .collect();
    let total = folded.len();
    folded.sort();
    folded.dedup();
    assert_eq!(folded.len(), total);
}

// ============================================================
// Reference Sequence
// ============================================================

#[test]
fn given_cat_cats_dog_when_inserting_then_matches_reference_shape() {
    init_test_setup();
    let tree = tree_of(&["cat", "cats", "dog"]);

    let root = tree.root().unwrap();
    assert_eq!(tree.text(root), Some("cat"));
    assert_eq!(child_texts(&tree, root), vec!["cats", "dog"]);

    let related = tree.find_related("dog");
    assert_eq!(related.len(), 1);
    assert_eq!(tree.text(related[0]), Some("dog"));

    let stats = tree.stats();
    assert_eq!(stats.total_nodes, 3);
    assert_eq!(stats.root_text.as_deref(), Some("cat"));
    assert_eq!(stats.depth, 2);
}

#[test]
fn given_root_is_never_replaced_when_inserting_super_concepts() {
    let tree = tree_of(&["h", "hhh", "hh", "xgs"]);
    let root = tree.root().unwrap();
    assert_eq!(tree.text(root), Some("h"));
    // "hh" is contained in "hhh" and moves below it
    assert_eq!(child_texts(&tree, root), vec!["hhh", "xgs"]);
    let hhh = tree.find_exact("hhh").unwrap();
    assert_eq!(child_texts(&tree, hhh), vec!["hh"]);
    assert_invariants(&tree);
}

// ============================================================
// Idempotence
// ============================================================

#[rstest]
#[case("Golden Retriever", "golden retriever")]
#[case("DOG", "dog")]
#[case("", "")]
fn given_same_text_any_case_when_inserting_twice_then_same_id(
    #[case] first: &str,
    #[case] second: &str,
) {
    let mut tree = tree_of(&["animal", "dog"]);
    let before = tree.len();
    let a = tree.insert(first);
    let after_first = tree.len();
    let b = tree.insert(second);

    assert_eq!(a, b);
    assert_eq!(tree.len(), after_first);
    assert!(after_first - before <= 1);
}

#[test]
fn given_existing_concept_when_reinserting_then_structure_unchanged() {
    let mut tree = tree_of(&["zoo", "cat", "cats", "dog"]);
    let before = conceptree::domain::TreeDisplay::to_tree_string(&tree).to_string();
    tree.insert("CATS");
    let after = conceptree::domain::TreeDisplay::to_tree_string(&tree).to_string();
    assert_eq!(before, after);
}

// ============================================================
// Placement Order
// ============================================================

#[test]
fn given_multiple_containing_siblings_when_inserting_then_first_wins() {
    let tree = tree_of(&["zoo", "big cats", "wild cats", "cat"]);
    let big = tree.find_exact("big cats").unwrap();
    let wild = tree.find_exact("wild cats").unwrap();
    assert_eq!(child_texts(&tree, big), vec!["cat"]);
    assert!(tree.children(wild).is_empty());

    // Reversed sibling order changes the outcome
    let tree = tree_of(&["zoo", "wild cats", "big cats", "cat"]);
    let wild = tree.find_exact("wild cats").unwrap();
    assert_eq!(child_texts(&tree, wild), vec!["cat"]);
}

#[test]
fn given_nested_chain_when_inserting_super_concept_then_child_is_reparented() {
    let tree = tree_of(&["zoo", "big cats", "cat", "at", "big cats club"]);
    let root = tree.root().unwrap();
    let club = tree.find_exact("big cats club").unwrap();
    let big = tree.find_exact("big cats").unwrap();

    assert_eq!(child_texts(&tree, root), vec!["big cats club"]);
    assert_eq!(tree.parent(big), Some(club));
    assert_eq!(child_texts(&tree, big), vec!["cat"]);
    assert_eq!(tree.stats().depth, 5);
    assert_invariants(&tree);
}

#[test]
fn given_super_concept_deep_in_tree_when_inserting_then_takes_slot_in_place() {
    let tree = tree_of(&["zoo", "a cat and a dog", "dog", "cat", "bird", "a dog"]);
    let pair = tree.find_exact("a cat and a dog").unwrap();
    assert_eq!(child_texts(&tree, pair), vec!["a dog", "cat"]);
    let a_dog = tree.find_exact("a dog").unwrap();
    assert_eq!(child_texts(&tree, a_dog), vec!["dog"]);
    assert_invariants(&tree);
}

// ============================================================
// Invariants Under Generated Sequences
// ============================================================

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
#[case(2024)]
#[case(987654321)]
fn given_generated_sequence_when_inserting_then_invariants_hold(#[case] seed: u64) {
    let concepts = generated_concepts(seed, 200);
    let mut tree = ConceptTree::new();
    for concept in &concepts {
        let id = tree.insert(concept);
        assert_eq!(tree.find_exact(concept), Some(id));
    }
    assert_invariants(&tree);

    let mut distinct: Vec<String> = concepts.iter().map(|c| c.to_lowercase()).collect();
    distinct.sort();
    distinct.dedup();
    assert_eq!(tree.len(), distinct.len());
}

#[test]
fn given_chain_of_ever_longer_concepts_when_computing_stats_then_depth_is_exact() {
    let mut tree = tree_of(&["x"]);
    let deepest = 10_000;
    for len in 1..=deepest {
        tree.insert(&"a".repeat(len));
    }

    // Each longer concept takes the previous one's slot below the root
    let stats = tree.stats();
    assert_eq!(stats.total_nodes, deepest + 1);
    assert_eq!(stats.depth, deepest + 1);

    let shortest = tree.find_exact("a").unwrap();
    assert_eq!(tree.depth_of(shortest), Some(deepest + 1));
    assert_eq!(tree.leaf_nodes(), vec![shortest]);
    tree.verify().unwrap();
}

// ============================================================
// Queries
// ============================================================

#[test]
fn given_query_with_several_words_when_finding_related_then_any_token_matches() {
    let tree = tree_of(&["machine learning", "learning rate", "neural network", "rate limit"]);
    let related: Vec<&str> = tree
        .find_related("What is a Learning RATE?")
        .into_iter()
        .map(|id| tree.text(id).unwrap())
        .collect();
    // "a" matches every concept containing the letter a
    assert_eq!(
        related,
        vec!["machine learning", "learning rate", "neural network", "rate limit"]
    );

    let related: Vec<&str> = tree
        .find_related("network")
        .into_iter()
        .map(|id| tree.text(id).unwrap())
        .collect();
    assert_eq!(related, vec!["neural network"]);
}

#[test]
fn given_unknown_text_when_finding_then_none() {
    let tree = tree_of(&["cat"]);
    assert_eq!(tree.find_exact("cats"), None);
    assert!(tree.find_related("zebra").is_empty());
}
