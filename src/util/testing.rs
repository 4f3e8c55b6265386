//! Shared test setup: one global tracing subscriber for all tests.

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{ConceptId, ConceptTree};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
    if env::var("RUST_LOG").is_err() {
        debug!("RUST_LOG not set, defaulting to debug");
    }
}

/// Builds a tree from concepts inserted in the given order.
pub fn tree_of(concepts: &[&str]) -> ConceptTree {
    let mut tree = ConceptTree::new();
    for concept in concepts {
        tree.insert(concept);
    }
    tree
}

/// Texts of the children of `id`, in order.
pub fn child_texts(tree: &ConceptTree, id: ConceptId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.text(child).map(str::to_string))
        .collect()
}
