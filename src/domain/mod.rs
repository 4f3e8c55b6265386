//! Domain layer: the concept hierarchy engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod display;
pub mod error;
pub mod node;
pub mod relation;
pub mod stats;
pub mod tree;

pub use display::TreeDisplay;
pub use error::DomainError;
pub use node::{ConceptId, ConceptNode};
pub use relation::{fold, relation, Relation};
pub use stats::TreeStats;
pub use tree::{ConceptTree, PostOrderIterator, TreeIterator};
