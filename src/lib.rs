//! Concept hierarchy engine.
//!
//! Free-form concepts are organized by case-insensitive textual containment:
//! a concept whose text occurs inside another concept's text is placed below it.
//! The [`domain`] layer holds the engine, [`application`] the thread-safe handle
//! and ingestion service, [`infrastructure`] the I/O seams and the service
//! container owning the process-wide tree.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::{ConceptSnapshot, IngestReport, IngestService, SharedConceptTree};
pub use domain::{relation, ConceptId, ConceptNode, ConceptTree, Relation, TreeStats};
