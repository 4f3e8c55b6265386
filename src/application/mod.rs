//! Application layer: services composing the concept engine
//!
//! This layer orchestrates domain logic; it still performs no I/O.

pub mod error;
pub mod ingest;
pub mod shared;

pub use error::{ApplicationError, ApplicationResult};
pub use ingest::{format_context, parse_concept_lines, IngestReport, IngestService};
pub use shared::{ConceptSnapshot, SharedConceptTree};
