//! Batch ingestion of extracted concepts.
//!
//! Concept extraction itself happens outside this crate. What arrives here is
//! the extractor's raw line-per-concept output, or an already split list.

use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::application::shared::{ConceptSnapshot, SharedConceptTree};

/// Default cap on concepts taken from one extraction response.
pub const DEFAULT_MAX_CONCEPTS: usize = 20;

/// Default number of added concepts listed in a summary.
pub const DEFAULT_SUMMARY_LIMIT: usize = 10;

/// Split line-per-concept text into trimmed, non-empty concepts, keeping at most `max`.
pub fn parse_concept_lines(raw: &str, max: usize) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}

/// Context block handed to answer generation: one `- concept` line per node.
pub fn format_context(concepts: &[ConceptSnapshot]) -> String {
    concepts
        .iter()
        .map(|concept| format!("- {}", concept.text))
        .join("\n")
}

/// Outcome of one ingestion batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Newly inserted concepts, in input order
    pub added: Vec<String>,
    /// Concepts that were already present
    pub duplicates: Vec<String>,
    /// Blank entries that were ignored
    pub skipped_blank: usize,
}

impl IngestReport {
    /// Bullet list of the first `limit` added concepts, None if nothing was added.
    pub fn summary(&self, limit: usize) -> Option<String> {
        if self.added.is_empty() {
            return None;
        }
        let mut summary = self
            .added
            .iter()
            .take(limit)
            .map(|concept| format!("• {}", concept))
            .join("\n");
        let remaining = self.added.len().saturating_sub(limit);
        if remaining > 0 {
            summary.push_str(&format!("\n... and {} more", remaining));
        }
        Some(summary)
    }
}

/// Feeds concept batches into a shared tree.
#[derive(Debug, Clone)]
pub struct IngestService {
    tree: SharedConceptTree,
    max_concepts: usize,
}

impl IngestService {
    pub fn new(tree: SharedConceptTree) -> Self {
        Self {
            tree,
            max_concepts: DEFAULT_MAX_CONCEPTS,
        }
    }

    pub fn with_max_concepts(mut self, max_concepts: usize) -> Self {
        self.max_concepts = max_concepts;
        self
    }

    pub fn tree(&self) -> &SharedConceptTree {
        &self.tree
    }

    #[instrument(level = "debug", skip(self, concepts))]
    pub fn ingest<I, S>(&self, concepts: I) -> IngestReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = IngestReport::default();
        for concept in concepts {
            let concept = concept.as_ref().trim();
            if concept.is_empty() {
                report.skipped_blank += 1;
                continue;
            }
            let (_, created) = self.tree.insert_with_status(concept);
            if created {
                report.added.push(concept.to_string());
            } else {
                debug!(concept, "skipping known concept");
                report.duplicates.push(concept.to_string());
            }
        }
        info!(
            added = report.added.len(),
            duplicates = report.duplicates.len(),
            skipped = report.skipped_blank,
            "ingested concepts"
        );
        report
    }

    /// Parse an extractor response and ingest the concepts it names.
    pub fn ingest_extracted(&self, raw: &str) -> IngestReport {
        self.ingest(parse_concept_lines(raw, self.max_concepts))
    }
}
