//! Service container for dependency injection
//!
//! Owns the one concept tree of a process and hands out handles to it.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::{IngestService, SharedConceptTree};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// The concept tree shared by every service
    pub tree: SharedConceptTree,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let tree = SharedConceptTree::new().with_verification(settings.verify_on_insert);
        let settings = Arc::new(settings);

        Self { settings, fs, tree }
    }

    pub fn ingest_service(&self) -> IngestService {
        IngestService::new(self.tree.clone()).with_max_concepts(self.settings.max_concepts)
    }

    /// Read concept text from a file, or from stdin when `source` is `-`.
    pub fn read_source(&self, source: &Path) -> InfraResult<String> {
        if source == Path::new("-") {
            debug!("reading concepts from stdin");
            return self
                .fs
                .read_stdin()
                .map_err(|e| InfraError::io("read stdin", e));
        }
        debug!(source = %source.display(), "reading concepts");
        self.fs
            .read_to_string(source)
            .map_err(|e| InfraError::io(format!("read {}", source.display()), e))
    }
}
