//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/conceptree/conceptree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `CONCEPTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ingest::{DEFAULT_MAX_CONCEPTS, DEFAULT_SUMMARY_LIMIT};
use crate::application::ApplicationError;

/// Unified configuration for conceptree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Re-check all tree invariants after every insertion
    pub verify_on_insert: bool,
    /// Cap on concepts taken from one extraction response
    pub max_concepts: usize,
    /// Number of added concepts listed in an ingest summary
    pub summary_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            verify_on_insert: false,
            max_concepts: DEFAULT_MAX_CONCEPTS,
            summary_limit: DEFAULT_SUMMARY_LIMIT,
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub verify_on_insert: Option<bool>,
    pub max_concepts: Option<usize>,
    pub summary_limit: Option<usize>,
}

/// Get the XDG config directory for conceptree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "conceptree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("conceptree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            verify_on_insert: overlay.verify_on_insert.unwrap_or(self.verify_on_insert),
            max_concepts: overlay.max_concepts.unwrap_or(self.max_concepts),
            summary_limit: overlay.summary_limit.unwrap_or(self.summary_limit),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Load settings from one file only (defaults + file, no global, no env vars).
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        Ok(Self::default().merge_with(&load_raw_settings(path)?))
    }

    /// Apply CONCEPTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("CONCEPTREE").try_parsing(true))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_bool("verify_on_insert") {
            settings.verify_on_insert = val;
        }
        if let Ok(val) = config.get::<usize>("max_concepts") {
            settings.max_concepts = val;
        }
        if let Ok(val) = config.get::<usize>("summary_limit") {
            settings.summary_limit = val;
        }

        Ok(settings)
    }

    /// Serialize settings as TOML, e.g. for `config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.verify_on_insert);
        assert_eq!(settings.max_concepts, 20);
        assert_eq!(settings.summary_limit, 10);
    }

    #[test]
    fn test_merge_with_overlay_wins_where_specified() {
        let base = Settings::default();
        let overlay = RawSettings {
            summary_limit: Some(3),
            ..Default::default()
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.summary_limit, 3);
        assert_eq!(merged.max_concepts, base.max_concepts);
    }
}
