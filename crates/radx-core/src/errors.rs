//! Cross-cutting error types for radx-reporter.
//!
//! Domain-specific errors (`OntologyError`, `ClassifyError`, `ConfigError`)
//! are defined in their respective crates and wrap `CoreError` where a
//! registry lookup can fail underneath them.

use thiserror::Error;

/// Errors that can be raised while building or querying the vocabulary.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Vocabulary data failed validation (duplicates, dangling references).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Vocabulary TOML could not be parsed.
    #[error("Vocabulary parse error: {0}")]
    Vocabulary(#[from] toml::de::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
