//! Error types for the classification pipeline.

use radx_config::ConfigError;
use radx_core::errors::CoreError;
use radx_ontology::OntologyError;

/// Failures that stop a report run. Data problems inside individual rows
/// are recovered with sentinel terms and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// Vocabulary could not be loaded or a classifier lookup failed.
    #[error("vocabulary error: {0}")]
    Core(#[from] CoreError),

    /// Ontology or display hierarchy is structurally invalid.
    #[error("ontology error: {0}")]
    Ontology(#[from] OntologyError),

    /// Configuration failed validation.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Report could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Semantic classification was requested without an ontology.
    #[error("semantic classification requires an ontology")]
    MissingOntology,
}
