//! Classification pass configuration.

use std::path::PathBuf;

use radx_core::enums::ClassificationMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClassificationConfig {
    /// Vocabulary-only grouping or ontology-expanded grouping.
    #[serde(default)]
    pub mode: ClassificationMode,

    /// Vocabulary TOML replacing the built-in one. Empty uses the built-in.
    #[serde(default)]
    pub vocabulary_path: String,
}

impl ClassificationConfig {
    #[must_use]
    pub fn vocabulary_path(&self) -> Option<PathBuf> {
        (!self.vocabulary_path.is_empty()).then(|| PathBuf::from(&self.vocabulary_path))
    }
}
