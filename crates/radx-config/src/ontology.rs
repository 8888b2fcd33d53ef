//! Ontology configuration.

use serde::{Deserialize, Serialize};

fn default_root() -> String {
    "owl:Thing".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OntologyConfig {
    /// Node id the breadth-first construction starts from.
    #[serde(default = "default_root")]
    pub root: String,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

impl OntologyConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.root.trim().is_empty()
    }
}
