use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const fn default_coded() -> bool {
    true
}

/// A single controlled-vocabulary value.
///
/// Every term carries a (possibly empty) synonym set so matching has one
/// code path regardless of where the vocabulary came from. `coded` is false
/// for sentinels and structural grouping terms.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct Term {
    /// Stable identifier. Vocabulary files may omit it; the registry then
    /// uses the label.
    #[serde(default)]
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub synonyms: BTreeSet<String>,
    #[serde(default = "default_coded")]
    pub coded: bool,
    #[serde(default)]
    pub url: Option<String>,
}

impl Term {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            synonyms: BTreeSet::new(),
            coded: true,
            url: None,
        }
    }

    /// Term whose id is its label.
    #[must_use]
    pub fn labeled(label: impl Into<String>) -> Self {
        let label = label.into();
        Self::new(label.clone(), label)
    }

    #[must_use]
    pub fn with_synonym(mut self, synonym: impl Into<String>) -> Self {
        self.synonyms.insert(synonym.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Mark the term as a sentinel or structural grouping.
    #[must_use]
    pub fn uncoded(mut self) -> Self {
        self.coded = false;
        self
    }

    /// Label followed by all synonyms.
    pub fn surface_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.label.as_str()).chain(self.synonyms.iter().map(String::as_str))
    }
}
