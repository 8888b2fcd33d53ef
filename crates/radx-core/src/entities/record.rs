use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Term;

/// One study's classification: its identifier plus the raw terms matched
/// under each classifier, keyed by classifier name. Range classifiers also
/// keep the number their bin was chosen from.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub matches: BTreeMap<String, Vec<Term>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, u64>,
}

impl Record {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            matches: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }

    /// Builder form of [`Record::set`].
    #[must_use]
    pub fn with(mut self, classifier: impl Into<String>, terms: Vec<Term>) -> Self {
        self.set(classifier, terms);
        self
    }

    pub fn set(&mut self, classifier: impl Into<String>, terms: Vec<Term>) {
        self.matches.insert(classifier.into(), terms);
    }

    #[must_use]
    pub fn with_value(mut self, classifier: impl Into<String>, value: u64) -> Self {
        self.values.insert(classifier.into(), value);
        self
    }

    pub fn set_value(&mut self, classifier: impl Into<String>, value: u64) {
        self.values.insert(classifier.into(), value);
    }

    /// Number parsed for a range classifier, if the text held one.
    #[must_use]
    pub fn value(&self, classifier: &str) -> Option<u64> {
        self.values.get(classifier).copied()
    }

    /// Terms matched under `classifier`; empty if the classifier was never set.
    #[must_use]
    pub fn terms(&self, classifier: &str) -> &[Term] {
        self.matches.get(classifier).map_or(&[], Vec::as_slice)
    }

    /// Labels matched under `classifier`, joined with `separator`.
    #[must_use]
    pub fn joined_labels(&self, classifier: &str, separator: &str) -> String {
        self.terms(classifier)
            .iter()
            .map(|t| t.label.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}
