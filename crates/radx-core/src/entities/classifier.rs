use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Term;
use crate::enums::LabelPolicy;

const fn default_fallback() -> bool {
    true
}

/// A named category drawing from one set of terms.
///
/// Records are classified independently under each classifier. The
/// `sentinel` term is assigned when the source text is absent, and also
/// when nothing matches if `fallback_on_no_match` is set.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Classifier {
    pub name: String,
    #[serde(default)]
    pub policy: LabelPolicy,
    #[serde(default = "default_fallback")]
    pub fallback_on_no_match: bool,
    /// Data Hub facet used to derive term URLs.
    #[serde(default)]
    pub search_facet: Option<String>,
    pub sentinel: Term,
    #[serde(default)]
    pub terms: Vec<Term>,
    #[serde(default)]
    pub matching: TermMatching,
    /// Display hierarchy: each group lists member term or group labels.
    #[serde(default)]
    pub groups: Vec<TermGroup>,
}

impl Classifier {
    #[must_use]
    pub fn new(name: impl Into<String>, sentinel: Term) -> Self {
        Self {
            name: name.into(),
            policy: LabelPolicy::default(),
            fallback_on_no_match: true,
            search_facet: None,
            sentinel,
            terms: Vec::new(),
            matching: TermMatching::default(),
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: LabelPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_terms(mut self, terms: impl IntoIterator<Item = Term>) -> Self {
        self.terms.extend(terms);
        self
    }

    #[must_use]
    pub fn with_matching(mut self, matching: TermMatching) -> Self {
        self.matching = matching;
        self
    }

    #[must_use]
    pub fn with_groups(mut self, groups: impl IntoIterator<Item = TermGroup>) -> Self {
        self.groups.extend(groups);
        self
    }

    #[must_use]
    pub const fn without_fallback(mut self) -> Self {
        self.fallback_on_no_match = false;
        self
    }

    /// Look up a term (sentinel included) by id.
    #[must_use]
    pub fn term(&self, id: &str) -> Option<&Term> {
        if self.sentinel.id == id {
            return Some(&self.sentinel);
        }
        self.terms.iter().find(|t| t.id == id)
    }

    /// Look up a term (sentinel included) by label.
    #[must_use]
    pub fn term_by_label(&self, label: &str) -> Option<&Term> {
        if self.sentinel.label == label {
            return Some(&self.sentinel);
        }
        self.terms.iter().find(|t| t.label == label)
    }

    /// All terms in reporting order: vocabulary terms, then the sentinel.
    pub fn all_terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter().chain(std::iter::once(&self.sentinel))
    }

    /// Whether any record lacking a match receives the sentinel.
    ///
    /// Exclusive classifiers always fall back so that they partition the
    /// corpus.
    #[must_use]
    pub const fn falls_back(&self) -> bool {
        self.fallback_on_no_match || self.policy.is_exclusive()
    }
}

/// How raw text is mapped onto a classifier's terms.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TermMatching {
    /// Normalized substring containment of labels and synonyms.
    #[default]
    Keywords,
    /// The first integer in the text selects a bin.
    Range { bins: Vec<RangeBin> },
}

/// Inclusive integer interval mapped to a term id. An absent `upper` is
/// unbounded.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RangeBin {
    pub term: String,
    pub lower: u64,
    #[serde(default)]
    pub upper: Option<u64>,
}

impl RangeBin {
    #[must_use]
    pub fn contains(&self, value: u64) -> bool {
        value >= self.lower && self.upper.is_none_or(|upper| value <= upper)
    }
}

/// A structural grouping in a classifier's display hierarchy.
///
/// Members are labels of terms or of other groups; a label listed under
/// several groups gets several parents.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TermGroup {
    pub label: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl TermGroup {
    #[must_use]
    pub fn new<S: Into<String>>(
        label: impl Into<String>,
        members: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            label: label.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}
