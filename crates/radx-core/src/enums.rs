//! Per-classifier policy enums.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// LabelPolicy
// ---------------------------------------------------------------------------

/// How many terms of one classifier a record may carry.
///
/// `Single` keeps only the first matching term in vocabulary order, so the
/// classifier partitions the corpus. `Multi` keeps every matching term.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    Single,
    #[default]
    Multi,
}

impl LabelPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
        }
    }

    /// Whether at most one term is kept per record.
    #[must_use]
    pub const fn is_exclusive(self) -> bool {
        matches!(self, Self::Single)
    }
}

impl fmt::Display for LabelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ClassificationMode
// ---------------------------------------------------------------------------

/// Whether matched terms are expanded through the ontology before grouping.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// Group by vocabulary terms only; every term is reported, even at zero.
    #[default]
    Vocabulary,
    /// Group by matched terms plus their ontology ancestors; only terms
    /// that receive a record are reported.
    Semantic,
}

impl ClassificationMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vocabulary => "vocabulary",
            Self::Semantic => "semantic",
        }
    }
}

impl fmt::Display for ClassificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
