use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Term;

/// One row of a ranked count table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AggregationEntry {
    pub label: String,
    pub count: usize,
    /// `count / total`, as a fraction of the whole corpus.
    pub percentage: f64,
    pub coded: bool,
    pub url: Option<String>,
    pub record_ids: Vec<String>,
}

impl AggregationEntry {
    #[must_use]
    pub fn from_term(term: &Term, record_ids: Vec<String>, total: usize) -> Self {
        Self::new(&term.label, term.coded, term.url.clone(), record_ids, total)
    }

    #[must_use]
    pub fn new(
        label: &str,
        coded: bool,
        url: Option<String>,
        record_ids: Vec<String>,
        total: usize,
    ) -> Self {
        let count = record_ids.len();
        Self {
            label: label.to_string(),
            count,
            percentage: percentage(count, total),
            coded,
            url,
            record_ids,
        }
    }
}

/// `count / total`; zero for an empty corpus.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64
}
