//! Row -> [`Record`] parsing.

use std::collections::HashMap;

use radx_config::InputConfig;
use radx_core::entities::{Classifier, Record, Term, TermMatching};
use radx_core::registry::TermRegistry;

use crate::matcher::{KeywordMatcher, first_integer};
use crate::row::Row;

/// Parses rows into records, one matched term list per classifier.
///
/// Data problems never fail a parse: absent text yields the classifier's
/// sentinel, unparseable numbers yield the sentinel of a range classifier,
/// and rows failing the gate are skipped.
#[derive(Debug)]
pub struct RecordParser<'a> {
    input: &'a InputConfig,
    classifiers: Vec<ClassifierSource<'a>>,
}

#[derive(Debug)]
struct ClassifierSource<'a> {
    classifier: &'a Classifier,
    columns: &'a [String],
    matcher: KeywordMatcher<'a>,
}

impl<'a> RecordParser<'a> {
    #[must_use]
    pub fn new(registry: &'a TermRegistry, input: &'a InputConfig) -> Self {
        let classifiers = registry
            .classifiers()
            .iter()
            .map(|classifier| {
                let columns = input.fields_for(&classifier.name).unwrap_or_default();
                if columns.is_empty() {
                    tracing::warn!(
                        classifier = %classifier.name,
                        "no source columns mapped; every record gets the sentinel"
                    );
                }
                ClassifierSource {
                    classifier,
                    columns,
                    matcher: KeywordMatcher::new(classifier),
                }
            })
            .collect();
        Self { input, classifiers }
    }

    /// Parse one row. `None` when the row is gated out, listed in
    /// `skip_ids`, or has no id.
    pub fn parse_row<R: Row + ?Sized>(&self, row: &R) -> Option<Record> {
        if self.input.is_gated() {
            let gate = row.present(&self.input.gate_field);
            if !self.input.admits(gate.as_deref()) {
                tracing::debug!(gate = ?gate, "row excluded by gate");
                return None;
            }
        }

        let Some(id) = row.present(&self.input.id_field) else {
            tracing::warn!(id_field = %self.input.id_field, "row has no record id; skipping");
            return None;
        };
        let id = id.trim();
        if self.input.is_skipped(id) {
            tracing::debug!(record = id, "record listed in skip_ids");
            return None;
        }

        let mut record = Record::new(id);
        for source in &self.classifiers {
            let text = source_text(row, source.columns);
            if matches!(source.classifier.matching, TermMatching::Range { .. }) {
                if let Some(value) = text.as_deref().and_then(first_integer) {
                    record.set_value(&source.classifier.name, value);
                }
            }
            let terms = classify_text(source, text.as_deref());
            tracing::debug!(
                record = id,
                classifier = %source.classifier.name,
                matched = terms.len(),
                "classified field"
            );
            record.set(&source.classifier.name, terms);
        }
        Some(record)
    }

    /// Parse every row in order. A later row with an already-seen id
    /// replaces the earlier record in place.
    pub fn parse_rows<'r, R, I>(&self, rows: I) -> Vec<Record>
    where
        R: Row + ?Sized + 'r,
        I: IntoIterator<Item = &'r R>,
    {
        let mut records: Vec<Record> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut seen_rows = 0_usize;
        for row in rows {
            seen_rows += 1;
            let Some(record) = self.parse_row(row) else {
                continue;
            };
            if let Some(&position) = positions.get(&record.id) {
                tracing::warn!(record = %record.id, "duplicate record id; replacing earlier row");
                records[position] = record;
            } else {
                positions.insert(record.id.clone(), records.len());
                records.push(record);
            }
        }
        tracing::info!(rows = seen_rows, records = records.len(), "parsed corpus");
        records
    }

    /// Terms for one classifier given its raw text, independent of any row.
    #[must_use]
    pub fn classify_text(&self, classifier: &str, text: Option<&str>) -> Option<Vec<Term>> {
        self.classifiers
            .iter()
            .find(|source| source.classifier.name == classifier)
            .map(|source| classify_text(source, text))
    }
}

/// Non-blank values of the source columns, joined by a space. `None` when
/// every column is absent or blank.
fn source_text<R: Row + ?Sized>(row: &R, columns: &[String]) -> Option<String> {
    let parts: Vec<String> = columns
        .iter()
        .filter_map(|column| row.present(column))
        .map(|value| value.into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

fn classify_text(source: &ClassifierSource<'_>, text: Option<&str>) -> Vec<Term> {
    let classifier = source.classifier;
    let sentinel = || vec![classifier.sentinel.clone()];
    let Some(text) = text.filter(|text| !text.trim().is_empty()) else {
        return sentinel();
    };

    match &classifier.matching {
        TermMatching::Range { bins } => first_integer(text)
            .and_then(|value| bins.iter().find(|bin| bin.contains(value)))
            .and_then(|bin| classifier.term(&bin.term))
            .map_or_else(sentinel, |term| vec![term.clone()]),
        TermMatching::Keywords => {
            let mut matched = source.matcher.matches(text);
            if classifier.policy.is_exclusive() {
                matched.truncate(1);
            }
            if matched.is_empty() {
                return if classifier.falls_back() {
                    sentinel()
                } else {
                    Vec::new()
                };
            }
            matched.into_iter().cloned().collect()
        }
    }
}
