//! Flat per-record label table.

use radx_core::entities::{Record, TermMatching};
use radx_core::registry::TermRegistry;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LabelRow {
    pub id: String,
    /// One joined label string per classifier, aligned with
    /// [`LabelTable::columns`].
    pub labels: Vec<String>,
}

/// One row per record, one column per classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LabelTable {
    pub columns: Vec<String>,
    pub rows: Vec<LabelRow>,
}

enum Cell<'a> {
    Labels(&'a str),
    Value(&'a str),
}

impl LabelTable {
    /// Range classifiers get an extra `"<name> Value"` column ahead of their
    /// bin label holding the parsed number, empty when none was found.
    #[must_use]
    pub fn build(records: &[Record], registry: &TermRegistry, separator: &str) -> Self {
        let mut cells = Vec::new();
        let mut columns = Vec::new();
        for classifier in registry.classifiers() {
            if matches!(classifier.matching, TermMatching::Range { .. }) {
                columns.push(format!("{} Value", classifier.name));
                cells.push(Cell::Value(&classifier.name));
            }
            columns.push(classifier.name.clone());
            cells.push(Cell::Labels(&classifier.name));
        }
        let rows = records
            .iter()
            .map(|record| LabelRow {
                id: record.id.clone(),
                labels: cells
                    .iter()
                    .map(|cell| match cell {
                        Cell::Labels(name) => record.joined_labels(name, separator),
                        Cell::Value(name) => {
                            record.value(name).map(|v| v.to_string()).unwrap_or_default()
                        }
                    })
                    .collect(),
            })
            .collect();
        Self { columns, rows }
    }

    /// Joined labels of `record_id` under `classifier`.
    #[must_use]
    pub fn get(&self, record_id: &str, classifier: &str) -> Option<&str> {
        let column = self.columns.iter().position(|c| c == classifier)?;
        self.rows
            .iter()
            .find(|row| row.id == record_id)
            .and_then(|row| row.labels.get(column))
            .map(String::as_str)
    }
}
