//! Subject/object tables an [`Ontology`](crate::Ontology) is built from.
//!
//! Each table is a two-column TSV with a `subject` and `object` header:
//!
//! | table | subject | object |
//! |---|---|---|
//! | labels | node id | display label |
//! | synonyms | node id | alternate label |
//! | auxiliary | node id | (ignored) |
//! | hierarchy | child id | parent id |

use serde::{Deserialize, Serialize};

use crate::error::OntologyError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRow {
    pub subject: String,
    pub object: String,
}

impl TableRow {
    #[must_use]
    pub fn new(subject: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            object: object.into(),
        }
    }

    /// Parse a tab-separated table whose header names `subject` and `object`
    /// columns (in any position). Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::MalformedTable`] when the header lacks either
    /// column or a row is too short to contain them.
    pub fn parse_tsv(table: &'static str, text: &str) -> Result<Vec<Self>, OntologyError> {
        parse_columns(table, text, true)
    }

    /// Like [`Self::parse_tsv`], but only the `subject` column is required.
    /// Rows get an empty `object`.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::MalformedTable`] when the header lacks a
    /// `subject` column or a row is too short to contain it.
    pub fn parse_subjects(table: &'static str, text: &str) -> Result<Vec<Self>, OntologyError> {
        parse_columns(table, text, false)
    }
}

fn parse_columns(
    table: &'static str,
    text: &str,
    require_object: bool,
) -> Result<Vec<TableRow>, OntologyError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((header_index, header)) = lines.next() else {
        return Ok(Vec::new());
    };
    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
    let position = |name: &str| columns.iter().position(|c| *c == name);
    let missing = |name: &str| OntologyError::MalformedTable {
        table,
        line: header_index + 1,
        reason: format!("missing '{name}' column"),
    };

    let subject_col = position("subject").ok_or_else(|| missing("subject"))?;
    let object_col = match position("object") {
        Some(col) => Some(col),
        None if require_object => return Err(missing("object")),
        None => None,
    };

    let mut rows = Vec::new();
    for (index, line) in lines {
        let cells: Vec<&str> = line.split('\t').map(str::trim).collect();
        let subject = cells.get(subject_col);
        let object = object_col.map(|col| cells.get(col));
        let row = match (subject, object) {
            (Some(subject), Some(Some(object))) => TableRow::new(*subject, *object),
            (Some(subject), Some(None) | None) if !require_object => TableRow::new(*subject, ""),
            _ => {
                return Err(OntologyError::MalformedTable {
                    table,
                    line: index + 1,
                    reason: format!("expected {} columns, found {}", columns.len(), cells.len()),
                });
            }
        };
        rows.push(row);
    }
    Ok(rows)
}

/// The four tables that define an ontology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyTables {
    pub labels: Vec<TableRow>,
    pub synonyms: Vec<TableRow>,
    /// Structural grouping terms. Only `subject` is read.
    pub auxiliary: Vec<TableRow>,
    /// `subject` is-subclass-of `object`.
    pub hierarchy: Vec<TableRow>,
}

impl OntologyTables {
    /// Parse all four tables from TSV text.
    ///
    /// # Errors
    ///
    /// Propagates the first [`OntologyError::MalformedTable`].
    pub fn from_tsv(
        labels: &str,
        synonyms: &str,
        auxiliary: &str,
        hierarchy: &str,
    ) -> Result<Self, OntologyError> {
        Ok(Self {
            labels: TableRow::parse_tsv("labels", labels)?,
            synonyms: TableRow::parse_tsv("synonyms", synonyms)?,
            auxiliary: TableRow::parse_subjects("auxiliary", auxiliary)?,
            hierarchy: TableRow::parse_tsv("hierarchy", hierarchy)?,
        })
    }

    #[must_use]
    pub fn with_label(mut self, id: &str, label: &str) -> Self {
        self.labels.push(TableRow::new(id, label));
        self
    }

    #[must_use]
    pub fn with_synonym(mut self, id: &str, synonym: &str) -> Self {
        self.synonyms.push(TableRow::new(id, synonym));
        self
    }

    #[must_use]
    pub fn with_auxiliary(mut self, id: &str) -> Self {
        self.auxiliary.push(TableRow::new(id, ""));
        self
    }

    /// Record that `child` is a subclass of `parent`.
    #[must_use]
    pub fn with_subclass(mut self, child: &str, parent: &str) -> Self {
        self.hierarchy.push(TableRow::new(child, parent));
        self
    }
}
