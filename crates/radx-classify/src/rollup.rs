//! Hierarchy rollups of classified records.

use radx_core::entities::{Classifier, Record};
use radx_ontology::{HierarchyRow, Taxonomy};

use crate::error::ClassifyError;

/// Roll a classifier's records up through its display hierarchy.
///
/// Records are attached to the node of each term they carry; terms the
/// hierarchy does not contain are ignored.
///
/// # Errors
///
/// Returns [`ClassifyError::Ontology`] if aggregation meets a cycle.
pub fn group_rollup(
    taxonomy: &Taxonomy,
    classifier: &Classifier,
    records: &[Record],
) -> Result<Vec<HierarchyRow>, ClassifyError> {
    let mut pass = taxonomy.pass();
    for record in records {
        for term in record.terms(&classifier.name) {
            if taxonomy.node(&term.label).is_some() {
                pass.mark(&term.label, [&record.id])?;
            }
        }
    }
    Ok(pass.rows(records.len())?)
}

/// Roll every classifier's terms up through an ontology taxonomy. A record
/// matched under several classifiers still counts once per node.
///
/// # Errors
///
/// Returns [`ClassifyError::Ontology`] if aggregation meets a cycle.
pub fn ontology_rollup(
    taxonomy: &Taxonomy,
    records: &[Record],
) -> Result<Vec<HierarchyRow>, ClassifyError> {
    let mut pass = taxonomy.pass();
    let mut unplaced = 0_usize;
    for record in records {
        for term in record.matches.values().flatten() {
            if taxonomy.node(&term.label).is_some() {
                pass.mark(&term.label, [&record.id])?;
            } else {
                unplaced += 1;
            }
        }
    }
    if unplaced > 0 {
        tracing::debug!(unplaced, "matched terms outside the ontology");
    }
    Ok(pass.rows(records.len())?)
}
