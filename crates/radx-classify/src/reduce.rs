//! Reduction of groupings into ranked count tables.

use radx_core::entities::AggregationEntry;

use crate::classify::Grouping;

/// Ranked count table: count descending, ties in discovery order.
/// Percentages are `count / total_records` with no rounding.
#[must_use]
pub fn reduce(grouping: &Grouping, total_records: usize) -> Vec<AggregationEntry> {
    let mut entries: Vec<AggregationEntry> = grouping
        .buckets
        .iter()
        .map(|bucket| {
            AggregationEntry::from_term(&bucket.term, bucket.record_ids.clone(), total_records)
        })
        .collect();
    // stable: equal counts keep bucket order
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use radx_core::entities::Term;

    use super::*;
    use crate::classify::Bucket;

    fn bucket(label: &str, ids: &[&str]) -> Bucket {
        Bucket {
            term: Term::labeled(label),
            record_ids: ids.iter().map(|id| (*id).to_string()).collect(),
        }
    }

    #[test]
    fn sorts_by_count_keeping_ties_in_order() {
        let grouping = Grouping {
            classifier: "Data Type".into(),
            buckets: vec![
                bucket("Behavioral", &["a"]),
                bucket("Clinical", &["a", "b"]),
                bucket("Cognitive", &["b"]),
                bucket("Genomic", &[]),
            ],
        };
        let entries = reduce(&grouping, 4);
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Clinical", "Behavioral", "Cognitive", "Genomic"]);
        assert!((entries[0].percentage - 0.5).abs() < f64::EPSILON);
        assert_eq!(entries[0].record_ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn empty_corpus_has_zero_percentages() {
        let grouping = Grouping {
            classifier: "Program".into(),
            buckets: vec![bucket("RADx-UP", &[])],
        };
        let entries = reduce(&grouping, 0);
        assert_eq!(entries[0].count, 0);
        assert!(entries[0].percentage.abs() < f64::EPSILON);
    }
}
