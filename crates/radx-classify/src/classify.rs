//! Per-classifier grouping of records into term buckets.

use std::collections::{HashMap, HashSet};

use radx_core::entities::{Classifier, Record, Term};
use radx_core::enums::ClassificationMode;
use radx_core::registry::TermRegistry;
use radx_ontology::Ontology;

use crate::error::ClassifyError;

/// Records grouped under one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub term: Term,
    pub record_ids: Vec<String>,
}

/// Every bucket of one classifier, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    pub classifier: String,
    pub buckets: Vec<Bucket>,
}

impl Grouping {
    fn new(classifier: &str) -> Self {
        Self {
            classifier: classifier.to_string(),
            buckets: Vec::new(),
        }
    }

    #[must_use]
    pub fn bucket(&self, label: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|bucket| bucket.term.label == label)
    }
}

/// Accumulates buckets keyed by term id, preserving first-seen order.
struct BucketSet {
    grouping: Grouping,
    positions: HashMap<String, usize>,
}

impl BucketSet {
    fn new(classifier: &str) -> Self {
        Self {
            grouping: Grouping::new(classifier),
            positions: HashMap::new(),
        }
    }

    fn seed(&mut self, term: &Term) {
        self.slot(term);
    }

    fn push(&mut self, term: &Term, record_id: &str) {
        let slot = self.slot(term);
        self.grouping.buckets[slot].record_ids.push(record_id.to_string());
    }

    fn slot(&mut self, term: &Term) -> usize {
        if let Some(&slot) = self.positions.get(&term.id) {
            return slot;
        }
        let slot = self.grouping.buckets.len();
        self.grouping.buckets.push(Bucket {
            term: term.clone(),
            record_ids: Vec::new(),
        });
        self.positions.insert(term.id.clone(), slot);
        slot
    }
}

/// Groups classified records per classifier.
///
/// In [`ClassificationMode::Vocabulary`] every vocabulary term gets a bucket,
/// even with zero records. In [`ClassificationMode::Semantic`] matched
/// terms are expanded with their ontology ancestors and buckets exist only
/// for terms that receive a record.
#[derive(Debug, Clone, Copy)]
pub struct Orchestrator<'a> {
    registry: &'a TermRegistry,
    ontology: Option<&'a Ontology>,
    mode: ClassificationMode,
}

impl<'a> Orchestrator<'a> {
    #[must_use]
    pub const fn vocabulary(registry: &'a TermRegistry) -> Self {
        Self {
            registry,
            ontology: None,
            mode: ClassificationMode::Vocabulary,
        }
    }

    #[must_use]
    pub const fn semantic(registry: &'a TermRegistry, ontology: &'a Ontology) -> Self {
        Self {
            registry,
            ontology: Some(ontology),
            mode: ClassificationMode::Semantic,
        }
    }

    /// Orchestrator for `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::MissingOntology`] for semantic mode without
    /// an ontology.
    pub fn for_mode(
        registry: &'a TermRegistry,
        ontology: Option<&'a Ontology>,
        mode: ClassificationMode,
    ) -> Result<Self, ClassifyError> {
        match (mode, ontology) {
            (ClassificationMode::Vocabulary, _) => Ok(Self::vocabulary(registry)),
            (ClassificationMode::Semantic, Some(ontology)) => {
                Ok(Self::semantic(registry, ontology))
            }
            (ClassificationMode::Semantic, None) => Err(ClassifyError::MissingOntology),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ClassificationMode {
        self.mode
    }

    /// Group records under every classifier, in registry order.
    #[must_use]
    pub fn classify(&self, records: &[Record]) -> Vec<Grouping> {
        self.registry
            .classifiers()
            .iter()
            .map(|classifier| self.classify_one(records, classifier))
            .collect()
    }

    /// Group records under one classifier. A record is appended once under
    /// each distinct term it carries.
    #[must_use]
    pub fn classify_one(&self, records: &[Record], classifier: &Classifier) -> Grouping {
        let mut buckets = BucketSet::new(&classifier.name);
        match self.ontology {
            None => {
                for term in classifier.all_terms() {
                    buckets.seed(term);
                }
                for record in records {
                    let mut seen = HashSet::new();
                    for term in record.terms(&classifier.name) {
                        if seen.insert(term.id.as_str()) {
                            buckets.push(term, &record.id);
                        }
                    }
                }
            }
            Some(ontology) => {
                for record in records {
                    let mut seen = HashSet::new();
                    for term in record.terms(&classifier.name) {
                        for expanded in expand(ontology, classifier, term) {
                            if seen.insert(expanded.id.clone()) {
                                buckets.push(&expanded, &record.id);
                            }
                        }
                    }
                }
            }
        }

        let grouping = buckets.grouping;
        tracing::debug!(
            classifier = %classifier.name,
            mode = %self.mode,
            buckets = grouping.buckets.len(),
            "grouped records"
        );
        grouping
    }
}

/// A matched term plus its ontology ancestors. Ontology nodes that share a
/// label with a vocabulary term take that term's coding and URL. A term
/// the ontology does not know is kept as-is.
fn expand(ontology: &Ontology, classifier: &Classifier, term: &Term) -> Vec<Term> {
    let closure = ontology.node_and_ancestors(&term.label);
    if closure.is_empty() {
        tracing::debug!(term = %term.label, "term not in ontology; kept unexpanded");
        return vec![term.clone()];
    }
    closure
        .into_iter()
        .map(|node| {
            classifier
                .term_by_label(node.display_label())
                .cloned()
                .or_else(|| node.term())
                .unwrap_or_else(|| Term::new(&node.id, &node.id).uncoded())
        })
        .collect()
}
