//! End-to-end report assembly.

use radx_config::RadxConfig;
use radx_core::entities::{AggregationEntry, Record};
use radx_core::enums::{ClassificationMode, LabelPolicy};
use radx_core::registry::TermRegistry;
use radx_ontology::{HierarchyRow, Ontology, OntologyTables, Taxonomy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classify::Orchestrator;
use crate::error::ClassifyError;
use crate::labels::LabelTable;
use crate::parser::RecordParser;
use crate::reduce::reduce;
use crate::rollup::{group_rollup, ontology_rollup};
use crate::row::Row;

/// Ranked count table of one classifier.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClassifierCounts {
    pub classifier: String,
    pub policy: LabelPolicy,
    pub entries: Vec<AggregationEntry>,
}

impl ClassifierCounts {
    #[must_use]
    pub fn entry(&self, label: &str) -> Option<&AggregationEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }
}

/// Flattened hierarchy table, root row first.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HierarchyRollup {
    pub name: String,
    pub rows: Vec<HierarchyRow>,
}

/// Everything a sink needs to render one run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Report {
    pub total_records: usize,
    pub mode: ClassificationMode,
    pub labels: LabelTable,
    pub counts: Vec<ClassifierCounts>,
    pub hierarchies: Vec<HierarchyRollup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology: Option<HierarchyRollup>,
}

impl Report {
    #[must_use]
    pub fn counts_for(&self, classifier: &str) -> Option<&ClassifierCounts> {
        self.counts.iter().find(|counts| counts.classifier == classifier)
    }

    #[must_use]
    pub fn hierarchy(&self, name: &str) -> Option<&HierarchyRollup> {
        self.hierarchies.iter().find(|rollup| rollup.name == name)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ClassifyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Owns the configuration, vocabulary, and optional ontology for a run.
///
/// Display hierarchies are derived once at construction, so repeated runs
/// over different corpora share them.
#[derive(Debug, Clone)]
pub struct ReportPipeline {
    config: RadxConfig,
    registry: TermRegistry,
    ontology: Option<Ontology>,
    ontology_taxonomy: Option<Taxonomy>,
    hierarchies: Vec<Taxonomy>,
}

impl ReportPipeline {
    /// # Errors
    ///
    /// Returns [`ClassifyError::Config`] if `config` fails validation and
    /// [`ClassifyError::Ontology`] if a classifier's groups nest cyclically.
    pub fn new(config: RadxConfig, registry: TermRegistry) -> Result<Self, ClassifyError> {
        config.validate()?;
        let hierarchies = registry
            .classifiers()
            .iter()
            .filter(|classifier| !classifier.groups.is_empty())
            .map(Taxonomy::from_groups)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            config,
            registry,
            ontology: None,
            ontology_taxonomy: None,
            hierarchies,
        })
    }

    /// Pipeline over the vocabulary named by `classification.vocabulary_path`,
    /// or the built-in one when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Core`] if the vocabulary cannot be loaded,
    /// plus the errors of [`Self::new`].
    pub fn from_config(config: RadxConfig) -> Result<Self, ClassifyError> {
        let registry = match config.classification.vocabulary_path() {
            Some(path) => TermRegistry::from_path(&path)?,
            None => TermRegistry::builtin()?,
        };
        tracing::debug!(classifiers = registry.len(), "vocabulary loaded");
        Self::new(config, registry)
    }

    /// Attach an ontology for semantic grouping and the ontology rollup.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Ontology`] if the ontology has a cycle.
    pub fn with_ontology(mut self, ontology: Ontology) -> Result<Self, ClassifyError> {
        ontology.validate()?;
        let taxonomy = Taxonomy::from_ontology(&ontology)?;
        tracing::info!(
            root = %ontology.root().id,
            nodes = ontology.len(),
            "ontology attached"
        );
        self.ontology = Some(ontology);
        self.ontology_taxonomy = Some(taxonomy);
        Ok(self)
    }

    /// Build the ontology from tables, rooted at `ontology.root`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::with_ontology`].
    pub fn with_ontology_tables(self, tables: &OntologyTables) -> Result<Self, ClassifyError> {
        let ontology = Ontology::build(tables, &self.config.ontology.root);
        self.with_ontology(ontology)
    }

    #[must_use]
    pub const fn registry(&self) -> &TermRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &RadxConfig {
        &self.config
    }

    /// Parse `rows` and report on the resulting records.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run_records`].
    pub fn run<'r, R, I>(&self, rows: I) -> Result<Report, ClassifyError>
    where
        R: Row + ?Sized + 'r,
        I: IntoIterator<Item = &'r R>,
    {
        let records = RecordParser::new(&self.registry, &self.config.input).parse_rows(rows);
        self.run_records(&records)
    }

    /// Report on already-classified records.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::MissingOntology`] in semantic mode without
    /// an attached ontology and [`ClassifyError::Ontology`] if a rollup
    /// meets a cycle.
    pub fn run_records(&self, records: &[Record]) -> Result<Report, ClassifyError> {
        let mode = self.config.classification.mode;
        let orchestrator = Orchestrator::for_mode(&self.registry, self.ontology.as_ref(), mode)?;
        let total = records.len();

        let counts = orchestrator
            .classify(records)
            .iter()
            .zip(self.registry.classifiers())
            .map(|(grouping, classifier)| ClassifierCounts {
                classifier: grouping.classifier.clone(),
                policy: classifier.policy,
                entries: reduce(grouping, total),
            })
            .collect();

        let mut hierarchies = Vec::with_capacity(self.hierarchies.len());
        for taxonomy in &self.hierarchies {
            let classifier = self.registry.classifier(taxonomy.name())?;
            hierarchies.push(HierarchyRollup {
                name: taxonomy.name().to_string(),
                rows: group_rollup(taxonomy, classifier, records)?,
            });
        }

        let ontology = match &self.ontology_taxonomy {
            Some(taxonomy) => Some(HierarchyRollup {
                name: taxonomy.name().to_string(),
                rows: ontology_rollup(taxonomy, records)?,
            }),
            None => None,
        };

        let labels = LabelTable::build(records, &self.registry, &self.config.report.label_separator);
        tracing::info!(
            records = total,
            mode = %mode,
            classifiers = self.registry.len(),
            hierarchies = hierarchies.len(),
            "report assembled"
        );
        Ok(Report {
            total_records: total,
            mode,
            labels,
            counts,
            hierarchies,
            ontology,
        })
    }
}
