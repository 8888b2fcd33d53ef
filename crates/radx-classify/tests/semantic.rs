//! Semantic classification against a small ontology.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use radx_classify::{ClassifyError, ReportPipeline};
use radx_config::RadxConfig;
use radx_core::entities::{Classifier, Term};
use radx_core::enums::ClassificationMode;
use radx_core::registry::TermRegistry;
use radx_ontology::OntologyTables;

const LABELS: &str = "subject\tobject
m:0\tMethods
m:1\tEnvironmental Sampling
m:2\tWastewater Sampling
m:3\tSurvey
m:4\tAir Sampling
";

const SYNONYMS: &str = "subject\tobject
";

const AUXILIARY: &str = "subject
m:0
";

const HIERARCHY: &str = "subject\tobject
m:0\towl:Thing
m:1\tm:0
m:2\tm:1
m:4\tm:1
m:3\tm:0
";

fn registry() -> TermRegistry {
    TermRegistry::from_classifiers(vec![
        Classifier::new("Collection Method", Term::labeled("Unknown").uncoded()).with_terms([
            Term::labeled("Survey"),
            Term::labeled("Wastewater Sampling"),
            Term::labeled("Air Sampling"),
        ]),
    ])
    .unwrap()
}

fn semantic_config() -> RadxConfig {
    let mut config = RadxConfig::default();
    config.classification.mode = ClassificationMode::Semantic;
    config.input.fields = [(
        "Collection Method".to_string(),
        vec!["method".to_string()],
    )]
    .into();
    config.input.id_field = "id".into();
    config
}

fn rows() -> Vec<HashMap<&'static str, &'static str>> {
    vec![
        HashMap::from([("id", "r1"), ("method", "wastewater sampling, air sampling")]),
        HashMap::from([("id", "r2"), ("method", "Survey")]),
        HashMap::from([("id", "r3"), ("method", "")]),
    ]
}

#[test]
fn ancestors_collect_records_once() {
    let tables = OntologyTables::from_tsv(LABELS, SYNONYMS, AUXILIARY, HIERARCHY).unwrap();
    let pipeline = ReportPipeline::new(semantic_config(), registry())
        .unwrap()
        .with_ontology_tables(&tables)
        .unwrap();
    let report = pipeline.run(&rows()).unwrap();
    assert_eq!(report.mode, ClassificationMode::Semantic);

    let counts: Vec<(&str, usize)> = report
        .counts_for("Collection Method")
        .unwrap()
        .entries
        .iter()
        .map(|e| (e.label.as_str(), e.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("Wastewater Sampling", 1),
            ("Environmental Sampling", 1),
            ("Air Sampling", 1),
            ("Survey", 1),
            ("Unknown", 1),
        ]
    );

    let ontology = report.ontology.as_ref().unwrap();
    let rows: Vec<(&str, i32, usize)> = ontology
        .rows
        .iter()
        .map(|r| (r.entry.label.as_str(), r.depth, r.entry.count))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Total", -1, 2),
            ("Methods", 0, 2),
            ("Environmental Sampling", 1, 1),
            ("Survey", 1, 1),
            ("Wastewater Sampling", 2, 1),
            ("Air Sampling", 2, 1),
        ]
    );
}

#[test]
fn semantic_config_without_ontology_is_rejected_at_run() {
    let pipeline = ReportPipeline::new(semantic_config(), registry()).unwrap();
    assert!(matches!(
        pipeline.run(&rows()),
        Err(ClassifyError::MissingOntology)
    ));
}

#[test]
fn cyclic_ontology_is_rejected() {
    let tables = OntologyTables::default()
        .with_label("m:0", "Methods")
        .with_label("m:1", "Loop")
        .with_subclass("m:0", "owl:Thing")
        .with_subclass("m:1", "m:0")
        .with_subclass("m:0", "m:1");
    let result = ReportPipeline::new(semantic_config(), registry())
        .unwrap()
        .with_ontology_tables(&tables);
    assert!(matches!(result, Err(ClassifyError::Ontology(_))));
}
