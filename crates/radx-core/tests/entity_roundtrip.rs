//! Serde roundtrip and JsonSchema validation tests for vocabulary and report types.

use radx_core::entities::*;
use radx_core::enums::*;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    term_roundtrip,
    Term,
    Term::labeled("Device Validation Study")
        .with_synonym("Device Verification Study")
        .with_url("https://radxdatahub.nih.gov/studyExplorer")
);

roundtrip_and_validate!(
    classifier_roundtrip,
    Classifier,
    Classifier::new(
        "Population Range",
        Term::new("unknown", "Unknown").uncoded()
    )
    .with_policy(LabelPolicy::Single)
    .with_terms([Term::labeled("1-250"), Term::labeled(">5,000")])
    .with_matching(TermMatching::Range {
        bins: vec![
            RangeBin {
                term: "1-250".into(),
                lower: 1,
                upper: Some(250),
            },
            RangeBin {
                term: ">5,000".into(),
                lower: 5001,
                upper: None,
            },
        ],
    })
);

roundtrip_and_validate!(
    grouped_classifier_roundtrip,
    Classifier,
    Classifier::new("Collection Method", Term::labeled("Unknown").uncoded())
        .with_terms([Term::labeled("Antigen Testing Device")])
        .with_groups([TermGroup::new(
            "COVID-19 Testing Devices",
            ["Antigen Testing Device"]
        )])
);

roundtrip_and_validate!(
    record_roundtrip,
    Record,
    Record::new("phs002682")
        .with("Program", vec![Term::labeled("RADx Tech")])
        .with(
            "Data Type",
            vec![Term::labeled("Questionnaires/Surveys"), Term::labeled("Clinical")]
        )
        .with("Population Range", vec![Term::labeled("251-500")])
        .with_value("Population Range", 488)
);

roundtrip_and_validate!(
    aggregation_entry_roundtrip,
    AggregationEntry,
    AggregationEntry::new(
        "Survey",
        true,
        None,
        vec!["phs000001".into(), "phs000002".into(), "phs000003".into()],
        10
    )
);

roundtrip_and_validate!(
    label_policy_roundtrip,
    LabelPolicy,
    LabelPolicy::Single
);

roundtrip_and_validate!(
    classification_mode_roundtrip,
    ClassificationMode,
    ClassificationMode::Semantic
);
