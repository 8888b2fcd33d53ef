//! Record source configuration: which columns feed which classifier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

fn default_id_field() -> String {
    "phs".to_string()
}

/// Column mapping of the study-metadata export.
fn default_fields() -> BTreeMap<String, Vec<String>> {
    [
        ("Program", &["DCC"][..]),
        ("Study Design", &["Study Design, Coded"]),
        ("Data Type", &["data_general_types - CODED"]),
        (
            "Collection Method",
            &[
                "Data Collection Method",
                "Data Collection Method Other Specify",
            ],
        ),
        ("NIH Institute", &["institutes_supporting_study - CODED"]),
        (
            "Study Domain",
            &[
                "Keywords - Raw",
                "Keywords - Cleaned",
                "Study Domain",
                "Study Domain, Other",
                "Description",
            ],
        ),
        ("Population Range", &["Estimated Participants - Cleaned"]),
        ("Study Focus Population", &["Study Population Focus"]),
    ]
    .into_iter()
    .map(|(classifier, columns)| {
        (
            classifier.to_string(),
            columns.iter().map(|c| (*c).to_string()).collect(),
        )
    })
    .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Column holding the record identifier.
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Column checked by the gating predicate. Empty disables gating.
    #[serde(default)]
    pub gate_field: String,

    /// Accepted values of `gate_field`, compared case-insensitively after
    /// trimming. Rows with any other value (or none) are excluded.
    #[serde(default)]
    pub gate_values: Vec<String>,

    /// Record ids dropped from the corpus.
    #[serde(default)]
    pub skip_ids: Vec<String>,

    /// Classifier name -> source columns, concatenated in order.
    #[serde(default = "default_fields")]
    pub fields: BTreeMap<String, Vec<String>>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            gate_field: String::new(),
            gate_values: Vec::new(),
            skip_ids: Vec::new(),
            fields: default_fields(),
        }
    }
}

impl InputConfig {
    /// Whether rows are filtered by a gating column.
    #[must_use]
    pub fn is_gated(&self) -> bool {
        !self.gate_field.is_empty()
    }

    /// Whether `value` passes the gate. Always true when gating is disabled.
    #[must_use]
    pub fn admits(&self, value: Option<&str>) -> bool {
        if !self.is_gated() {
            return true;
        }
        value.is_some_and(|value| {
            let value = value.trim();
            self.gate_values
                .iter()
                .any(|accepted| accepted.trim().eq_ignore_ascii_case(value))
        })
    }

    /// Source columns for a classifier.
    ///
    /// Falls back to a case-insensitive key match, since figment lowercases
    /// keys that arrive through environment variables.
    #[must_use]
    pub fn fields_for(&self, classifier: &str) -> Option<&[String]> {
        self.fields
            .get(classifier)
            .or_else(|| {
                self.fields
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(classifier))
                    .map(|(_, columns)| columns)
            })
            .map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_skipped(&self, id: &str) -> bool {
        self.skip_ids.iter().any(|skipped| skipped == id)
    }
}
