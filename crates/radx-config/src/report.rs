//! Report output configuration.

use serde::{Deserialize, Serialize};

fn default_label_separator() -> String {
    "; ".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Separator between labels in the per-record label table.
    #[serde(default = "default_label_separator")]
    pub label_separator: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            label_separator: default_label_separator(),
        }
    }
}
