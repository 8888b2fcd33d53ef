//! # radx-config
//!
//! Reporter settings: which columns feed which classifier, how records are
//! grouped, where the ontology is rooted, and how labels are joined.
//!
//! Later sources override earlier ones: built-in defaults,
//! `~/.config/radx/config.toml`, `.radx/config.toml`, then `RADX_*`
//! variables with `__` between section and key
//! (`RADX_CLASSIFICATION__MODE=semantic`).
//!
//! # Usage
//!
//! ```no_run
//! use radx_config::RadxConfig;
//!
//! let config = RadxConfig::load_with_dotenv().expect("config");
//! config.validate().expect("valid config");
//! println!("records are keyed by column {}", config.input.id_field);
//! ```

mod classification;
mod error;
mod input;
mod ontology;
mod report;

pub use classification::ClassificationConfig;
pub use error::ConfigError;
pub use input::InputConfig;
pub use ontology::OntologyConfig;
pub use report::ReportConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use radx_core::enums::ClassificationMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RadxConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub ontology: OntologyConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl RadxConfig {
    /// Extract settings from every source. The process environment is read
    /// as-is; see [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] for unparseable TOML or a value of
    /// the wrong type, such as an unknown classification mode.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Like [`Self::load`], after exporting the variables of the nearest
    /// `.env` file. Variables already set in the environment win over the
    /// file.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Provider chain behind [`Self::load`], exposed so callers can merge
    /// their own providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let project_path = PathBuf::from(".radx/config.toml");
        if project_path.exists() {
            figment = figment.merge(Toml::file(project_path));
        }

        figment.merge(Env::prefixed("RADX_").split("__"))
    }

    /// Check cross-field constraints that serde defaults cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty id column or label
    /// separator, and [`ConfigError::NotConfigured`] when semantic mode is
    /// selected without an ontology root.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.id_field.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "input.id_field".into(),
                reason: "must name the record identifier column".into(),
            });
        }
        if self.report.label_separator.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "report.label_separator".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.classification.mode == ClassificationMode::Semantic
            && !self.ontology.is_configured()
        {
            return Err(ConfigError::NotConfigured {
                section: "ontology".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("radx").join("config.toml"))
    }

    /// Export the first `.env` found from the working directory upward,
    /// falling back to the workspace of a `cargo run` build. A missing or
    /// unreadable file leaves the environment untouched.
    fn load_dotenv() -> Option<PathBuf> {
        if let Ok(path) = dotenvy::dotenv() {
            return Some(path);
        }
        let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR")?;
        PathBuf::from(manifest_dir)
            .ancestors()
            .take(3)
            .map(|dir| dir.join(".env"))
            .find(|path| path.is_file())
            .filter(|path| dotenvy::from_path(path).is_ok())
    }
}
