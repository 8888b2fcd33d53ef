//! Immutable registry of classifiers and their vocabulary terms.
//!
//! The `TermRegistry` is built once per run, either from the built-in RADx
//! Data Hub vocabulary or from a user-supplied TOML file, and then passed
//! explicitly to the matcher and the orchestrator.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::entities::{Classifier, TermMatching};
use crate::errors::CoreError;
use crate::search_url::search_url;

const BUILTIN_VOCABULARY: &str = include_str!("../data/vocabulary.toml");

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    #[serde(default)]
    classifiers: Vec<Classifier>,
}

/// Central store of every classifier in the system, in reporting order.
#[derive(Debug, Clone)]
pub struct TermRegistry {
    classifiers: Vec<Classifier>,
    by_name: HashMap<String, usize>,
}

impl TermRegistry {
    /// Registry for the built-in RADx Data Hub vocabularies.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] if the embedded vocabulary fails to parse or
    /// validate, which indicates a packaging bug.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::from_toml_str(BUILTIN_VOCABULARY)
    }

    /// Parse a vocabulary TOML document (`[[classifiers]]` tables).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Vocabulary` for malformed TOML and
    /// `CoreError::Validation` for inconsistent vocabulary data.
    pub fn from_toml_str(source: &str) -> Result<Self, CoreError> {
        let file: VocabularyFile = toml::from_str(source)?;
        Self::from_classifiers(file.classifiers)
    }

    /// Read and parse a vocabulary TOML file.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if the file cannot be read, otherwise the
    /// same errors as [`Self::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("reading vocabulary {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loading vocabulary");
        Self::from_toml_str(&source)
    }

    /// Build a registry from classifiers, filling defaulted ids and search
    /// URLs, then validating.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` on duplicate classifier names,
    /// duplicate term ids, or range bins that reference unknown terms.
    pub fn from_classifiers(classifiers: Vec<Classifier>) -> Result<Self, CoreError> {
        let mut by_name = HashMap::with_capacity(classifiers.len());
        let mut normalized = Vec::with_capacity(classifiers.len());

        for mut classifier in classifiers {
            normalize(&mut classifier);
            validate(&classifier)?;
            if by_name
                .insert(classifier.name.clone(), normalized.len())
                .is_some()
            {
                return Err(CoreError::Validation(format!(
                    "duplicate classifier '{}'",
                    classifier.name
                )));
            }
            normalized.push(classifier);
        }

        tracing::debug!(classifiers = normalized.len(), "term registry built");
        Ok(Self {
            classifiers: normalized,
            by_name,
        })
    }

    /// Get a classifier by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Classifier> {
        self.by_name.get(name).map(|&i| &self.classifiers[i])
    }

    /// Get a classifier by name.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the name is not registered.
    pub fn classifier(&self, name: &str) -> Result<&Classifier, CoreError> {
        self.get(name).ok_or_else(|| CoreError::NotFound {
            entity_type: "classifier".to_string(),
            id: name.to_string(),
        })
    }

    #[must_use]
    pub fn classifiers(&self) -> &[Classifier] {
        &self.classifiers
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classifiers.iter().map(|c| c.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }
}

fn normalize(classifier: &mut Classifier) {
    let facet = classifier.search_facet.clone();
    for term in &mut classifier.terms {
        if term.id.is_empty() {
            term.id.clone_from(&term.label);
        }
        if let Some(facet) = &facet {
            if term.url.is_none() && term.coded {
                term.url = Some(search_url(facet, &term.label));
            }
        }
    }
    if classifier.sentinel.id.is_empty() {
        classifier.sentinel.id.clone_from(&classifier.sentinel.label);
    }
}

fn validate(classifier: &Classifier) -> Result<(), CoreError> {
    if classifier.name.trim().is_empty() {
        return Err(CoreError::Validation("classifier name is empty".into()));
    }

    let mut ids = HashSet::with_capacity(classifier.terms.len() + 1);
    for term in classifier.all_terms() {
        if term.label.is_empty() {
            return Err(CoreError::Validation(format!(
                "classifier '{}' has a term with an empty label",
                classifier.name
            )));
        }
        if !ids.insert(term.id.as_str()) {
            return Err(CoreError::Validation(format!(
                "classifier '{}' has duplicate term id '{}'",
                classifier.name, term.id
            )));
        }
    }

    if let TermMatching::Range { bins } = &classifier.matching {
        for bin in bins {
            if classifier.term(&bin.term).is_none() {
                return Err(CoreError::Validation(format!(
                    "classifier '{}' has a range bin for unknown term '{}'",
                    classifier.name, bin.term
                )));
            }
            if bin.upper.is_some_and(|upper| upper < bin.lower) {
                return Err(CoreError::Validation(format!(
                    "classifier '{}' has an empty range for term '{}'",
                    classifier.name, bin.term
                )));
            }
        }
    }

    for group in &classifier.groups {
        if group.label.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "classifier '{}' has a group with an empty label",
                classifier.name
            )));
        }
    }

    Ok(())
}
