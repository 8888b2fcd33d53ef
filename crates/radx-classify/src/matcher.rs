//! Free-text matching against vocabulary terms.
//!
//! Matching is plain substring containment over normalized keys: no
//! tokenization and no fuzziness. Short labels can therefore match inside
//! unrelated words.

use std::sync::LazyLock;

use radx_core::entities::{Classifier, Term};
use regex::Regex;

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\b").expect("integer pattern is valid"));

/// Drop every character outside `a-zA-Z`, then lowercase.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Whether the normalized label or any normalized synonym of `term` occurs
/// in the normalized `text`.
#[must_use]
pub fn term_matches(term: &Term, text: &str) -> bool {
    let text = normalize(text);
    term.surface_forms()
        .map(normalize)
        .any(|key| !key.is_empty() && text.contains(&key))
}

/// First standalone run of digits in `text`, if it fits in a `u64`.
#[must_use]
pub fn first_integer(text: &str) -> Option<u64> {
    INTEGER_RE.find(text)?.as_str().parse().ok()
}

/// A classifier's terms with their normalized keys computed once.
///
/// The sentinel is not matchable. Terms whose every key normalizes to the
/// empty string never match.
#[derive(Debug, Clone)]
pub struct KeywordMatcher<'c> {
    entries: Vec<(&'c Term, Vec<String>)>,
}

impl<'c> KeywordMatcher<'c> {
    #[must_use]
    pub fn new(classifier: &'c Classifier) -> Self {
        let entries = classifier
            .terms
            .iter()
            .map(|term| {
                let keys: Vec<String> = term
                    .surface_forms()
                    .map(normalize)
                    .filter(|key| !key.is_empty())
                    .collect();
                if keys.is_empty() {
                    tracing::warn!(
                        classifier = %classifier.name,
                        term = %term.label,
                        "term has no alphabetic characters and can never match"
                    );
                }
                (term, keys)
            })
            .collect();
        Self { entries }
    }

    /// Matching terms in vocabulary order.
    #[must_use]
    pub fn matches(&self, text: &str) -> Vec<&'c Term> {
        let text = normalize(text);
        self.entries
            .iter()
            .filter(|(_, keys)| keys.iter().any(|key| text.contains(key.as_str())))
            .map(|(term, _)| *term)
            .collect()
    }
}
