//! Errors raised while loading or validating reporter settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be parsed or a value has the wrong type.
    #[error("cannot load settings: {0}")]
    Figment(#[from] figment::Error),

    /// A section the selected mode depends on is empty.
    #[error("settings section [{section}] is required by the selected mode")]
    NotConfigured { section: String },

    /// A value parsed but cannot be used.
    #[error("invalid setting {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
