//! Entity structs for the radx classification domain.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` so that
//! vocabularies can be loaded from TOML and report output can be validated
//! by downstream sinks.

mod aggregation;
mod classifier;
mod record;
mod term;

pub use aggregation::{AggregationEntry, percentage};
pub use classifier::{Classifier, RangeBin, TermGroup, TermMatching};
pub use record::Record;
pub use term::Term;
