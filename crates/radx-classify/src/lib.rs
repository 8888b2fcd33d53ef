//! # radx-classify
//!
//! Turns tabular study metadata into classified records and count tables.
//!
//! ```text
//! rows --RecordParser--> Records --Orchestrator--> Groupings --reduce--> ranked counts
//!                                                          \--rollup--> hierarchy rows
//! ```
//!
//! [`ReportPipeline`] runs the whole chain and returns a serializable
//! [`Report`].

pub mod classify;
pub mod error;
pub mod labels;
pub mod matcher;
pub mod parser;
pub mod reduce;
pub mod report;
pub mod rollup;
pub mod row;

pub use classify::{Bucket, Grouping, Orchestrator};
pub use error::ClassifyError;
pub use labels::{LabelRow, LabelTable};
pub use matcher::{KeywordMatcher, first_integer, normalize, term_matches};
pub use parser::RecordParser;
pub use reduce::reduce;
pub use report::{ClassifierCounts, HierarchyRollup, Report, ReportPipeline};
pub use row::Row;
