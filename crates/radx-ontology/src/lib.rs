//! # radx-ontology
//!
//! Directed-acyclic term graphs for radx-reporter.
//!
//! - [`Ontology`] is built breadth-first from four subject/object tables and
//!   answers ancestor-closure queries used to expand matched terms.
//! - [`Taxonomy`] levelizes a DAG under a synthetic `Total` root and runs
//!   [`AggregationPass`]es that count distinct record markers per subtree.

pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod tables;

pub use error::OntologyError;
pub use graph::{Ontology, OntologyNode};
pub use hierarchy::{
    AggregationPass, HierarchyRow, ROOT_LABEL, Taxonomy, TaxonomyBuilder, TaxonomyNode,
};
pub use tables::{OntologyTables, TableRow};
