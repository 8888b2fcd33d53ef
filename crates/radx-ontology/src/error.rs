//! Error types for ontology and taxonomy operations.

/// Structural integrity failures. Everything else in the classification
/// pipeline recovers locally; these are fatal.
#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    /// A directed cycle was found while walking the graph.
    #[error("cycle detected at node '{node}'")]
    Cycle { node: String },

    /// Depth assignment could not finalize these nodes because some parent
    /// never resolved, which only happens on a cycle.
    #[error("cycle detected during depth assignment; unresolved nodes: {}", nodes.join(", "))]
    UnresolvedDepth { nodes: Vec<String> },

    /// A label was requested that the taxonomy does not contain.
    #[error("unknown taxonomy node '{0}'")]
    UnknownNode(String),

    /// A subject/object table could not be parsed.
    #[error("malformed {table} table at line {line}: {reason}")]
    MalformedTable {
        table: &'static str,
        line: usize,
        reason: String,
    },
}
