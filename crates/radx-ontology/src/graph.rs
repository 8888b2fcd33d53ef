//! Ontology graph built from subject/object tables.
//!
//! Nodes live in a single petgraph arena; edges run parent -> child and are
//! plain indices, so a node can have any number of parents.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use radx_core::entities::Term;
use rustworkx_core::petgraph::Direction;
use rustworkx_core::petgraph::algo::toposort;
use rustworkx_core::petgraph::graph::{DiGraph, NodeIndex};

use crate::error::OntologyError;
use crate::tables::OntologyTables;

/// One ontology class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologyNode {
    pub id: String,
    /// `None` when the id appears in the hierarchy but not the label table.
    pub label: Option<String>,
    pub synonyms: BTreeSet<String>,
    /// False for auxiliary (structural grouping) terms.
    pub coded: bool,
}

impl OntologyNode {
    /// Label if present, otherwise the id.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Vocabulary term for this node, or `None` for an unlabeled node.
    #[must_use]
    pub fn term(&self) -> Option<Term> {
        let label = self.label.as_ref()?;
        let mut term = Term::new(&self.id, label);
        term.synonyms.clone_from(&self.synonyms);
        term.coded = self.coded;
        Some(term)
    }
}

/// Immutable ontology DAG rooted at a designated id.
#[derive(Debug, Clone)]
pub struct Ontology {
    graph: DiGraph<OntologyNode, ()>,
    id_to_index: HashMap<String, NodeIndex>,
    label_to_index: HashMap<String, NodeIndex>,
    root: NodeIndex,
    /// The root plus its immediate children.
    top_level: HashSet<NodeIndex>,
}

impl Ontology {
    /// Build the subgraph reachable from `root` by breadth-first traversal.
    ///
    /// Each id becomes a node on first discovery. Later edges into a known
    /// node only add another parent link. A hierarchy that loops back on
    /// itself still terminates here; [`Self::validate`] reports the cycle.
    #[must_use]
    pub fn build(tables: &OntologyTables, root: &str) -> Self {
        let labels: HashMap<&str, &str> = tables
            .labels
            .iter()
            .map(|row| (row.subject.as_str(), row.object.as_str()))
            .collect();

        let mut synonyms: HashMap<&str, BTreeSet<String>> = HashMap::new();
        for row in &tables.synonyms {
            synonyms
                .entry(row.subject.as_str())
                .or_default()
                .insert(row.object.clone());
        }

        let auxiliary: HashSet<&str> = tables
            .auxiliary
            .iter()
            .map(|row| row.subject.as_str())
            .collect();

        // parent -> children in table order, duplicates dropped
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for row in &tables.hierarchy {
            let entry = children.entry(row.object.as_str()).or_default();
            if !entry.contains(&row.subject.as_str()) {
                entry.push(row.subject.as_str());
            }
        }

        let make_node = |id: &str| {
            let label = labels.get(id).map(|label| (*label).to_string());
            if label.is_none() {
                tracing::warn!(node = id, "ontology node has no label");
            }
            OntologyNode {
                id: id.to_string(),
                label,
                synonyms: synonyms.get(id).cloned().unwrap_or_default(),
                coded: !auxiliary.contains(id),
            }
        };

        let mut graph = DiGraph::new();
        let mut id_to_index = HashMap::new();
        let root_index = graph.add_node(make_node(root));
        id_to_index.insert(root.to_string(), root_index);

        let mut frontier = VecDeque::from([root_index]);
        while let Some(parent) = frontier.pop_front() {
            let parent_id = graph[parent].id.clone();
            let Some(child_ids) = children.get(parent_id.as_str()) else {
                continue;
            };
            for &child_id in child_ids {
                let child = match id_to_index.get(child_id) {
                    Some(index) => *index,
                    None => {
                        let index = graph.add_node(make_node(child_id));
                        id_to_index.insert(child_id.to_string(), index);
                        frontier.push_back(index);
                        index
                    }
                };
                graph.add_edge(parent, child, ());
            }
        }

        let mut label_to_index = HashMap::new();
        for index in graph.node_indices() {
            if let Some(label) = &graph[index].label {
                if label_to_index.contains_key(label) {
                    tracing::warn!(
                        label = %label,
                        node = %graph[index].id,
                        "duplicate ontology label; keeping first"
                    );
                } else {
                    label_to_index.insert(label.clone(), index);
                }
            }
        }

        let mut top_level: HashSet<NodeIndex> = graph
            .neighbors_directed(root_index, Direction::Outgoing)
            .collect();
        top_level.insert(root_index);

        tracing::debug!(
            root,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built ontology"
        );

        Self {
            graph,
            id_to_index,
            label_to_index,
            root: root_index,
            top_level,
        }
    }

    #[must_use]
    pub fn root(&self) -> &OntologyNode {
        &self.graph[self.root]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&OntologyNode> {
        self.id_to_index.get(id).map(|index| &self.graph[*index])
    }

    /// Lookup by exact label. Unknown labels are simply absent.
    #[must_use]
    pub fn node_by_label(&self, label: &str) -> Option<&OntologyNode> {
        self.label_to_index.get(label).map(|index| &self.graph[*index])
    }

    /// All nodes in discovery order, root first.
    pub fn nodes(&self) -> impl Iterator<Item = &OntologyNode> {
        self.graph.node_weights()
    }

    /// Whether the node is the root or one of its immediate children.
    #[must_use]
    pub fn is_top_level(&self, id: &str) -> bool {
        self.id_to_index
            .get(id)
            .is_some_and(|index| self.top_level.contains(index))
    }

    #[must_use]
    pub fn parents_of(&self, id: &str) -> Vec<&OntologyNode> {
        self.id_to_index
            .get(id)
            .map(|index| self.neighbors(*index, Direction::Incoming))
            .unwrap_or_default()
            .into_iter()
            .map(|index| &self.graph[index])
            .collect()
    }

    #[must_use]
    pub fn children_of(&self, id: &str) -> Vec<&OntologyNode> {
        self.id_to_index
            .get(id)
            .map(|index| self.neighbors(*index, Direction::Outgoing))
            .unwrap_or_default()
            .into_iter()
            .map(|index| &self.graph[index])
            .collect()
    }

    /// Every ancestor of the nodes carrying `labels`, in breadth-first
    /// discovery order, excluding the root and its immediate children.
    ///
    /// The starting nodes themselves are never returned. Unknown labels
    /// contribute nothing.
    #[must_use]
    pub fn ancestors_of<'a, I>(&self, labels: I) -> Vec<&OntologyNode>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let starts: Vec<NodeIndex> = labels
            .into_iter()
            .filter_map(|label| self.label_to_index.get(label).copied())
            .collect();
        self.ancestor_indices(&starts)
            .into_iter()
            .map(|index| &self.graph[index])
            .collect()
    }

    /// The node carrying `label` followed by [`Self::ancestors_of`] it.
    ///
    /// Every parent chain of a multi-parent node is followed. The same
    /// top-level pruning applies to ancestors; the starting node is kept
    /// even when it is itself top-level. Empty for an unknown label.
    #[must_use]
    pub fn node_and_ancestors(&self, label: &str) -> Vec<&OntologyNode> {
        let Some(start) = self.label_to_index.get(label).copied() else {
            return Vec::new();
        };
        std::iter::once(start)
            .chain(self.ancestor_indices(&[start]))
            .map(|index| &self.graph[index])
            .collect()
    }

    /// Whether the hierarchy contains a directed cycle.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        toposort(&self.graph, None).is_err()
    }

    /// Check structural integrity.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::Cycle`] naming a node on a directed cycle.
    pub fn validate(&self) -> Result<(), OntologyError> {
        toposort(&self.graph, None)
            .map(|_| ())
            .map_err(|cycle| OntologyError::Cycle {
                node: self.graph[cycle.node_id()].display_label().to_string(),
            })
    }

    /// Parent -> child pairs of node ids, for building a taxonomy over the
    /// ontology.
    pub(crate) fn edges(&self) -> impl Iterator<Item = (&OntologyNode, &OntologyNode)> {
        self.graph.edge_indices().filter_map(|edge| {
            let (parent, child) = self.graph.edge_endpoints(edge)?;
            Some((&self.graph[parent], &self.graph[child]))
        })
    }

    fn ancestor_indices(&self, starts: &[NodeIndex]) -> Vec<NodeIndex> {
        let mut visited: HashSet<NodeIndex> = starts.iter().copied().collect();
        let mut frontier: VecDeque<NodeIndex> = starts.iter().copied().collect();
        let mut ancestors = Vec::new();
        while let Some(node) = frontier.pop_front() {
            for parent in self.neighbors(node, Direction::Incoming) {
                if visited.insert(parent) {
                    frontier.push_back(parent);
                    if !self.top_level.contains(&parent) {
                        ancestors.push(parent);
                    }
                }
            }
        }
        ancestors
    }

    /// Neighbors in edge insertion order.
    fn neighbors(&self, index: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> =
            self.graph.neighbors_directed(index, direction).collect();
        neighbors.reverse();
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// owl:Thing -> Diseases -> {Respiratory -> {Flu, COVID}, Chronic}
    /// COVID also sits under Chronic.
    fn disease_ontology() -> Ontology {
        let tables = OntologyTables::default()
            .with_label("owl:Thing", "Thing")
            .with_label("d:0", "Diseases")
            .with_label("d:1", "Respiratory")
            .with_label("d:2", "Flu")
            .with_label("d:3", "COVID")
            .with_label("d:4", "Chronic")
            .with_synonym("d:3", "SARS-CoV-2")
            .with_auxiliary("d:1")
            .with_subclass("d:0", "owl:Thing")
            .with_subclass("d:1", "d:0")
            .with_subclass("d:4", "d:0")
            .with_subclass("d:2", "d:1")
            .with_subclass("d:3", "d:1")
            .with_subclass("d:3", "d:4");
        Ontology::build(&tables, "owl:Thing")
    }

    fn labels(nodes: &[&OntologyNode]) -> Vec<String> {
        nodes.iter().map(|n| n.display_label().to_string()).collect()
    }

    #[test]
    fn builds_each_node_once() {
        let ontology = disease_ontology();
        assert_eq!(ontology.len(), 6);
        assert_eq!(ontology.root().id, "owl:Thing");
        assert_eq!(labels(&ontology.parents_of("d:3")), vec!["Respiratory", "Chronic"]);
        assert_eq!(labels(&ontology.children_of("d:1")), vec!["Flu", "COVID"]);
    }

    #[test]
    fn auxiliary_terms_are_uncoded() {
        let ontology = disease_ontology();
        assert!(!ontology.node("d:1").unwrap().coded);
        assert!(ontology.node("d:2").unwrap().coded);
    }

    #[test]
    fn node_carries_synonyms_into_term() {
        let ontology = disease_ontology();
        let term = ontology.node_by_label("COVID").unwrap().term().unwrap();
        assert_eq!(term.id, "d:3");
        assert!(term.synonyms.contains("SARS-CoV-2"));
    }

    #[test]
    fn ancestors_exclude_top_level_nodes() {
        let ontology = disease_ontology();
        let ancestors = ontology.ancestors_of(["COVID"]);
        assert_eq!(labels(&ancestors), vec!["Respiratory", "Chronic"]);
        assert!(ancestors.iter().all(|n| !ontology.is_top_level(&n.id)));
    }

    #[test]
    fn ancestors_of_several_labels_are_deduplicated() {
        let ontology = disease_ontology();
        let ancestors = ontology.ancestors_of(["Flu", "COVID"]);
        assert_eq!(labels(&ancestors), vec!["Respiratory", "Chronic"]);
    }

    #[test]
    fn ancestors_never_include_a_start_node() {
        let ontology = disease_ontology();
        let ancestors = ontology.ancestors_of(["COVID", "Respiratory"]);
        assert_eq!(labels(&ancestors), vec!["Chronic"]);
    }

    #[test]
    fn node_and_ancestors_starts_with_the_node() {
        let ontology = disease_ontology();
        let closure = ontology.node_and_ancestors("COVID");
        assert_eq!(labels(&closure), vec!["COVID", "Respiratory", "Chronic"]);

        let top = ontology.node_and_ancestors("Diseases");
        assert_eq!(labels(&top), vec!["Diseases"]);
    }

    #[test]
    fn unknown_label_is_no_match() {
        let ontology = disease_ontology();
        assert!(ontology.node_by_label("Measles").is_none());
        assert!(ontology.ancestors_of(["Measles"]).is_empty());
        assert!(ontology.node_and_ancestors("Measles").is_empty());
    }

    #[test]
    fn unlabeled_node_is_tolerated() {
        let tables = OntologyTables::default()
            .with_subclass("x:1", "owl:Thing")
            .with_subclass("x:2", "x:1")
            .with_label("x:2", "Leaf");
        let ontology = Ontology::build(&tables, "owl:Thing");
        let node = ontology.node("x:1").unwrap();
        assert_eq!(node.label, None);
        assert_eq!(node.display_label(), "x:1");
        assert!(node.term().is_none());
        assert!(ontology.ancestors_of(["Leaf"]).is_empty());
    }

    #[test]
    fn cycles_are_detected_not_looped() {
        let tables = OntologyTables::default()
            .with_label("a", "A")
            .with_label("b", "B")
            .with_subclass("a", "root")
            .with_subclass("b", "a")
            .with_subclass("a", "b");
        let ontology = Ontology::build(&tables, "root");
        assert_eq!(ontology.len(), 3);
        assert!(ontology.has_cycles());
        assert!(matches!(ontology.validate(), Err(OntologyError::Cycle { .. })));
        assert!(disease_ontology().validate().is_ok());
    }

    #[test]
    fn ontology_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Ontology>();
    }
}
