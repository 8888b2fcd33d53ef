//! Hierarchical count aggregation.
//!
//! A [`Taxonomy`] hangs every parentless node under a synthetic [`ROOT_LABEL`]
//! node at depth -1 and assigns each other node `1 + max(parent depth)`.
//! An [`AggregationPass`] attaches record markers to nodes and counts the
//! distinct markers in each node's subtree, merging each subtree once.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use radx_core::entities::{AggregationEntry, Classifier, Term};
use rustworkx_core::petgraph::Direction;
use rustworkx_core::petgraph::graph::{DiGraph, NodeIndex};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::OntologyError;
use crate::graph::Ontology;

/// Label of the synthetic super-root.
pub const ROOT_LABEL: &str = "Total";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyNode {
    /// Identity of the node within its taxonomy. Equal to the label for
    /// group hierarchies, the ontology id for ontology taxonomies.
    pub key: String,
    pub label: String,
    pub coded: bool,
    pub url: Option<String>,
    pub depth: i32,
}

/// One flattened row of an aggregated taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HierarchyRow {
    /// -1 for the synthetic root, 0 for top-level nodes.
    pub depth: i32,
    #[serde(flatten)]
    pub entry: AggregationEntry,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct PendingNode {
    key: String,
    label: Option<String>,
    coded: bool,
    url: Option<String>,
}

/// Collects nodes and parent -> child edges before levelization.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyBuilder {
    name: String,
    nodes: Vec<PendingNode>,
    edges: Vec<(String, String)>,
}

impl TaxonomyBuilder {
    /// Node keyed by its own label.
    #[must_use]
    pub fn node(self, label: impl Into<String>, coded: bool, url: Option<String>) -> Self {
        let label = label.into();
        self.keyed(label.clone(), Some(label), coded, url)
    }

    /// Node identified by `key`, displayed as `label` or, without one, as
    /// its key. Edges refer to nodes by key.
    #[must_use]
    pub fn keyed(
        mut self,
        key: impl Into<String>,
        label: Option<String>,
        coded: bool,
        url: Option<String>,
    ) -> Self {
        self.nodes.push(PendingNode {
            key: key.into(),
            label,
            coded,
            url,
        });
        self
    }

    #[must_use]
    pub fn term(self, term: &Term) -> Self {
        self.node(&term.label, term.coded, term.url.clone())
    }

    /// Uncoded structural node.
    #[must_use]
    pub fn group(self, label: impl Into<String>) -> Self {
        self.node(label, false, None)
    }

    #[must_use]
    pub fn edge(mut self, parent: impl Into<String>, child: impl Into<String>) -> Self {
        self.edges.push((parent.into(), child.into()));
        self
    }

    /// Connect nodes and assign depths.
    ///
    /// A key declared twice is one node, coded if either declaration is.
    /// Edges naming an undeclared key create an uncoded node for it.
    /// Label lookups resolve to the first node declared with that label;
    /// a node without a label answers to its key only if no labeled node
    /// claims it.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::UnresolvedDepth`] if the edges form a cycle.
    pub fn build(self) -> Result<Taxonomy, OntologyError> {
        let mut graph = DiGraph::new();
        let root = graph.add_node(TaxonomyNode {
            key: ROOT_LABEL.to_string(),
            label: ROOT_LABEL.to_string(),
            coded: false,
            url: None,
            depth: -1,
        });
        // whether each node carries a declared label, by node index
        let mut labeled = vec![false];
        let mut key_to_index: HashMap<String, NodeIndex> = HashMap::new();

        for pending in self.nodes {
            if let Some(&index) = key_to_index.get(&pending.key) {
                let node: &mut TaxonomyNode = &mut graph[index];
                node.coded |= pending.coded;
                if node.url.is_none() {
                    node.url = pending.url;
                }
                if !labeled[index.index()] {
                    if let Some(label) = pending.label {
                        node.label = label;
                        labeled[index.index()] = true;
                    }
                }
                continue;
            }
            labeled.push(pending.label.is_some());
            let index = graph.add_node(TaxonomyNode {
                label: pending.label.unwrap_or_else(|| pending.key.clone()),
                key: pending.key.clone(),
                coded: pending.coded,
                url: pending.url,
                depth: 0,
            });
            key_to_index.insert(pending.key, index);
        }

        for (parent, child) in self.edges {
            let mut resolve = |key: String| {
                *key_to_index.entry(key).or_insert_with_key(|key| {
                    tracing::warn!(
                        taxonomy = %self.name,
                        key = %key,
                        "edge names an undeclared node; adding it uncoded"
                    );
                    labeled.push(true);
                    graph.add_node(TaxonomyNode {
                        key: key.clone(),
                        label: key.clone(),
                        coded: false,
                        url: None,
                        depth: 0,
                    })
                })
            };
            let parent = resolve(parent);
            let child = resolve(child);
            if !graph.contains_edge(parent, child) {
                graph.add_edge(parent, child, ());
            }
        }

        let top_level: Vec<NodeIndex> = graph
            .node_indices()
            .filter(|&index| index != root)
            .filter(|&index| {
                graph
                    .neighbors_directed(index, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();
        for index in top_level {
            graph.add_edge(root, index, ());
        }

        let mut label_to_index: HashMap<String, NodeIndex> = HashMap::new();
        for index in graph.node_indices().filter(|index| labeled[index.index()]) {
            let label = &graph[index].label;
            if label_to_index.contains_key(label) {
                tracing::debug!(
                    taxonomy = %self.name,
                    label = %label,
                    key = %graph[index].key,
                    "label already taken; reachable by key only"
                );
            } else {
                label_to_index.insert(label.clone(), index);
            }
        }
        for index in graph.node_indices() {
            if index != root && !labeled[index.index()] {
                label_to_index
                    .entry(graph[index].label.clone())
                    .or_insert(index);
            }
        }

        let mut taxonomy = Taxonomy {
            name: self.name,
            graph,
            key_to_index,
            label_to_index,
            root,
        };
        taxonomy.assign_depths()?;
        tracing::debug!(
            taxonomy = %taxonomy.name,
            nodes = taxonomy.len(),
            "levelized taxonomy"
        );
        Ok(taxonomy)
    }
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// Levelized DAG under a synthetic root. Immutable once built.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    name: String,
    graph: DiGraph<TaxonomyNode, ()>,
    key_to_index: HashMap<String, NodeIndex>,
    label_to_index: HashMap<String, NodeIndex>,
    root: NodeIndex,
}

impl Taxonomy {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> TaxonomyBuilder {
        TaxonomyBuilder {
            name: name.into(),
            ..TaxonomyBuilder::default()
        }
    }

    /// Display hierarchy of a classifier: its groups, then its terms and
    /// sentinel. Terms outside every group are top-level.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::UnresolvedDepth`] if groups nest cyclically.
    pub fn from_groups(classifier: &Classifier) -> Result<Self, OntologyError> {
        let mut builder = Self::builder(&classifier.name);
        for group in &classifier.groups {
            builder = builder.group(&group.label);
        }
        for term in classifier.all_terms() {
            builder = builder.term(term);
        }
        for group in &classifier.groups {
            for member in &group.members {
                builder = builder.edge(&group.label, member);
            }
        }
        builder.build()
    }

    /// Every ontology node below the ontology root, keyed by ontology id.
    /// The root's children become top-level nodes. Label lookups follow
    /// [`Ontology::node_by_label`], so nodes sharing a label stay distinct
    /// and the first one discovered answers to it.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::UnresolvedDepth`] if the ontology has a cycle.
    pub fn from_ontology(ontology: &Ontology) -> Result<Self, OntologyError> {
        let root_id = &ontology.root().id;
        let mut builder = Self::builder(ontology.root().display_label());
        for node in ontology.nodes().filter(|node| &node.id != root_id) {
            builder = builder.keyed(&node.id, node.label.clone(), node.coded, None);
        }
        for (parent, child) in ontology.edges() {
            if &parent.id != root_id {
                builder = builder.edge(&parent.id, &child.id);
            }
        }
        builder.build()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn root(&self) -> &TaxonomyNode {
        &self.graph[self.root]
    }

    /// Number of nodes, excluding the synthetic root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count() - 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lookup by label. [`ROOT_LABEL`] resolves to the synthetic root unless
    /// a declared node carries that label.
    #[must_use]
    pub fn node(&self, label: &str) -> Option<&TaxonomyNode> {
        self.index_of(label).map(|index| &self.graph[index])
    }

    #[must_use]
    pub fn node_by_key(&self, key: &str) -> Option<&TaxonomyNode> {
        self.key_to_index.get(key).map(|index| &self.graph[*index])
    }

    #[must_use]
    pub fn depth(&self, label: &str) -> Option<i32> {
        self.node(label).map(|node| node.depth)
    }

    /// Parents in edge order. Top-level nodes report the synthetic root.
    #[must_use]
    pub fn parents_of(&self, label: &str) -> Vec<&TaxonomyNode> {
        self.related(label, Direction::Incoming)
    }

    #[must_use]
    pub fn children_of(&self, label: &str) -> Vec<&TaxonomyNode> {
        self.related(label, Direction::Outgoing)
    }

    /// Start a fresh aggregation pass with no markers attached.
    #[must_use]
    pub fn pass(&self) -> AggregationPass<'_> {
        AggregationPass::new(self)
    }

    fn related(&self, label: &str, direction: Direction) -> Vec<&TaxonomyNode> {
        self.index_of(label)
            .map(|index| self.neighbors(index, direction))
            .unwrap_or_default()
            .into_iter()
            .map(|index| &self.graph[index])
            .collect()
    }

    fn index_of(&self, label: &str) -> Option<NodeIndex> {
        self.label_to_index
            .get(label)
            .copied()
            .or_else(|| (label == ROOT_LABEL).then_some(self.root))
    }

    fn neighbors(&self, index: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> =
            self.graph.neighbors_directed(index, direction).collect();
        neighbors.reverse();
        neighbors
    }

    /// Kahn-style levelization: a node is finalized once every incoming
    /// edge has been satisfied, at one deeper than its deepest parent.
    fn assign_depths(&mut self) -> Result<(), OntologyError> {
        let node_count = self.graph.node_count();
        let mut satisfied = vec![0_usize; node_count];
        let mut finalized = vec![false; node_count];
        finalized[self.root.index()] = true;

        let mut frontier = VecDeque::from([self.root]);
        while let Some(node) = frontier.pop_front() {
            for child in self.neighbors(node, Direction::Outgoing) {
                satisfied[child.index()] += 1;
                let parents = self.neighbors(child, Direction::Incoming);
                if satisfied[child.index()] != parents.len() {
                    continue;
                }
                let deepest = parents
                    .iter()
                    .map(|parent| self.graph[*parent].depth)
                    .max()
                    .unwrap_or(-1);
                self.graph[child].depth = deepest + 1;
                finalized[child.index()] = true;
                frontier.push_back(child);
            }
        }

        let unresolved: Vec<String> = self
            .graph
            .node_indices()
            .filter(|index| !finalized[index.index()])
            .map(|index| self.graph[index].label.clone())
            .collect();
        if unresolved.is_empty() {
            Ok(())
        } else {
            Err(OntologyError::UnresolvedDepth { nodes: unresolved })
        }
    }
}

// ---------------------------------------------------------------------------
// AggregationPass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Computing,
    Cached,
}

/// One counting pass over a [`Taxonomy`].
///
/// Markers are interned in the order they are first attached. Each node's
/// subtree closure is merged at most once and cached for the rest of the
/// pass; attaching more markers clears the cache.
#[derive(Debug)]
pub struct AggregationPass<'t> {
    taxonomy: &'t Taxonomy,
    markers: Vec<String>,
    marker_ids: HashMap<String, usize>,
    own: Vec<BTreeSet<usize>>,
    closure: Vec<BTreeSet<usize>>,
    state: Vec<VisitState>,
}

impl<'t> AggregationPass<'t> {
    fn new(taxonomy: &'t Taxonomy) -> Self {
        let node_count = taxonomy.graph.node_count();
        Self {
            taxonomy,
            markers: Vec::new(),
            marker_ids: HashMap::new(),
            own: vec![BTreeSet::new(); node_count],
            closure: vec![BTreeSet::new(); node_count],
            state: vec![VisitState::Unvisited; node_count],
        }
    }

    /// Attach markers directly to the node labeled `label`.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::UnknownNode`] if the taxonomy has no such node.
    pub fn mark<I, S>(&mut self, label: &str, markers: I) -> Result<(), OntologyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let index = self.resolve(label)?;
        for marker in markers {
            let marker = marker.as_ref();
            let id = match self.marker_ids.get(marker) {
                Some(id) => *id,
                None => {
                    let id = self.markers.len();
                    self.markers.push(marker.to_string());
                    self.marker_ids.insert(marker.to_string(), id);
                    id
                }
            };
            self.own[index.index()].insert(id);
        }
        self.state.fill(VisitState::Unvisited);
        Ok(())
    }

    /// Distinct markers on `label` or any descendant.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::UnknownNode`] for an unknown label and
    /// [`OntologyError::Cycle`] if the subtree loops back on itself.
    pub fn count(&mut self, label: &str) -> Result<usize, OntologyError> {
        let index = self.resolve(label)?;
        self.merge_subtree(index)?;
        Ok(self.closure[index.index()].len())
    }

    /// Markers counted by [`Self::count`], in first-attached order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::count`].
    pub fn markers(&mut self, label: &str) -> Result<Vec<&str>, OntologyError> {
        let index = self.resolve(label)?;
        self.merge_subtree(index)?;
        Ok(self.marker_labels(index))
    }

    /// Merge every subtree, starting from the synthetic root.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::Cycle`] on re-entry into a node being merged.
    pub fn aggregate(&mut self) -> Result<(), OntologyError> {
        self.merge_subtree(self.taxonomy.root)
    }

    /// Aggregate, then flatten breadth-first from the synthetic root. A node
    /// reachable through several parents appears once, at first discovery.
    /// Percentages are relative to `total`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::aggregate`].
    pub fn rows(&mut self, total: usize) -> Result<Vec<HierarchyRow>, OntologyError> {
        self.aggregate()?;

        let mut rows = Vec::with_capacity(self.taxonomy.graph.node_count());
        let mut seen = HashSet::from([self.taxonomy.root]);
        let mut frontier = VecDeque::from([self.taxonomy.root]);
        while let Some(index) = frontier.pop_front() {
            let node = &self.taxonomy.graph[index];
            let record_ids = self
                .marker_labels(index)
                .into_iter()
                .map(str::to_string)
                .collect();
            rows.push(HierarchyRow {
                depth: node.depth,
                entry: AggregationEntry::new(
                    &node.label,
                    node.coded,
                    node.url.clone(),
                    record_ids,
                    total,
                ),
            });
            for child in self.taxonomy.neighbors(index, Direction::Outgoing) {
                if seen.insert(child) {
                    frontier.push_back(child);
                }
            }
        }
        Ok(rows)
    }

    fn resolve(&self, label: &str) -> Result<NodeIndex, OntologyError> {
        self.taxonomy
            .index_of(label)
            .ok_or_else(|| OntologyError::UnknownNode(label.to_string()))
    }

    fn marker_labels(&self, index: NodeIndex) -> Vec<&str> {
        self.closure[index.index()]
            .iter()
            .map(|id| self.markers[*id].as_str())
            .collect()
    }

    /// Post-order merge of a node's own markers with its children's
    /// closures. Explicit stack; a node met again while still computing
    /// means a cycle.
    fn merge_subtree(&mut self, start: NodeIndex) -> Result<(), OntologyError> {
        let mut stack = vec![(start, false)];
        while let Some((node, children_done)) = stack.pop() {
            let slot = node.index();
            if children_done {
                let mut merged = self.own[slot].clone();
                for child in self.taxonomy.neighbors(node, Direction::Outgoing) {
                    merged.extend(self.closure[child.index()].iter().copied());
                }
                self.closure[slot] = merged;
                self.state[slot] = VisitState::Cached;
                continue;
            }
            match self.state[slot] {
                VisitState::Cached => {}
                VisitState::Computing => {
                    return Err(OntologyError::Cycle {
                        node: self.taxonomy.graph[node].label.clone(),
                    });
                }
                VisitState::Unvisited => {
                    self.state[slot] = VisitState::Computing;
                    stack.push((node, true));
                    for child in self.taxonomy.neighbors(node, Direction::Outgoing) {
                        stack.push((child, false));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use radx_core::entities::TermGroup;

    use super::*;

    fn muppets() -> Taxonomy {
        Taxonomy::builder("Made-up Taxonomy")
            .group("Puppets")
            .group("Muppets")
            .group("Television Shows")
            .group("Comedy Shows")
            .edge("Puppets", "Muppets")
            .edge("Television Shows", "Comedy Shows")
            .edge("Comedy Shows", "Muppets")
            .build()
            .unwrap()
    }

    #[test]
    fn depth_follows_the_deepest_parent() {
        let taxonomy = muppets();
        assert_eq!(taxonomy.root().depth, -1);
        assert_eq!(taxonomy.depth("Puppets"), Some(0));
        assert_eq!(taxonomy.depth("Television Shows"), Some(0));
        assert_eq!(taxonomy.depth("Comedy Shows"), Some(1));
        assert_eq!(taxonomy.depth("Muppets"), Some(2));
    }

    #[test]
    fn top_level_nodes_hang_from_the_root() {
        let taxonomy = muppets();
        let parents: Vec<&str> = taxonomy
            .parents_of("Puppets")
            .iter()
            .map(|n| n.label.as_str())
            .collect();
        assert_eq!(parents, vec![ROOT_LABEL]);
        assert_eq!(taxonomy.len(), 4);
    }

    #[test]
    fn counts_merge_descendant_markers() {
        let taxonomy = muppets();
        let mut pass = taxonomy.pass();
        pass.mark("Muppets", ["13", "14", "15"]).unwrap();
        pass.mark("Puppets", ["13", "16"]).unwrap();

        assert_eq!(pass.count("Muppets").unwrap(), 3);
        assert_eq!(pass.count("Puppets").unwrap(), 4);
        assert_eq!(pass.count("Television Shows").unwrap(), 3);
        assert_eq!(pass.count("Comedy Shows").unwrap(), 3);
        assert_eq!(pass.count(ROOT_LABEL).unwrap(), 4);
        assert_eq!(
            pass.markers("Puppets").unwrap(),
            vec!["13", "14", "15", "16"]
        );
    }

    #[test]
    fn marking_after_counting_refreshes_counts() {
        let taxonomy = muppets();
        let mut pass = taxonomy.pass();
        pass.mark("Muppets", ["1"]).unwrap();
        assert_eq!(pass.count("Television Shows").unwrap(), 1);
        pass.mark("Comedy Shows", ["2"]).unwrap();
        assert_eq!(pass.count("Television Shows").unwrap(), 2);
    }

    #[test]
    fn passes_do_not_share_markers() {
        let taxonomy = muppets();
        let mut first = taxonomy.pass();
        first.mark("Muppets", ["1"]).unwrap();
        assert_eq!(first.count("Puppets").unwrap(), 1);

        let mut second = taxonomy.pass();
        assert_eq!(second.count("Puppets").unwrap(), 0);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let taxonomy = muppets();
        let mut pass = taxonomy.pass();
        assert!(matches!(
            pass.mark("Fraggles", ["1"]),
            Err(OntologyError::UnknownNode(label)) if label == "Fraggles"
        ));
        assert!(pass.count("Fraggles").is_err());
    }

    #[test]
    fn cyclic_edges_fail_levelization() {
        let result = Taxonomy::builder("loop")
            .group("A")
            .group("B")
            .group("C")
            .edge("A", "B")
            .edge("B", "C")
            .edge("C", "B")
            .build();
        let Err(OntologyError::UnresolvedDepth { nodes }) = result else {
            panic!("expected unresolved depth");
        };
        assert_eq!(nodes, vec!["B".to_string(), "C".to_string()]);
    }

    #[test]
    fn merge_detects_reentry() {
        // Bypass levelization to exercise the pass-level guard directly.
        let mut graph = DiGraph::new();
        let node = |label: &str| TaxonomyNode {
            key: label.to_string(),
            label: label.to_string(),
            coded: true,
            url: None,
            depth: 0,
        };
        let root = graph.add_node(node(ROOT_LABEL));
        let a = graph.add_node(node("A"));
        let b = graph.add_node(node("B"));
        graph.add_edge(root, a, ());
        graph.add_edge(a, b, ());
        graph.add_edge(b, a, ());
        let taxonomy = Taxonomy {
            name: "broken".into(),
            graph,
            key_to_index: HashMap::from([("A".to_string(), a), ("B".to_string(), b)]),
            label_to_index: HashMap::from([("A".to_string(), a), ("B".to_string(), b)]),
            root,
        };

        let mut pass = taxonomy.pass();
        assert!(matches!(
            pass.aggregate(),
            Err(OntologyError::Cycle { .. })
        ));
    }

    #[test]
    fn undeclared_edge_endpoints_become_uncoded_nodes() {
        let taxonomy = Taxonomy::builder("t")
            .node("Leaf", true, None)
            .edge("Group", "Leaf")
            .build()
            .unwrap();
        assert!(!taxonomy.node("Group").unwrap().coded);
        assert_eq!(taxonomy.depth("Leaf"), Some(1));
    }

    #[test]
    fn groups_build_a_display_hierarchy() {
        let classifier = Classifier::new("Collection Method", Term::labeled("Unknown").uncoded())
            .with_terms([
                Term::labeled("Survey"),
                Term::labeled("Antigen Testing Device"),
            ])
            .with_groups([
                TermGroup::new("Diagnostic Devices", ["COVID-19 Testing Devices"]),
                TermGroup::new("COVID-19 Testing Devices", ["Antigen Testing Device"]),
            ]);
        let taxonomy = Taxonomy::from_groups(&classifier).unwrap();

        assert_eq!(taxonomy.depth("Diagnostic Devices"), Some(0));
        assert_eq!(taxonomy.depth("COVID-19 Testing Devices"), Some(1));
        assert_eq!(taxonomy.depth("Antigen Testing Device"), Some(2));
        assert_eq!(taxonomy.depth("Survey"), Some(0));
        assert_eq!(taxonomy.depth("Unknown"), Some(0));
        assert!(!taxonomy.node("Diagnostic Devices").unwrap().coded);
        assert!(taxonomy.node("Survey").unwrap().coded);
    }

    #[test]
    fn repeated_ontology_labels_stay_distinct_nodes() {
        use crate::tables::OntologyTables;

        let tables = OntologyTables::default()
            .with_label("t:1", "Testing")
            .with_label("t:2", "Testing")
            .with_label("t:3", "Screening")
            .with_label("t:4", "Screening")
            .with_subclass("t:1", "root")
            .with_subclass("t:2", "t:1")
            .with_subclass("t:3", "t:2")
            .with_subclass("t:4", "t:2");
        let ontology = Ontology::build(&tables, "root");
        ontology.validate().unwrap();

        let taxonomy = Taxonomy::from_ontology(&ontology).unwrap();
        assert_eq!(taxonomy.len(), 4);
        assert_eq!(taxonomy.depth("Testing"), Some(0));
        assert_eq!(taxonomy.node_by_key("t:2").unwrap().depth, 1);
        assert_eq!(taxonomy.node_by_key("t:2").unwrap().label, "Testing");

        // label lookups resolve to the same node the ontology picks
        let first_screening = ontology.node_by_label("Screening").unwrap();
        assert_eq!(
            taxonomy.node("Screening").unwrap().key,
            first_screening.id
        );

        let mut pass = taxonomy.pass();
        pass.mark("Screening", ["r1"]).unwrap();
        let rows = pass.rows(1).unwrap();
        let summary: Vec<(&str, i32, usize)> = rows
            .iter()
            .map(|row| (row.entry.label.as_str(), row.depth, row.entry.count))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ROOT_LABEL, -1, 1),
                ("Testing", 0, 1),
                ("Testing", 1, 1),
                ("Screening", 2, 1),
                ("Screening", 2, 0),
            ]
        );
    }

    #[test]
    fn unlabeled_id_does_not_shadow_a_label() {
        use crate::tables::OntologyTables;

        let tables = OntologyTables::default()
            .with_label("d:2", "Flu")
            .with_subclass("Flu", "root")
            .with_subclass("d:2", "root");
        let ontology = Ontology::build(&tables, "root");
        let taxonomy = Taxonomy::from_ontology(&ontology).unwrap();

        assert_eq!(taxonomy.len(), 2);
        assert_eq!(taxonomy.node("Flu").unwrap().key, "d:2");
        let unlabeled = taxonomy.node_by_key("Flu").unwrap();
        assert_eq!(unlabeled.label, "Flu");
        assert!(unlabeled.coded);
    }

    #[test]
    fn rows_flatten_breadth_first_with_percentages() {
        let taxonomy = muppets();
        let mut pass = taxonomy.pass();
        pass.mark("Muppets", ["13", "14", "15"]).unwrap();
        pass.mark("Puppets", ["13", "16"]).unwrap();

        let rows = pass.rows(8).unwrap();
        let summary: Vec<(&str, i32, usize)> = rows
            .iter()
            .map(|row| (row.entry.label.as_str(), row.depth, row.entry.count))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ROOT_LABEL, -1, 4),
                ("Puppets", 0, 4),
                ("Television Shows", 0, 3),
                ("Muppets", 2, 3),
                ("Comedy Shows", 1, 3),
            ]
        );
        assert!((rows[0].entry.percentage - 0.5).abs() < f64::EPSILON);
    }
}
