use modeldoc_parser::Model;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Node in the reference graph: one equation of the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationNode {
    /// Canonical equation name
    pub name: String,

    /// Index of the region holding the equation
    pub region: usize,

    /// Position of the equation inside its region
    pub position: usize,
}

/// Edge in the reference graph: source text mentions the target's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Boundary-bound occurrences of the target name in the source text
    pub occurrences: usize,
}

/// Directed graph of textual references between equations.
///
/// Node indices follow model order (region order, then equation order), so
/// sorting by index reproduces the order of the model.
#[derive(Debug, Clone, Default)]
pub struct EquationGraph {
    /// Directed graph (referencing equation -> referenced equation)
    pub graph: DiGraph<EquationNode, Reference>,

    /// Equation name -> NodeIndex mapping for fast lookup
    pub name_index: HashMap<String, NodeIndex>,
}

impl EquationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add node to graph. The first node registered under a name stays the
    /// lookup target for that name.
    pub fn add_node(&mut self, node: EquationNode) -> NodeIndex {
        let name = node.name.clone();
        let idx = self.graph.add_node(node);

        if self.name_index.contains_key(&name) {
            log::warn!("Duplicate equation name '{name}', links keep pointing at the first definition");
        } else {
            self.name_index.insert(name, idx);
        }

        idx
    }

    /// Add edge between nodes
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, edge: Reference) {
        self.graph.add_edge(from, to, edge);
    }

    /// Find node by equation name
    pub fn find_node(&self, name: &str) -> Option<NodeIndex> {
        self.name_index.get(name).copied()
    }

    /// Get node data
    pub fn get_node(&self, idx: NodeIndex) -> Option<&EquationNode> {
        self.graph.node_weight(idx)
    }

    /// Name of the node, empty for an unknown index
    pub fn name_of(&self, idx: NodeIndex) -> &str {
        self.get_node(idx).map_or("", |node| node.name.as_str())
    }

    /// Get all nodes in model order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &EquationNode)> {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx).map(|node| (idx, node)))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Model whose equations carry links, together with the graph they came from
#[derive(Debug, Clone)]
pub struct LinkedModel {
    pub model: Model,
    pub graph: EquationGraph,
}
