use crate::error::{GraphError, Result};
use crate::types::EquationGraph;
use petgraph::graph::NodeIndex;
use petgraph::Direction;
use std::collections::{HashSet, VecDeque};

impl EquationGraph {
    /// Equations referenced by `node` (outgoing edges), in model order
    pub fn dependencies(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_sorted(node, Direction::Outgoing)
    }

    /// Equations referencing `node` (incoming edges), in model order
    pub fn dependents(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_sorted(node, Direction::Incoming)
    }

    fn neighbors_sorted(&self, node: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(node, direction).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Breadth-first walk from `node` following `direction`, up to
    /// `max_depth` hops. Returns (NodeIndex, distance) in discovery order;
    /// the start node is excluded even when a cycle leads back to it.
    pub fn related_nodes(
        &self,
        node: NodeIndex,
        max_depth: usize,
        direction: Direction,
    ) -> Vec<(NodeIndex, usize)> {
        let mut visited = HashSet::new();
        let mut result = Vec::new();
        let mut queue = VecDeque::from([(node, 0usize)]);
        visited.insert(node);

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for next in self.neighbors_sorted(current, direction) {
                if visited.insert(next) {
                    result.push((next, depth + 1));
                    queue.push_back((next, depth + 1));
                }
            }
        }

        result
    }

    /// Names of every equation reachable from `name` within `max_depth`
    /// hops in either direction
    pub fn neighborhood(&self, name: &str, max_depth: usize) -> Result<Vec<String>> {
        let node = self
            .find_node(name)
            .ok_or_else(|| GraphError::EquationNotFound(name.to_string()))?;

        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for direction in [Direction::Outgoing, Direction::Incoming] {
            for (related, _distance) in self.related_nodes(node, max_depth, direction) {
                if seen.insert(related) {
                    names.push(self.name_of(related).to_string());
                }
            }
        }

        Ok(names)
    }
}
