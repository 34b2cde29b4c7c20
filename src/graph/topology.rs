//! Topological analysis of assembled graphs.
//!
//! Provides the algorithms the validator runs over a built pipeline:
//! - Topological sorting (cycle detection)
//! - Forward reachability from the input proxy

use crate::core::error::{GraphError, GraphResult, NodeId};
use crate::graph::structure::OpGraph;
use std::collections::{HashMap, HashSet, VecDeque};

/// Analyzer for graph topology.
pub struct TopologyAnalyzer<'a> {
    graph: &'a OpGraph,
}

impl<'a> TopologyAnalyzer<'a> {
    /// Create a new analyzer for the given graph.
    pub fn new(graph: &'a OpGraph) -> Self {
        Self { graph }
    }

    /// Get the topological sort order (Kahn's algorithm).
    ///
    /// Returns nodes in an order where producers come before consumers.
    pub fn topological_sort(&self) -> GraphResult<Vec<NodeId>> {
        let mut in_degree: HashMap<NodeId, usize> = HashMap::new();
        let mut adjacency: HashMap<NodeId, Vec<NodeId>> = HashMap::new();

        for node_id in self.graph.node_ids() {
            in_degree.insert(node_id, 0);
            adjacency.insert(node_id, Vec::new());
        }

        for conn in self.graph.connections() {
            adjacency
                .get_mut(&conn.from.node_id)
                .expect("connection references known node")
                .push(conn.to.node_id);
            *in_degree
                .get_mut(&conn.to.node_id)
                .expect("connection references known node") += 1;
        }

        let mut queue: VecDeque<NodeId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(&id, _)| id)
            .collect();

        let mut result = Vec::with_capacity(self.graph.node_count());

        while let Some(node) = queue.pop_front() {
            result.push(node);

            for &neighbor in &adjacency[&node] {
                let degree = in_degree
                    .get_mut(&neighbor)
                    .expect("neighbor is a known node");
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(neighbor);
                }
            }
        }

        // Nodes left with positive in-degree sit on a cycle
        if result.len() != self.graph.node_count() {
            let remaining: Vec<NodeId> = in_degree
                .iter()
                .filter(|(_, degree)| **degree > 0)
                .map(|(&id, _)| id)
                .collect();

            return Err(GraphError::CycleDetected { nodes: remaining });
        }

        Ok(result)
    }

    /// Check if the graph has any cycles.
    pub fn has_cycle(&self) -> bool {
        self.topological_sort().is_err()
    }

    /// All nodes reachable forward from the input proxy.
    pub fn reachable_from_input(&self) -> HashSet<NodeId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(self.graph.input_proxy());

        while let Some(current) = queue.pop_front() {
            if visited.insert(current) {
                for conn in self.graph.connections_from(current) {
                    queue.push_back(conn.to.node_id);
                }
            }
        }

        visited
    }

    /// Nodes not reachable from the input proxy (orphans / dead branches).
    pub fn orphan_nodes(&self) -> Vec<NodeId> {
        let reachable = self.reachable_from_input();
        self.graph
            .node_ids()
            .filter(|id| !reachable.contains(id))
            .collect()
    }

    /// Whether the pipeline is connected end-to-end.
    pub fn output_reachable(&self) -> bool {
        self.graph
            .is_reachable(self.graph.input_proxy(), self.graph.output_proxy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::registry::OperationRegistry;
    use std::collections::HashMap;

    fn chain_graph() -> OpGraph {
        let registry = OperationRegistry::with_builtins();
        let input = registry.instantiate("input-proxy", &HashMap::new()).unwrap();
        let output = registry.instantiate("output-proxy", &HashMap::new()).unwrap();
        let mut graph = OpGraph::new(input, output);

        let emboss = graph.add_node(registry.instantiate("emboss", &HashMap::new()).unwrap());
        let crop = graph.add_node(registry.instantiate("crop", &HashMap::new()).unwrap());

        graph
            .connect(graph.input_proxy(), "output", emboss, "input")
            .unwrap();
        graph.connect(emboss, "output", crop, "input").unwrap();
        graph
            .connect(crop, "output", graph.output_proxy(), "input")
            .unwrap();
        graph
    }

    #[test]
    fn test_topological_sort_order() {
        let graph = chain_graph();
        let analyzer = TopologyAnalyzer::new(&graph);
        let sorted = analyzer.topological_sort().unwrap();

        let pos_in = sorted
            .iter()
            .position(|&n| n == graph.input_proxy())
            .unwrap();
        let pos_out = sorted
            .iter()
            .position(|&n| n == graph.output_proxy())
            .unwrap();
        assert!(pos_in < pos_out);
        assert_eq!(sorted.len(), graph.node_count());
    }

    #[test]
    fn test_reachability() {
        let graph = chain_graph();
        let analyzer = TopologyAnalyzer::new(&graph);

        assert!(analyzer.output_reachable());
        assert!(analyzer.orphan_nodes().is_empty());
        assert_eq!(
            analyzer.reachable_from_input().len(),
            graph.node_count()
        );
    }

    #[test]
    fn test_orphan_detection() {
        let registry = OperationRegistry::with_builtins();
        let mut graph = chain_graph();

        // A noise node nothing feeds: not reachable from the input proxy
        let orphan = graph.add_node(
            registry.instantiate("cell-noise", &HashMap::new()).unwrap(),
        );

        let analyzer = TopologyAnalyzer::new(&graph);
        assert_eq!(analyzer.orphan_nodes(), vec![orphan]);
    }
}
