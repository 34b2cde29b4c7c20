//! Individual validation stages.
//!
//! Each stage checks one category of topology invariants. Any issue found is
//! fatal at construction time: the variant definition itself is defective.

use crate::core::error::NodeId;
use crate::graph::structure::OpGraph;
use crate::graph::topology::TopologyAnalyzer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One invariant violation found in a built graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyIssue {
    /// Human-readable description of the violation.
    pub message: String,
    /// Node the issue concerns, if applicable.
    pub node_id: Option<NodeId>,
}

impl TopologyIssue {
    /// Create an issue tied to a node.
    pub fn for_node(node_id: NodeId, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            node_id: Some(node_id),
        }
    }

    /// Create a graph-wide issue.
    pub fn global(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            node_id: None,
        }
    }
}

impl fmt::Display for TopologyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node_id {
            Some(id) => write!(f, "{} (node {})", self.message, id),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Trait for validation stages.
pub trait ValidationStage: Send + Sync {
    /// Name of this validation stage.
    fn name(&self) -> &'static str;

    /// Check the graph, returning every violation found.
    fn validate(&self, graph: &OpGraph) -> Vec<TopologyIssue>;
}

/// Structural validation.
///
/// Verifies:
/// - The graph (proxies included) is acyclic
/// - The output proxy is reachable from the input proxy
/// - No node is orphaned (unreachable from the input proxy)
pub struct StructuralValidation;

impl ValidationStage for StructuralValidation {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn validate(&self, graph: &OpGraph) -> Vec<TopologyIssue> {
        let mut issues = Vec::new();
        let analyzer = TopologyAnalyzer::new(graph);

        if analyzer.has_cycle() {
            issues.push(TopologyIssue::global("graph contains a cycle"));
            // Reachability over a cyclic graph would mislead; stop here
            return issues;
        }

        if !analyzer.output_reachable() {
            issues.push(TopologyIssue::global(
                "output proxy is not reachable from the input proxy",
            ));
        }

        for node_id in analyzer.orphan_nodes() {
            let kind = graph
                .get_node(node_id)
                .map(|n| n.kind.clone())
                .unwrap_or_default();
            issues.push(TopologyIssue::for_node(
                node_id,
                format!("node of kind '{}' is not reachable from the input proxy", kind),
            ));
        }

        issues
    }
}

/// Cardinality validation.
///
/// Verifies each input port has at most one incoming connection. The connect
/// path already enforces this; validating the assembled connection set again
/// keeps the invariant independent of how the graph was put together.
pub struct CardinalityValidation;

impl ValidationStage for CardinalityValidation {
    fn name(&self) -> &'static str {
        "cardinality"
    }

    fn validate(&self, graph: &OpGraph) -> Vec<TopologyIssue> {
        let mut issues = Vec::new();
        let mut seen: HashSet<(NodeId, &str)> = HashSet::new();

        for conn in graph.connections() {
            if !seen.insert((conn.to.node_id, conn.to.port_name.as_str())) {
                issues.push(TopologyIssue::for_node(
                    conn.to.node_id,
                    format!(
                        "input port '{}' has more than one incoming connection",
                        conn.to.port_name
                    ),
                ));
            }
        }

        issues
    }
}

/// Schema validation.
///
/// Verifies every node's property map conforms to its kind's declared
/// schema: no stray property names, no values of the wrong type or outside
/// the primitive's own range.
pub struct SchemaValidation;

impl ValidationStage for SchemaValidation {
    fn name(&self) -> &'static str {
        "schema"
    }

    fn validate(&self, graph: &OpGraph) -> Vec<TopologyIssue> {
        let mut issues = Vec::new();

        for node in graph.nodes() {
            for (name, value) in &node.properties {
                match node.schema.get_property(name) {
                    None => issues.push(TopologyIssue::for_node(
                        node.id,
                        format!("kind '{}' declares no property '{}'", node.kind, name),
                    )),
                    Some(def) => {
                        if let Err(reason) = def.validate(value) {
                            issues.push(TopologyIssue::for_node(node.id, reason));
                        }
                    }
                }
            }
        }

        issues
    }
}
