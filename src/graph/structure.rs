//! Graph structure and node management.
//!
//! The OpGraph is the owned collection of operation nodes plus the directed
//! connections between their ports. Two distinguished proxy nodes represent
//! the meta-operation's external input and output; every other node sits on
//! the pipeline between them.

use crate::core::error::{ConnectionId, GraphError, GraphResult, NodeId};
use crate::core::schema::OperationSchema;
use crate::core::types::Value;
use crate::graph::connection::{Connection, Endpoint};
use indexmap::IndexMap;
use std::collections::HashMap;

/// A node instance in the graph.
///
/// Carries the kind's schema (cloned from the registry at instantiation) and
/// the current property values. Nodes are owned exclusively by their graph
/// and mutated only through property writes.
#[derive(Debug, Clone)]
pub struct OpNode {
    /// Unique identifier within the owning graph.
    pub id: NodeId,
    /// Operation kind identifier (e.g. "cell-noise").
    pub kind: String,
    /// Declared port/property surface of the kind.
    pub schema: OperationSchema,
    /// Current property values (seeded from schema defaults).
    pub properties: HashMap<String, Value>,
    /// Optional role label used by variant wiring ("noise", "over", ...).
    pub label: Option<String>,
}

impl OpNode {
    /// Create a node from a schema with its default property values.
    pub fn new(schema: OperationSchema) -> Self {
        Self {
            id: NodeId::new(),
            kind: schema.kind.clone(),
            properties: schema.default_properties(),
            schema,
            label: None,
        }
    }

    /// Set the role label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get a property value, falling back to the schema default.
    pub fn get_property(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.properties.get(name) {
            return Some(*value);
        }
        self.schema.get_property(name).map(|p| p.default_value)
    }

    /// Set a property value, validated against the kind's schema.
    pub fn set_property(&mut self, name: &str, value: Value) -> Result<(), String> {
        let def = self
            .schema
            .get_property(name)
            .ok_or_else(|| format!("Kind '{}' has no property '{}'", self.kind, name))?;
        def.validate(&value)?;
        self.properties.insert(name.to_string(), value);
        Ok(())
    }
}

/// The assembled operation graph of one meta-operation instance.
///
/// Uses IndexMap so node iteration follows instantiation order. Built once
/// at construction time and never restructured afterwards; only property
/// values change.
#[derive(Debug, Clone)]
pub struct OpGraph {
    /// All nodes, indexed by ID.
    nodes: IndexMap<NodeId, OpNode>,
    /// All connections.
    connections: Vec<Connection>,
    /// The node standing in for the external input image.
    input_proxy: NodeId,
    /// The node standing in for the external output image.
    output_proxy: NodeId,
}

impl OpGraph {
    /// Create a graph seeded with its input and output proxy nodes.
    pub fn new(input_proxy: OpNode, output_proxy: OpNode) -> Self {
        let input_id = input_proxy.id;
        let output_id = output_proxy.id;
        let mut nodes = IndexMap::new();
        nodes.insert(input_id, input_proxy);
        nodes.insert(output_id, output_proxy);
        Self {
            nodes,
            connections: Vec::new(),
            input_proxy: input_id,
            output_proxy: output_id,
        }
    }

    /// ID of the input proxy node.
    pub fn input_proxy(&self) -> NodeId {
        self.input_proxy
    }

    /// ID of the output proxy node.
    pub fn output_proxy(&self) -> NodeId {
        self.output_proxy
    }

    // ========================================================================
    // Node Management
    // ========================================================================

    /// Add a node to the graph and return its ID.
    pub fn add_node(&mut self, node: OpNode) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Get a reference to a node.
    pub fn get_node(&self, id: NodeId) -> GraphResult<&OpNode> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Get a mutable reference to a node.
    pub fn get_node_mut(&mut self, id: NodeId) -> GraphResult<&mut OpNode> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Check if a node exists.
    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Find a node by its role label.
    pub fn find_by_label(&self, label: &str) -> Option<&OpNode> {
        self.nodes
            .values()
            .find(|n| n.label.as_deref() == Some(label))
    }

    /// Get all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &OpNode> {
        self.nodes.values()
    }

    /// Get all node IDs.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ========================================================================
    // Connection Management
    // ========================================================================

    /// Create a connection from an output port to an input port.
    ///
    /// Enforces the port contracts at establishment time: both ports must
    /// exist with the right direction, an input port takes at most one
    /// incoming connection, and the edge must not close a cycle. Output
    /// ports fan out freely.
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_port: impl Into<String>,
        to_node: NodeId,
        to_port: impl Into<String>,
    ) -> GraphResult<ConnectionId> {
        let from_port = from_port.into();
        let to_port = to_port.into();

        let from_schema = &self.get_node(from_node)?.schema;
        if from_schema.get_output(&from_port).is_none() {
            return Err(if from_schema.get_port(&from_port).is_some() {
                GraphError::WrongPortDirection {
                    node_id: from_node,
                    port: from_port,
                    expected: "output".to_string(),
                }
            } else {
                GraphError::PortNotFound {
                    node_id: from_node,
                    port: from_port,
                }
            });
        }

        let to_schema = &self.get_node(to_node)?.schema;
        if to_schema.get_input(&to_port).is_none() {
            return Err(if to_schema.get_port(&to_port).is_some() {
                GraphError::WrongPortDirection {
                    node_id: to_node,
                    port: to_port,
                    expected: "input".to_string(),
                }
            } else {
                GraphError::PortNotFound {
                    node_id: to_node,
                    port: to_port,
                }
            });
        }

        if self.is_input_connected(to_node, &to_port) {
            return Err(GraphError::PortAlreadyConnected {
                node_id: to_node,
                port: to_port,
            });
        }

        if self.would_create_cycle(from_node, to_node) {
            return Err(GraphError::CycleDetected {
                nodes: vec![from_node, to_node],
            });
        }

        let connection = Connection::new(
            Endpoint::new(from_node, from_port),
            Endpoint::new(to_node, to_port),
        );
        let id = connection.id;
        log::trace!("connected {} -> {}", connection.from, connection.to);
        self.connections.push(connection);
        Ok(id)
    }

    /// Get all connections.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Get all connections from a node.
    pub fn connections_from(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(move |c| c.from.node_id == node_id)
    }

    /// Get all connections to a node.
    pub fn connections_to(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(move |c| c.to.node_id == node_id)
    }

    /// Get the connection feeding a specific input port, if any.
    pub fn incoming(&self, node_id: NodeId, port: &str) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.to.node_id == node_id && c.to.port_name == port)
    }

    /// Check if an input port is already connected.
    pub fn is_input_connected(&self, node_id: NodeId, port: &str) -> bool {
        self.incoming(node_id, port).is_some()
    }

    /// Get the number of connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    // ========================================================================
    // Graph Analysis
    // ========================================================================

    /// Check if connecting from_node to to_node would create a cycle.
    fn would_create_cycle(&self, from_node: NodeId, to_node: NodeId) -> bool {
        // If from_node is reachable from to_node, adding this edge closes a loop
        self.is_reachable(to_node, from_node)
    }

    /// Check if `target` is reachable from `start` following connections.
    pub fn is_reachable(&self, start: NodeId, target: NodeId) -> bool {
        if start == target {
            return true;
        }

        let mut visited = std::collections::HashSet::new();
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if current == target {
                return true;
            }

            if visited.insert(current) {
                for conn in self.connections_from(current) {
                    queue.push_back(conn.to.node_id);
                }
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::registry::OperationRegistry;

    fn test_graph() -> (OpGraph, OperationRegistry) {
        let registry = OperationRegistry::with_builtins();
        let input = registry.instantiate("input-proxy", &HashMap::new()).unwrap();
        let output = registry.instantiate("output-proxy", &HashMap::new()).unwrap();
        (OpGraph::new(input, output), registry)
    }

    #[test]
    fn test_proxies_present() {
        let (graph, _) = test_graph();
        assert_eq!(graph.node_count(), 2);
        assert!(graph.has_node(graph.input_proxy()));
        assert!(graph.has_node(graph.output_proxy()));
    }

    #[test]
    fn test_connect_primary() {
        let (mut graph, registry) = test_graph();
        let emboss = graph.add_node(
            registry.instantiate("emboss", &HashMap::new()).unwrap(),
        );

        graph
            .connect(graph.input_proxy(), "output", emboss, "input")
            .unwrap();
        graph
            .connect(emboss, "output", graph.output_proxy(), "input")
            .unwrap();
        assert_eq!(graph.connection_count(), 2);
    }

    #[test]
    fn test_input_port_single_incoming() {
        let (mut graph, registry) = test_graph();
        let emboss = graph.add_node(
            registry.instantiate("emboss", &HashMap::new()).unwrap(),
        );
        let noise = graph.add_node(
            registry.instantiate("cell-noise", &HashMap::new()).unwrap(),
        );

        graph
            .connect(graph.input_proxy(), "output", emboss, "input")
            .unwrap();
        let result = graph.connect(noise, "output", emboss, "input");
        assert!(matches!(
            result,
            Err(GraphError::PortAlreadyConnected { .. })
        ));
    }

    #[test]
    fn test_output_port_fans_out() {
        let (mut graph, registry) = test_graph();
        let noise = graph.add_node(
            registry.instantiate("cell-noise", &HashMap::new()).unwrap(),
        );
        let color = graph.add_node(
            registry.instantiate("color-fill", &HashMap::new()).unwrap(),
        );

        graph
            .connect(graph.input_proxy(), "output", noise, "input")
            .unwrap();
        graph
            .connect(graph.input_proxy(), "output", color, "input")
            .unwrap();
        assert_eq!(graph.connections_from(graph.input_proxy()).count(), 2);
    }

    #[test]
    fn test_cycle_rejected() {
        let (mut graph, registry) = test_graph();
        let a = graph.add_node(registry.instantiate("emboss", &HashMap::new()).unwrap());
        let b = graph.add_node(registry.instantiate("crop", &HashMap::new()).unwrap());

        graph.connect(a, "output", b, "input").unwrap();
        let result = graph.connect(b, "output", a, "input");
        assert!(matches!(result, Err(GraphError::CycleDetected { .. })));
    }

    #[test]
    fn test_wrong_direction_rejected() {
        let (mut graph, registry) = test_graph();
        let a = graph.add_node(registry.instantiate("emboss", &HashMap::new()).unwrap());
        let b = graph.add_node(registry.instantiate("crop", &HashMap::new()).unwrap());

        let result = graph.connect(a, "input", b, "input");
        assert!(matches!(
            result,
            Err(GraphError::WrongPortDirection { .. })
        ));
        let result = graph.connect(a, "output", b, "output");
        assert!(matches!(
            result,
            Err(GraphError::WrongPortDirection { .. })
        ));
    }

    #[test]
    fn test_node_property_schema_check() {
        let (_, registry) = test_graph();
        let mut noise = registry.instantiate("cell-noise", &HashMap::new()).unwrap();

        assert!(noise.set_property("rank", Value::Integer(2)).is_ok());
        assert!(noise.set_property("rank", Value::Float(2.0)).is_err());
        assert!(noise.set_property("no-such", Value::Integer(1)).is_err());
        assert_eq!(noise.get_property("rank"), Some(Value::Integer(2)));
    }
}
