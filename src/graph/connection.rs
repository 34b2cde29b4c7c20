//! Port-to-port connections.
//!
//! A connection is a directed edge along which image data will flow at
//! evaluation time. In the shipped topologies connections fall into two
//! groups: the primary chain (each node's "output" into the next node's
//! "input") and the aux edges feeding compositing nodes their secondary
//! layer. Both are ordinary `Connection` values; the distinction lives in
//! the port names.

use crate::core::error::{ConnectionId, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One end of a connection: a port on a specific node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// The node this endpoint sits on.
    pub node_id: NodeId,
    /// The port name ("input", "output", "aux").
    pub port_name: String,
}

impl Endpoint {
    /// Create an endpoint.
    pub fn new(node_id: NodeId, port_name: impl Into<String>) -> Self {
        Self {
            node_id,
            port_name: port_name.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node_id, self.port_name)
    }
}

/// A directed edge from an output port into an input port.
///
/// Established only through [`OpGraph::connect`](crate::graph::OpGraph::connect),
/// which enforces the port contracts; a `Connection` value that exists is
/// therefore always between a real output and a real, previously free input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique identifier for this connection.
    pub id: ConnectionId,
    /// Source endpoint (output port).
    pub from: Endpoint,
    /// Target endpoint (input port).
    pub to: Endpoint,
}

impl Connection {
    /// Create a connection between two endpoints.
    pub fn new(from: Endpoint, to: Endpoint) -> Self {
        Self {
            id: ConnectionId::new(),
            from,
            to,
        }
    }

    /// Whether this edge feeds a compositing node's secondary layer.
    pub fn is_aux(&self) -> bool {
        self.to.port_name == "aux"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_display() {
        let node_id = NodeId::new();
        let endpoint = Endpoint::new(node_id, "aux");

        assert_eq!(format!("{}", endpoint), format!("{}:aux", node_id));
    }

    #[test]
    fn test_primary_and_aux_edges() {
        let noise = NodeId::new();
        let over = NodeId::new();

        let primary = Connection::new(
            Endpoint::new(noise, "output"),
            Endpoint::new(over, "input"),
        );
        let aux = Connection::new(
            Endpoint::new(noise, "output"),
            Endpoint::new(over, "aux"),
        );

        assert!(!primary.is_aux());
        assert!(aux.is_aux());
        assert_eq!(aux.from.node_id, noise);
        assert_eq!(aux.to.port_name, "aux");
        assert_ne!(primary.id, aux.id);
    }
}
