//! Error types for polygen.
//!
//! Uses thiserror for structured errors with context. Errors split along two
//! failure classes:
//! - construction-time errors ([`BuildError`]) are fatal for the attempt and
//!   leave no partially-built meta-operation behind;
//! - property-write errors ([`PropertyError`]) reject a single call and leave
//!   all prior state unchanged.

use crate::core::types::PropertyType;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a node ID from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Unique identifier for a connection in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Top-level error type for polygen.
#[derive(Error, Debug)]
pub enum PolygenError {
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors from the exposed-property / redirect layer.
///
/// Declaration and binding errors occur while assembling a meta-operation;
/// `TypeMismatch` and `OutOfRange` also occur on individual property writes,
/// where they reject that one write without destabilizing the instance.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PropertyError {
    #[error("Property '{0}' is already declared")]
    DuplicateProperty(String),

    #[error("Property '{0}' is not declared")]
    UnknownProperty(String),

    #[error("Property '{0}' has no redirect target")]
    UnboundProperty(String),

    #[error("Redirect target not found: {reason}")]
    UnknownTarget { reason: String },

    #[error("Type mismatch for '{name}': expected {expected}, got {got}")]
    TypeMismatch {
        name: String,
        expected: PropertyType,
        got: PropertyType,
    },

    #[error("Value {value} for '{name}' is out of range [{min}, {max}]")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Errors related to graph structure and connection establishment.
///
/// These are the structural details behind a rejected connection; the builder
/// surfaces them to callers as [`BuildError::ConnectionRejected`].
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Connection {0} not found")]
    ConnectionNotFound(ConnectionId),

    #[error("Port '{port}' not found on node {node_id}")]
    PortNotFound { node_id: NodeId, port: String },

    #[error("Port '{port}' on node {node_id} is not an {expected} port")]
    WrongPortDirection {
        node_id: NodeId,
        port: String,
        expected: String,
    },

    #[error("Input port '{port}' on node {node_id} is already connected")]
    PortAlreadyConnected { node_id: NodeId, port: String },

    #[error("Connection would create a cycle involving nodes: {nodes:?}")]
    CycleDetected { nodes: Vec<NodeId> },
}

/// Errors during meta-operation construction.
///
/// All of these are unrecoverable for the current build attempt: the caller
/// must fix the variant definition or the registry and rebuild from scratch.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum BuildError {
    #[error("Unknown operation kind '{0}'")]
    UnknownOperationKind(String),

    #[error("Failed to create node of kind '{kind}': {reason}")]
    NodeCreationFailed { kind: String, reason: String },

    #[error("Connection rejected: {0}")]
    ConnectionRejected(#[from] GraphError),

    #[error("Invalid topology: {issues:?}")]
    InvalidTopology { issues: Vec<String> },

    #[error("Redirect table error: {0}")]
    Property(#[from] PropertyError),
}

/// Result type alias for polygen operations.
pub type PolygenResult<T> = Result<T, PolygenError>;

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type alias for property operations.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Result type alias for construction.
pub type BuildResult<T> = Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        let id = NodeId::new();
        let display = format!("{}", id);
        assert_eq!(display.len(), 8);
    }

    #[test]
    fn test_graph_error_converts_to_build_error() {
        let err = GraphError::PortAlreadyConnected {
            node_id: NodeId::new(),
            port: "input".to_string(),
        };
        let build: BuildError = err.into();
        assert!(matches!(build, BuildError::ConnectionRejected(_)));
    }

    #[test]
    fn test_out_of_range_message_names_bounds() {
        let err = PropertyError::OutOfRange {
            name: "scale".to_string(),
            value: 999.0,
            min: 0.05,
            max: 0.19,
        };
        let msg = err.to_string();
        assert!(msg.contains("scale"));
        assert!(msg.contains("0.05"));
        assert!(msg.contains("0.19"));
    }
}
