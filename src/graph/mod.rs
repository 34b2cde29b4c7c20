//! Graph module: the node-and-connection data model of one meta-operation.
//!
//! An operation graph is a directed acyclic graph where nodes are instances
//! of primitive image operations and edges are the port connections image
//! data will flow along at evaluation time.

pub mod connection;
pub mod structure;
pub mod topology;

// Re-export commonly used types
pub use connection::{Connection, Endpoint};
pub use structure::{OpGraph, OpNode};
pub use topology::TopologyAnalyzer;
