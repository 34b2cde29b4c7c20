//! Core types for the polygen composition engine.
//!
//! This module contains the foundational pieces shared by the graph and the
//! exposed-property layer:
//! - Property value types (Float, Integer, Color, Seed)
//! - Operation schemas (ports and property definitions)
//! - Error types and id newtypes

pub mod error;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use error::{
    BuildError, ConnectionId, GraphError, NodeId, PolygenError, PropertyError,
};
pub use schema::{OperationSchema, PortDefinition, PortDirection, PropertyDefinition};
pub use types::{Color, PropertyType, Value};
