//! # Polygen - Declarative Polygon-Texture Meta-Operation
//!
//! Polygen assembles a fixed directed acyclic graph of image-processing
//! operations into a single composite unit with a small, stable configuration
//! surface. The crate covers composition only: node schemas, graph wiring,
//! topology validation, and the property-redirect layer that keeps the
//! exposed surface and the internal node state in sync. Pixel evaluation is
//! the job of whatever engine consumes the assembled graph.
//!
//! ## Features
//!
//! - **Schema-driven nodes**: Every operation kind declares its ports and
//!   typed, ranged properties up front
//! - **Checked wiring**: Port direction, single-incoming-edge and acyclicity
//!   are enforced when each connection is made
//! - **Two shipped topologies**: The artistic and simple pipeline variants,
//!   differing in node set, wiring and exposed defaults
//! - **Property redirects**: Exposed writes fan out to bound node properties
//!   atomically, optionally through a value transform
//! - **All-or-nothing construction**: A meta-operation either builds
//!   completely or fails with a specific error
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use polygen::prelude::*;
//! use std::collections::HashMap;
//!
//! // Build the artistic variant with default property values
//! let mut op = MetaOperationBuilder::new()
//!     .build(Variant::Artistic, &HashMap::new())?;
//!
//! // Drive the exposed surface
//! op.set_property("scale", Value::Float(0.15))?;
//! op.set_property("depth", Value::Integer(25))?;
//!
//! // Hand the assembled graph to an evaluator
//! let graph = op.graph();
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Value types, operation schemas, and error handling
//! - [`graph`]: Graph structure, connections, and topology analysis
//! - [`ops`]: Operation registry and the built-in operation kinds
//! - [`validation`]: Multi-stage graph validation
//! - [`meta`]: Exposed properties, redirects, variants, and the builder

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod graph;
pub mod meta;
pub mod ops;
pub mod validation;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use polygen::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{Color, PropertyType, Value};

    // Schemas
    pub use crate::core::schema::{
        OperationSchema, OperationSchemaBuilder, PortDefinition, PortDirection,
        PropertyDefinition,
    };

    // Errors
    pub use crate::core::error::{
        BuildError, ConnectionId, GraphError, NodeId, PolygenError, PropertyError,
    };

    // Graph
    pub use crate::graph::connection::{Connection, Endpoint};
    pub use crate::graph::structure::{OpGraph, OpNode};
    pub use crate::graph::topology::TopologyAnalyzer;

    // Operations
    pub use crate::ops::registry::OperationRegistry;

    // Validation
    pub use crate::validation::pipeline::GraphValidator;
    pub use crate::validation::stages::{
        CardinalityValidation, SchemaValidation, StructuralValidation, TopologyIssue,
        ValidationStage,
    };

    // Meta-operation
    pub use crate::meta::builder::MetaOperationBuilder;
    pub use crate::meta::operation::MetaOperation;
    pub use crate::meta::property::{ExposedProperty, PropertyRedirect, PropertyTransform, Role};
    pub use crate::meta::variant::Variant;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "polygen");
    }

    #[test]
    fn test_prelude_end_to_end() {
        let mut op = MetaOperationBuilder::new()
            .build(Variant::Simple, &HashMap::new())
            .unwrap();
        op.set_property("scale", Value::Float(0.12)).unwrap();
        assert_eq!(op.get_property("scale").unwrap(), Value::Float(0.12));
        assert_eq!(op.variant(), Some(Variant::Simple));
    }
}
