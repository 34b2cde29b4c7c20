//! Validation of assembled graphs.
//!
//! The validator runs after wiring and before the meta-operation is handed
//! to the caller; any violation aborts construction.

pub mod pipeline;
pub mod stages;

pub use pipeline::GraphValidator;
pub use stages::{
    CardinalityValidation, SchemaValidation, StructuralValidation, TopologyIssue,
    ValidationStage,
};
