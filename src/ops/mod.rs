//! Operation registry and builtin operation schemas.

pub mod builtin;
pub mod registry;

pub use registry::OperationRegistry;
