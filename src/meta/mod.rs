//! Meta-operation assembly: exposed surface, redirects, variants, builder.

pub mod builder;
pub mod operation;
pub mod property;
pub mod variant;

pub use builder::MetaOperationBuilder;
pub use operation::MetaOperation;
pub use property::{ExposedProperty, PropertyRedirect, PropertyTransform, Role};
pub use variant::Variant;
