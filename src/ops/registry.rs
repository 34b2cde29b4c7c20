//! Operation registry: the capability boundary to the image-processing
//! collaborator.
//!
//! Given an operation kind name, the registry returns the declared port and
//! property schema for that primitive, and instantiates runtime nodes with
//! validated initial properties. The pixel algorithms behind each kind live
//! entirely outside this crate.

use crate::core::error::{BuildError, BuildResult};
use crate::core::schema::OperationSchema;
use crate::core::types::Value;
use crate::graph::structure::OpNode;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Registry of operation kinds available for graph assembly.
pub struct OperationRegistry {
    /// Schemas indexed by kind name.
    schemas: IndexMap<String, OperationSchema>,
}

impl OperationRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            schemas: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with the builtin operation kinds.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::ops::builtin::register_all(&mut registry);
        registry
    }

    /// Register an operation kind.
    pub fn register(&mut self, schema: OperationSchema) {
        log::debug!("registering operation kind '{}'", schema.kind);
        self.schemas.insert(schema.kind.clone(), schema);
    }

    /// Look up a kind's schema, failing for unregistered names.
    pub fn lookup(&self, kind: &str) -> BuildResult<&OperationSchema> {
        self.schemas
            .get(kind)
            .ok_or_else(|| BuildError::UnknownOperationKind(kind.to_string()))
    }

    /// Get a schema without an error path.
    pub fn get(&self, kind: &str) -> Option<&OperationSchema> {
        self.schemas.get(kind)
    }

    /// Check if a kind is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.schemas.contains_key(kind)
    }

    /// Get all registered kind names.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(|s| s.as_str())
    }

    /// Get all registered schemas.
    pub fn schemas(&self) -> impl Iterator<Item = &OperationSchema> {
        self.schemas.values()
    }

    /// Get the number of registered kinds.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Create a node of the given kind with schema defaults overridden by
    /// `initial` values.
    ///
    /// Unknown property names and values the schema rejects surface as
    /// [`BuildError::NodeCreationFailed`] and abort the whole construction.
    pub fn instantiate(
        &self,
        kind: &str,
        initial: &HashMap<String, Value>,
    ) -> BuildResult<OpNode> {
        let schema = self.lookup(kind)?;
        let mut node = OpNode::new(schema.clone());

        for (name, value) in initial {
            node.set_property(name, *value)
                .map_err(|reason| BuildError::NodeCreationFailed {
                    kind: kind.to_string(),
                    reason,
                })?;
        }

        Ok(node)
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PropertyType;

    #[test]
    fn test_builtins_registered() {
        let registry = OperationRegistry::with_builtins();
        for kind in [
            "input-proxy",
            "output-proxy",
            "cell-noise",
            "emboss",
            "over",
            "multiply",
            "color-fill",
            "color-overlay",
            "clip",
            "crop",
            "unsharp-mask",
        ] {
            assert!(registry.contains(kind), "missing builtin kind '{}'", kind);
        }
    }

    #[test]
    fn test_unknown_kind() {
        let registry = OperationRegistry::with_builtins();
        let result = registry.lookup("gaussian-smear");
        assert!(matches!(
            result,
            Err(BuildError::UnknownOperationKind(_))
        ));
    }

    #[test]
    fn test_instantiate_with_defaults() {
        let registry = OperationRegistry::with_builtins();
        let node = registry.instantiate("emboss", &HashMap::new()).unwrap();

        assert_eq!(node.kind, "emboss");
        assert!(node.get_property("azimuth").is_some());
        assert!(node.get_property("depth").is_some());
    }

    #[test]
    fn test_instantiate_with_overrides() {
        let registry = OperationRegistry::with_builtins();
        let mut initial = HashMap::new();
        initial.insert("rank".to_string(), Value::Integer(2));

        let node = registry.instantiate("cell-noise", &initial).unwrap();
        assert_eq!(node.get_property("rank"), Some(Value::Integer(2)));
    }

    #[test]
    fn test_instantiate_rejects_bad_property() {
        let registry = OperationRegistry::with_builtins();
        let mut initial = HashMap::new();
        initial.insert("rank".to_string(), Value::Integer(99));

        let result = registry.instantiate("cell-noise", &initial);
        assert!(matches!(
            result,
            Err(BuildError::NodeCreationFailed { .. })
        ));
    }

    #[test]
    fn test_schema_property_types() {
        let registry = OperationRegistry::with_builtins();
        let noise = registry.get("cell-noise").unwrap();

        assert_eq!(
            noise.get_property("seed").unwrap().property_type,
            PropertyType::Seed
        );
        assert_eq!(
            noise.get_property("scale").unwrap().property_type,
            PropertyType::Float
        );
    }
}
