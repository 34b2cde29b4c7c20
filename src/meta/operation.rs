//! The built meta-operation instance.

use crate::core::error::{PropertyError, PropertyResult};
use crate::core::types::Value;
use crate::graph::structure::OpGraph;
use crate::meta::property::{ExposedProperty, PropertyRedirect};
use crate::meta::variant::Variant;
use indexmap::IndexMap;
use std::collections::HashMap;

/// A composite image-processing unit defined by an internal operation graph.
///
/// Holds the assembled graph, the declared exposed surface, and the redirect
/// table keeping both in sync. Every exposed-property write is validated,
/// transformed, and forwarded into the bound internal node properties as one
/// logical write; the external (pre-transform) value is what reads return.
///
/// The instance exclusively owns its graph: two instances built from the same
/// variant share no node ids and no mutable state.
#[derive(Debug)]
pub struct MetaOperation {
    variant: Option<Variant>,
    graph: OpGraph,
    exposed: IndexMap<String, ExposedProperty>,
    redirects: Vec<PropertyRedirect>,
    values: HashMap<String, Value>,
}

impl MetaOperation {
    pub(crate) fn new(
        variant: Option<Variant>,
        graph: OpGraph,
        exposed: IndexMap<String, ExposedProperty>,
        redirects: Vec<PropertyRedirect>,
    ) -> Self {
        Self {
            variant,
            graph,
            exposed,
            redirects,
            values: HashMap::new(),
        }
    }

    /// The variant this instance was built against, when built from a
    /// shipped topology.
    pub fn variant(&self) -> Option<Variant> {
        self.variant
    }

    /// Read-only view of the internal graph, for the external evaluator and
    /// for structural assertions.
    pub fn graph(&self) -> &OpGraph {
        &self.graph
    }

    /// The installed redirect table.
    pub fn redirects(&self) -> &[PropertyRedirect] {
        &self.redirects
    }

    /// The exposed configuration surface, in declaration order.
    ///
    /// Serializable descriptors for whatever host drives this instance.
    pub fn surface(&self) -> Vec<ExposedProperty> {
        self.exposed.values().cloned().collect()
    }

    /// Write an exposed property.
    ///
    /// Validates the value against the declared type and range, then forwards
    /// the transformed value to every bound target. The fan-out is staged and
    /// committed as one logical write: a rejected value leaves all prior node
    /// state unchanged.
    pub fn set_property(&mut self, name: &str, value: Value) -> PropertyResult<()> {
        let def = self
            .exposed
            .get(name)
            .ok_or_else(|| PropertyError::UnknownProperty(name.to_string()))?;
        def.validate(&value)?;

        let mut staged = Vec::new();
        for redirect in self.redirects.iter().filter(|r| r.exposed_name == name) {
            let forwarded = redirect.apply(&value);

            let node = self
                .graph
                .get_node(redirect.target_node)
                .map_err(|e| PropertyError::UnknownTarget {
                    reason: e.to_string(),
                })?;
            let target_def = node
                .schema
                .get_property(&redirect.target_property)
                .ok_or_else(|| PropertyError::UnknownTarget {
                    reason: format!(
                        "kind '{}' has no property '{}'",
                        node.kind, redirect.target_property
                    ),
                })?;

            if !target_def.property_type.matches(&forwarded) {
                return Err(PropertyError::TypeMismatch {
                    name: redirect.target_property.clone(),
                    expected: target_def.property_type,
                    got: forwarded.get_type(),
                });
            }
            if let (Some((min, max)), Some(num)) = (target_def.range, forwarded.as_float()) {
                // NaN compares false against both bounds; reject it explicitly
                if !(num >= min && num <= max) {
                    return Err(PropertyError::OutOfRange {
                        name: redirect.target_property.clone(),
                        value: num,
                        min,
                        max,
                    });
                }
            }

            staged.push((
                redirect.target_node,
                redirect.target_property.clone(),
                forwarded,
            ));
        }

        for (node_id, property, forwarded) in staged {
            let node = self
                .graph
                .get_node_mut(node_id)
                .map_err(|e| PropertyError::UnknownTarget {
                    reason: e.to_string(),
                })?;
            node.properties.insert(property, forwarded);
        }

        log::trace!("set exposed property '{}' = {}", name, value);
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Read an exposed property: the last externally-set value, or the
    /// declared default if never set.
    pub fn get_property(&self, name: &str) -> PropertyResult<Value> {
        let def = self
            .exposed
            .get(name)
            .ok_or_else(|| PropertyError::UnknownProperty(name.to_string()))?;
        Ok(self.values.get(name).copied().unwrap_or(def.default_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PropertyError;
    use crate::core::types::Color;
    use crate::meta::builder::MetaOperationBuilder;
    use std::collections::HashMap;

    fn artistic() -> MetaOperation {
        MetaOperationBuilder::new()
            .build(Variant::Artistic, &HashMap::new())
            .unwrap()
    }

    #[test]
    fn test_get_before_set_returns_default() {
        let op = artistic();
        assert_eq!(op.get_property("scale").unwrap(), Value::Float(0.10));
        assert_eq!(op.get_property("depth").unwrap(), Value::Integer(20));
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut op = artistic();
        op.set_property("azimuth", Value::Float(145.0)).unwrap();
        assert_eq!(op.get_property("azimuth").unwrap(), Value::Float(145.0));
    }

    #[test]
    fn test_write_forwards_to_target_node() {
        let mut op = artistic();
        op.set_property("depth", Value::Integer(25)).unwrap();

        let emboss = op.graph().find_by_label("emboss").unwrap();
        assert_eq!(emboss.get_property("depth"), Some(Value::Integer(25)));
    }

    #[test]
    fn test_out_of_range_write_leaves_state_unchanged() {
        let mut op = artistic();

        let result = op.set_property("scale", Value::Float(999.0));
        assert!(matches!(result, Err(PropertyError::OutOfRange { .. })));

        // The exposed read still returns the prior value
        assert_eq!(op.get_property("scale").unwrap(), Value::Float(0.10));
        // And the bound node property was not touched
        let noise = op.graph().find_by_label("noise").unwrap();
        assert_eq!(noise.get_property("scale"), Some(Value::Float(0.10)));
    }

    #[test]
    fn test_boundary_values_accepted() {
        let mut op = artistic();
        op.set_property("std_dev", Value::Float(2.5)).unwrap();
        op.set_property("std_dev", Value::Float(7.0)).unwrap();
    }

    #[test]
    fn test_values_outside_boundaries_rejected() {
        let mut op = artistic();
        assert!(matches!(
            op.set_property("std_dev", Value::Float(1.5)),
            Err(PropertyError::OutOfRange { .. })
        ));
        assert!(matches!(
            op.set_property("std_dev", Value::Float(8.0)),
            Err(PropertyError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_nan_write_rejected() {
        let mut op = artistic();

        let result = op.set_property("scale", Value::Float(f64::NAN));
        assert!(matches!(result, Err(PropertyError::OutOfRange { .. })));

        // Node state stays at the prior value
        let noise = op.graph().find_by_label("noise").unwrap();
        assert_eq!(noise.get_property("scale"), Some(Value::Float(0.10)));
    }

    #[test]
    fn test_unknown_property_rejected() {
        let mut op = artistic();
        assert!(matches!(
            op.set_property("sparkle", Value::Float(1.0)),
            Err(PropertyError::UnknownProperty(_))
        ));
        assert!(matches!(
            op.get_property("sparkle"),
            Err(PropertyError::UnknownProperty(_))
        ));
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let mut op = artistic();
        assert!(matches!(
            op.set_property("value", Value::Float(1.0)),
            Err(PropertyError::TypeMismatch { .. })
        ));
        // Color writes go through
        op.set_property("value", Value::Color(Color::rgb(200, 40, 40)))
            .unwrap();
    }

    #[test]
    fn test_surface_order_and_content() {
        let op = artistic();
        let surface = op.surface();
        let names: Vec<&str> = surface.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["scale", "rank", "seed", "azimuth", "depth", "value", "std_dev", "strength"]
        );
    }
}
