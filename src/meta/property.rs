//! Exposed properties and property redirects.
//!
//! A meta-operation presents a small stable surface of named properties.
//! Actual state lives in the internal nodes: each exposed property is bound
//! to one or more (target node, target property) pairs, optionally through a
//! pure value transform when the exposed semantics or units differ from the
//! target's.

use crate::core::error::NodeId;
use crate::core::types::{PropertyType, Value};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Host-facing role hint for an exposed property.
///
/// Passed through unchanged to whatever UI or scripting layer drives the
/// meta-operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// This property determines the output extent.
    OutputExtent,
    /// This property is the primary color choice.
    ColorPrimary,
}

/// A property on the meta-operation's public surface.
///
/// Carries everything a host needs to render a control: declared type,
/// default, valid range, human label and description, unit and role hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExposedProperty {
    /// Name on the public surface (e.g. "std_dev").
    pub name: String,
    /// Declared type.
    pub property_type: PropertyType,
    /// Default value returned before any write.
    pub default_value: Value,
    /// Inclusive valid range for numeric types.
    pub range: Option<(f64, f64)>,
    /// Human-readable label.
    pub label: String,
    /// Description for tooltips and documentation.
    pub description: String,
    /// Unit hint (e.g. "degree", "pixel-distance").
    pub unit: Option<String>,
    /// Role hint for the host.
    pub role: Option<Role>,
}

impl ExposedProperty {
    /// Create a new exposed property.
    pub fn new(
        name: impl Into<String>,
        property_type: PropertyType,
        default_value: Value,
    ) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            property_type,
            default_value,
            range: None,
            description: String::new(),
            unit: None,
            role: None,
        }
    }

    /// Set the inclusive valid range.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Set the human-readable label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the unit hint.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Set the role hint.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Validate a candidate value against the declared type and range.
    pub fn validate(&self, value: &Value) -> Result<(), crate::core::error::PropertyError> {
        use crate::core::error::PropertyError;

        if !self.property_type.matches(value) {
            return Err(PropertyError::TypeMismatch {
                name: self.name.clone(),
                expected: self.property_type,
                got: value.get_type(),
            });
        }

        if let (Some((min, max)), Some(num)) = (self.range, value.as_float()) {
            // NaN compares false against both bounds; reject it explicitly
            if !(num >= min && num <= max) {
                return Err(PropertyError::OutOfRange {
                    name: self.name.clone(),
                    value: num,
                    min,
                    max,
                });
            }
        }

        Ok(())
    }
}

/// Pure value-to-value transform applied before forwarding to a target.
pub type PropertyTransform = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Binding from an exposed property to one internal node property.
///
/// One exposed name may carry several redirects (fan-out); each write is
/// forwarded to every bound target.
#[derive(Clone)]
pub struct PropertyRedirect {
    /// Name on the meta-operation's public surface.
    pub exposed_name: String,
    /// Destination node inside the graph.
    pub target_node: NodeId,
    /// Destination property name in the target kind's schema.
    pub target_property: String,
    /// Optional transform; identity when absent.
    /// The closure is skipped during serialization.
    pub transform: Option<PropertyTransform>,
}

impl PropertyRedirect {
    /// Create an identity redirect.
    pub fn new(
        exposed_name: impl Into<String>,
        target_node: NodeId,
        target_property: impl Into<String>,
    ) -> Self {
        Self {
            exposed_name: exposed_name.into(),
            target_node,
            target_property: target_property.into(),
            transform: None,
        }
    }

    /// Attach a transform.
    pub fn with_transform(mut self, transform: PropertyTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Apply the transform (identity when none) to an externally-set value.
    pub fn apply(&self, value: &Value) -> Value {
        match &self.transform {
            Some(f) => f(value),
            None => *value,
        }
    }
}

impl std::fmt::Debug for PropertyRedirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyRedirect")
            .field("exposed_name", &self.exposed_name)
            .field("target_node", &self.target_node)
            .field("target_property", &self.target_property)
            .field(
                "transform",
                &self.transform.as_ref().map(|_| "<closure>"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PropertyError;

    #[test]
    fn test_exposed_property_range() {
        let prop = ExposedProperty::new("scale", PropertyType::Float, Value::Float(0.10))
            .with_range(0.05, 0.19);

        assert!(prop.validate(&Value::Float(0.05)).is_ok());
        assert!(prop.validate(&Value::Float(0.19)).is_ok());
        assert!(matches!(
            prop.validate(&Value::Float(999.0)),
            Err(PropertyError::OutOfRange { .. })
        ));
        assert!(matches!(
            prop.validate(&Value::Float(f64::NAN)),
            Err(PropertyError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_exposed_property_type() {
        let prop = ExposedProperty::new("rank", PropertyType::Integer, Value::Integer(2));
        assert!(matches!(
            prop.validate(&Value::Float(2.0)),
            Err(PropertyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_identity_redirect() {
        let redirect = PropertyRedirect::new("scale", NodeId::new(), "scale");
        assert_eq!(redirect.apply(&Value::Float(0.1)), Value::Float(0.1));
    }

    #[test]
    fn test_transform_redirect() {
        let redirect = PropertyRedirect::new("azimuth", NodeId::new(), "azimuth")
            .with_transform(Arc::new(|v: &Value| {
                Value::Float(v.as_float().unwrap_or(0.0).to_radians())
            }));

        let out = redirect.apply(&Value::Float(180.0));
        let radians = out.as_float().unwrap();
        assert!((radians - std::f64::consts::PI).abs() < 1e-12);
    }
}
