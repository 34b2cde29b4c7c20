//! Operation schemas: the declared port and property surface of a kind.
//!
//! Every operation kind the registry knows has a schema listing its ports
//! (names + directions) and its properties (name, type, default, valid
//! range). Property writes and redirect bindings are checked against the
//! schema at binding time instead of failing silently at evaluation time.

use crate::core::types::{PropertyType, Value};
use serde::{Deserialize, Serialize};

/// Direction of a port (input or output).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

/// Definition of a node port.
///
/// Ports are the image attachment points of a node. The standard shape is
/// one "input" and one "output"; compositing kinds additionally expose an
/// "aux" input for their secondary layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortDefinition {
    /// Unique name within the node ("input", "output", "aux").
    pub name: String,
    /// Direction (input or output).
    pub direction: PortDirection,
    /// Whether the port may remain unconnected.
    pub optional: bool,
}

impl PortDefinition {
    /// Create a required input port.
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Input,
            optional: false,
        }
    }

    /// Create an output port.
    pub fn output(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Output,
            optional: false,
        }
    }

    /// Mark this port as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Definition of a node property.
///
/// Properties are configuration, not data flow: they are written through the
/// redirect layer (or directly at instantiation) and read by the external
/// evaluator, but never connected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyDefinition {
    /// Unique name within the kind (e.g. "std-dev").
    pub name: String,
    /// Declared type.
    pub property_type: PropertyType,
    /// Default value applied at node instantiation.
    pub default_value: Value,
    /// Inclusive valid range for numeric types.
    pub range: Option<(f64, f64)>,
    /// Description for documentation and host tooltips.
    pub description: String,
}

impl PropertyDefinition {
    /// Create a new property definition.
    pub fn new(name: impl Into<String>, property_type: PropertyType, default_value: Value) -> Self {
        Self {
            name: name.into(),
            property_type,
            default_value,
            range: None,
            description: String::new(),
        }
    }

    /// Set the inclusive valid range.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validate a value against this property's type and range.
    ///
    /// Boundary values are accepted; seed and color values are unranged.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if !self.property_type.matches(value) {
            return Err(format!(
                "Type mismatch for property '{}': expected {}, got {}",
                self.name,
                self.property_type,
                value.get_type()
            ));
        }

        if let (Some((min, max)), Some(num)) = (self.range, value.as_float()) {
            // NaN compares false against both bounds; reject it explicitly
            if !(num >= min && num <= max) {
                return Err(format!(
                    "Value {} for property '{}' is out of range [{}, {}]",
                    num, self.name, min, max
                ));
            }
        }

        Ok(())
    }
}

/// The declared interface of one operation kind.
///
/// Schemas are what the operation registry hands out: the composition engine
/// treats the pixel algorithm behind a kind as a black box and relies only on
/// the schema to wire ports and forward property values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationSchema {
    /// Kind identifier (e.g. "cell-noise").
    pub kind: String,
    /// Human-readable name.
    pub title: String,
    /// Detailed description.
    pub description: String,
    /// Port definitions.
    pub ports: Vec<PortDefinition>,
    /// Property definitions.
    pub properties: Vec<PropertyDefinition>,
}

impl OperationSchema {
    /// Create a new schema builder.
    pub fn builder(kind: impl Into<String>, title: impl Into<String>) -> OperationSchemaBuilder {
        OperationSchemaBuilder::new(kind, title)
    }

    /// Find a port by name.
    pub fn get_port(&self, name: &str) -> Option<&PortDefinition> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Find an input port by name.
    pub fn get_input(&self, name: &str) -> Option<&PortDefinition> {
        self.ports
            .iter()
            .find(|p| p.name == name && p.direction == PortDirection::Input)
    }

    /// Find an output port by name.
    pub fn get_output(&self, name: &str) -> Option<&PortDefinition> {
        self.ports
            .iter()
            .find(|p| p.name == name && p.direction == PortDirection::Output)
    }

    /// Find a property by name.
    pub fn get_property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Get all property names.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name.as_str()).collect()
    }

    /// Default property map for a fresh node of this kind.
    pub fn default_properties(&self) -> std::collections::HashMap<String, Value> {
        self.properties
            .iter()
            .map(|p| (p.name.clone(), p.default_value))
            .collect()
    }
}

/// Builder for OperationSchema.
pub struct OperationSchemaBuilder {
    kind: String,
    title: String,
    description: String,
    ports: Vec<PortDefinition>,
    properties: Vec<PropertyDefinition>,
}

impl OperationSchemaBuilder {
    /// Create a new builder with required fields.
    pub fn new(kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: title.into(),
            description: String::new(),
            ports: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a port.
    pub fn port(mut self, port: PortDefinition) -> Self {
        self.ports.push(port);
        self
    }

    /// Add a property.
    pub fn property(mut self, property: PropertyDefinition) -> Self {
        self.properties.push(property);
        self
    }

    /// Build the schema.
    pub fn build(self) -> OperationSchema {
        OperationSchema {
            kind: self.kind,
            title: self.title,
            description: self.description,
            ports: self.ports,
            properties: self.properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Color;

    fn test_schema() -> OperationSchema {
        OperationSchema::builder("cell-noise", "Cell Noise")
            .description("Generates a cellular noise pattern")
            .port(PortDefinition::input("input").optional())
            .port(PortDefinition::output("output"))
            .property(
                PropertyDefinition::new("scale", PropertyType::Float, Value::Float(1.0))
                    .with_range(0.0, 20.0),
            )
            .property(PropertyDefinition::new(
                "seed",
                PropertyType::Seed,
                Value::Seed(0),
            ))
            .build()
    }

    #[test]
    fn test_schema_lookup() {
        let schema = test_schema();
        assert!(schema.get_input("input").is_some());
        assert!(schema.get_output("output").is_some());
        assert!(schema.get_output("input").is_none());
        assert!(schema.get_property("scale").is_some());
        assert!(schema.get_property("missing").is_none());
    }

    #[test]
    fn test_property_range_validation() {
        let schema = test_schema();
        let scale = schema.get_property("scale").unwrap();

        assert!(scale.validate(&Value::Float(0.0)).is_ok());
        assert!(scale.validate(&Value::Float(20.0)).is_ok());
        assert!(scale.validate(&Value::Float(20.1)).is_err());
        assert!(scale.validate(&Value::Float(-0.1)).is_err());
        assert!(scale.validate(&Value::Float(f64::NAN)).is_err());
        assert!(scale.validate(&Value::Float(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_property_type_validation() {
        let schema = test_schema();
        let seed = schema.get_property("seed").unwrap();

        assert!(seed.validate(&Value::Seed(7)).is_ok());
        assert!(seed.validate(&Value::Integer(7)).is_err());
        assert!(seed.validate(&Value::Color(Color::TRANSPARENT)).is_err());
    }

    #[test]
    fn test_default_properties() {
        let schema = test_schema();
        let defaults = schema.default_properties();
        assert_eq!(defaults.get("scale"), Some(&Value::Float(1.0)));
        assert_eq!(defaults.get("seed"), Some(&Value::Seed(0)));
    }
}
