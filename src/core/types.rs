//! Property value types that parameterize operation nodes.
//!
//! The type system uses an enum-based approach: the set of types a node
//! property can hold is closed (float, integer, color, seed), so exhaustive
//! matching catches missing cases at compile time and serde handles the
//! variants natively.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A property value stored on an operation node.
///
/// Values flow from the meta-operation's exposed surface into internal node
/// property maps through redirects. Image data never appears here; images
/// flow only along port connections at evaluation time, outside this crate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// 64-bit floating point number
    Float(f64),
    /// 64-bit signed integer
    Integer(i64),
    /// RGBA color value
    Color(Color),
    /// Random seed for noise-consuming operations
    Seed(u64),
}

/// RGBA color value, treated as opaque by this crate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    /// Create an opaque color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with explicit alpha.
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Declared type of a node property or exposed property.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Float,
    Integer,
    Color,
    Seed,
}

impl Value {
    /// Get the property type of this value.
    pub fn get_type(&self) -> PropertyType {
        match self {
            Value::Float(_) => PropertyType::Float,
            Value::Integer(_) => PropertyType::Integer,
            Value::Color(_) => PropertyType::Color,
            Value::Seed(_) => PropertyType::Seed,
        }
    }

    /// Try to get this value as a float.
    /// Integers are automatically converted to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a color.
    pub fn as_color(&self) -> Option<Color> {
        if let Value::Color(c) = self {
            Some(*c)
        } else {
            None
        }
    }

    /// Try to get this value as a seed.
    pub fn as_seed(&self) -> Option<u64> {
        if let Value::Seed(s) = self {
            Some(*s)
        } else {
            None
        }
    }

    /// Whether this value carries a numeric magnitude a range can apply to.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Float(_) | Value::Integer(_))
    }
}

impl PropertyType {
    /// Check whether a value is acceptable for this declared type.
    ///
    /// Integers coerce to floats; no other cross-type coercion exists.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (PropertyType::Float, Value::Float(_)) => true,
            (PropertyType::Float, Value::Integer(_)) => true,
            (PropertyType::Integer, Value::Integer(_)) => true,
            (PropertyType::Color, Value::Color(_)) => true,
            (PropertyType::Seed, Value::Seed(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::Float => write!(f, "float"),
            PropertyType::Integer => write!(f, "integer"),
            PropertyType::Color => write!(f, "color"),
            PropertyType::Seed => write!(f, "seed"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Color(c) => write!(f, "rgba({}, {}, {}, {})", c.r, c.g, c.b, c.a),
            Value::Seed(s) => write!(f, "seed({})", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_coerces_to_float() {
        assert!(PropertyType::Float.matches(&Value::Integer(3)));
        assert_eq!(Value::Integer(3).as_float(), Some(3.0));
    }

    #[test]
    fn test_no_other_coercion() {
        assert!(!PropertyType::Integer.matches(&Value::Float(3.0)));
        assert!(!PropertyType::Color.matches(&Value::Integer(0)));
        assert!(!PropertyType::Seed.matches(&Value::Integer(0)));
    }

    #[test]
    fn test_color_constants() {
        assert_eq!(Color::TRANSPARENT.a, 0);
        assert_eq!(Color::rgb(10, 20, 30).a, 255);
    }

    #[test]
    fn test_value_type() {
        assert_eq!(Value::Seed(42).get_type(), PropertyType::Seed);
        assert_eq!(Value::Float(1.0).get_type(), PropertyType::Float);
    }
}
