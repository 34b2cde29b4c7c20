//! Builtin operation schemas.
//!
//! These describe the primitive operations the two shipped variants consume:
//! port names and directions plus property names, types, defaults and valid
//! ranges. The ranges here are the primitives' own limits; the narrower
//! ranges a meta-operation exposes sit on top of them.

use crate::core::schema::{OperationSchema, PortDefinition, PropertyDefinition};
use crate::core::types::{Color, PropertyType, Value};
use crate::ops::registry::OperationRegistry;

/// Register all builtin operation kinds.
pub fn register_all(registry: &mut OperationRegistry) {
    registry.register(input_proxy());
    registry.register(output_proxy());
    registry.register(cell_noise());
    registry.register(emboss());
    registry.register(over());
    registry.register(multiply());
    registry.register(color_fill());
    registry.register(color_overlay());
    registry.register(clip());
    registry.register(crop());
    registry.register(unsharp_mask());
}

/// Placeholder for the meta-operation's external input image.
fn input_proxy() -> OperationSchema {
    OperationSchema::builder("input-proxy", "Input Proxy")
        .description("Stands in for the meta-operation's external input")
        .port(PortDefinition::output("output"))
        .build()
}

/// Placeholder for the meta-operation's external output image.
fn output_proxy() -> OperationSchema {
    OperationSchema::builder("output-proxy", "Output Proxy")
        .description("Stands in for the meta-operation's external output")
        .port(PortDefinition::input("input"))
        .build()
}

fn cell_noise() -> OperationSchema {
    OperationSchema::builder("cell-noise", "Cell Noise")
        .description("Generates a cellular noise function")
        .port(PortDefinition::input("input").optional())
        .port(PortDefinition::output("output"))
        .property(
            PropertyDefinition::new("scale", PropertyType::Float, Value::Float(1.0))
                .with_range(0.0, 20.0)
                .with_description("The scale of the noise function"),
        )
        .property(
            PropertyDefinition::new("rank", PropertyType::Integer, Value::Integer(1))
                .with_range(1.0, 3.0)
                .with_description("Select the n-th closest point"),
        )
        .property(
            PropertyDefinition::new("iterations", PropertyType::Integer, Value::Integer(1))
                .with_range(1.0, 20.0)
                .with_description("The number of noise octaves"),
        )
        .property(
            PropertyDefinition::new("seed", PropertyType::Seed, Value::Seed(0))
                .with_description("The random seed for the noise function"),
        )
        .build()
}

fn emboss() -> OperationSchema {
    OperationSchema::builder("emboss", "Emboss")
        .description("Simulates an image created by embossing")
        .port(PortDefinition::input("input"))
        .port(PortDefinition::output("output"))
        .property(
            PropertyDefinition::new("azimuth", PropertyType::Float, Value::Float(30.0))
                .with_range(0.0, 360.0)
                .with_description("Light angle (degrees)"),
        )
        .property(
            PropertyDefinition::new("elevation", PropertyType::Float, Value::Float(45.0))
                .with_range(0.0, 180.0)
                .with_description("Elevation angle (degrees)"),
        )
        .property(
            PropertyDefinition::new("depth", PropertyType::Integer, Value::Integer(20))
                .with_range(1.0, 100.0)
                .with_description("Filter width"),
        )
        .build()
}

fn over() -> OperationSchema {
    OperationSchema::builder("over", "Normal Compositing")
        .description("Porter Duff 'over' compositing of the aux layer onto the input")
        .port(PortDefinition::input("input"))
        .port(PortDefinition::input("aux").optional())
        .port(PortDefinition::output("output"))
        .build()
}

fn multiply() -> OperationSchema {
    OperationSchema::builder("multiply", "Multiply Blend")
        .description("Multiply blend of the aux layer onto the input")
        .port(PortDefinition::input("input"))
        .port(PortDefinition::input("aux").optional())
        .port(PortDefinition::output("output"))
        .build()
}

fn color_fill() -> OperationSchema {
    OperationSchema::builder("color-fill", "Color Fill")
        .description("Fills the input's extent with a constant color")
        .port(PortDefinition::input("input"))
        .port(PortDefinition::output("output"))
        .property(
            PropertyDefinition::new(
                "value",
                PropertyType::Color,
                Value::Color(Color::TRANSPARENT),
            )
            .with_description("The color to render"),
        )
        .build()
}

fn color_overlay() -> OperationSchema {
    OperationSchema::builder("color-overlay", "Color Overlay")
        .description("Paints a constant color over the input, preserving alpha")
        .port(PortDefinition::input("input"))
        .port(PortDefinition::output("output"))
        .property(
            PropertyDefinition::new(
                "value",
                PropertyType::Color,
                Value::Color(Color::TRANSPARENT),
            )
            .with_description("The color to paint over the input"),
        )
        .build()
}

fn clip() -> OperationSchema {
    OperationSchema::builder("clip", "Value Clip")
        .description("Clips channel values to the [low, high] interval")
        .port(PortDefinition::input("input"))
        .port(PortDefinition::output("output"))
        .property(
            PropertyDefinition::new("low", PropertyType::Float, Value::Float(0.0))
                .with_range(-2.0, 2.0)
                .with_description("Lower clipping limit"),
        )
        .property(
            PropertyDefinition::new("high", PropertyType::Float, Value::Float(1.0))
                .with_range(-2.0, 2.0)
                .with_description("Upper clipping limit"),
        )
        .build()
}

fn crop() -> OperationSchema {
    OperationSchema::builder("crop", "Crop")
        .description("Crops the input to a rectangle; the aux input, when connected, supplies the reference extent")
        .port(PortDefinition::input("input"))
        .port(PortDefinition::input("aux").optional())
        .port(PortDefinition::output("output"))
        .property(
            PropertyDefinition::new("x", PropertyType::Float, Value::Float(0.0))
                .with_description("Left edge of the crop rectangle"),
        )
        .property(
            PropertyDefinition::new("y", PropertyType::Float, Value::Float(0.0))
                .with_description("Top edge of the crop rectangle"),
        )
        .property(
            PropertyDefinition::new("width", PropertyType::Float, Value::Float(0.0))
                .with_description("Width of the crop rectangle (0 = reference extent)"),
        )
        .property(
            PropertyDefinition::new("height", PropertyType::Float, Value::Float(0.0))
                .with_description("Height of the crop rectangle (0 = reference extent)"),
        )
        .build()
}

fn unsharp_mask() -> OperationSchema {
    OperationSchema::builder("unsharp-mask", "Sharpen (Unsharp Mask)")
        .description("Sharpens the input by subtracting a blurred copy")
        .port(PortDefinition::input("input"))
        .port(PortDefinition::output("output"))
        .property(
            PropertyDefinition::new("std-dev", PropertyType::Float, Value::Float(2.0))
                .with_range(0.2, 300.0)
                .with_description("Blur radius expressed as standard deviation, in pixels"),
        )
        .property(
            PropertyDefinition::new("scale", PropertyType::Float, Value::Float(0.5))
                .with_range(0.0, 300.0)
                .with_description("Scaling factor, the strength of the effect"),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::PortDirection;

    #[test]
    fn test_proxy_ports() {
        let input = input_proxy();
        assert_eq!(input.ports.len(), 1);
        assert_eq!(input.ports[0].direction, PortDirection::Output);

        let output = output_proxy();
        assert_eq!(output.ports.len(), 1);
        assert_eq!(output.ports[0].direction, PortDirection::Input);
    }

    #[test]
    fn test_composite_kinds_have_aux() {
        for schema in [over(), multiply(), crop()] {
            let aux = schema.get_input("aux").expect("aux input present");
            assert!(aux.optional);
        }
    }

    #[test]
    fn test_standard_kinds_have_no_aux() {
        for schema in [emboss(), clip(), unsharp_mask(), color_fill()] {
            assert!(schema.get_input("aux").is_none());
        }
    }

    #[test]
    fn test_builtin_ranges_admit_exposed_ranges() {
        // The variants expose narrowed ranges; the primitives must accept
        // every value the exposed range allows.
        let noise = cell_noise();
        let scale = noise.get_property("scale").unwrap();
        assert!(scale.validate(&Value::Float(0.05)).is_ok());
        assert!(scale.validate(&Value::Float(0.19)).is_ok());

        let rank = noise.get_property("rank").unwrap();
        assert!(rank.validate(&Value::Integer(2)).is_ok());
        assert!(rank.validate(&Value::Integer(3)).is_ok());

        let sharpen = unsharp_mask();
        let std_dev = sharpen.get_property("std-dev").unwrap();
        assert!(std_dev.validate(&Value::Float(2.5)).is_ok());
        assert!(std_dev.validate(&Value::Float(7.0)).is_ok());
    }
}
