//! Meta-operation construction.
//!
//! The builder orchestrates the whole assembly: instantiate the variant's
//! nodes, wire the primary chain, wire the auxiliary connections, validate
//! the topology, install the redirect table, and push the initial property
//! values. Construction is all-or-nothing: any failure aborts the attempt
//! and no partially-built graph reaches the caller.

use crate::core::error::{BuildError, BuildResult, NodeId, PropertyError, PropertyResult};
use crate::core::types::{Color, PropertyType, Value};
use crate::graph::structure::OpGraph;
use crate::meta::operation::MetaOperation;
use crate::meta::property::{ExposedProperty, PropertyRedirect, PropertyTransform, Role};
use crate::meta::variant::Variant;
use crate::ops::registry::OperationRegistry;
use crate::validation::pipeline::GraphValidator;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Builder for meta-operation instances.
///
/// `build(variant, initial)` covers the two shipped topologies. The
/// declare/bind/finish primitives it is made of are public, so a host can
/// also assemble a custom graph and surface by hand.
pub struct MetaOperationBuilder {
    registry: OperationRegistry,
    validator: GraphValidator,
    exposed: IndexMap<String, ExposedProperty>,
    redirects: Vec<PropertyRedirect>,
}

impl MetaOperationBuilder {
    /// Create a builder backed by the builtin operation registry.
    pub fn new() -> Self {
        Self::with_registry(OperationRegistry::with_builtins())
    }

    /// Create a builder backed by a custom registry.
    pub fn with_registry(registry: OperationRegistry) -> Self {
        Self {
            registry,
            validator: GraphValidator::default_stages(),
            exposed: IndexMap::new(),
            redirects: Vec::new(),
        }
    }

    /// The operation registry this builder instantiates nodes from.
    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Create an empty graph seeded with input/output proxy nodes.
    pub fn new_graph(&self) -> BuildResult<OpGraph> {
        let input = self.registry.instantiate("input-proxy", &HashMap::new())?;
        let output = self.registry.instantiate("output-proxy", &HashMap::new())?;
        Ok(OpGraph::new(input, output))
    }

    /// Register an exposed property.
    pub fn declare_property(&mut self, property: ExposedProperty) -> PropertyResult<()> {
        if self.exposed.contains_key(&property.name) {
            return Err(PropertyError::DuplicateProperty(property.name));
        }
        self.exposed.insert(property.name.clone(), property);
        Ok(())
    }

    /// Bind an exposed property to an internal node property.
    ///
    /// Several binds for one exposed name are permitted (fan-out). Type
    /// compatibility is checked here: for identity binds against the
    /// declared type directly, for transformed binds by applying the
    /// transform to the exposed default and checking the produced value.
    pub fn bind_redirect(
        &mut self,
        graph: &OpGraph,
        exposed_name: &str,
        target_node: NodeId,
        target_property: &str,
        transform: Option<PropertyTransform>,
    ) -> PropertyResult<()> {
        let def = self
            .exposed
            .get(exposed_name)
            .ok_or_else(|| PropertyError::UnknownProperty(exposed_name.to_string()))?;

        let node = graph
            .get_node(target_node)
            .map_err(|e| PropertyError::UnknownTarget {
                reason: e.to_string(),
            })?;
        let target_def = node.schema.get_property(target_property).ok_or_else(|| {
            PropertyError::UnknownTarget {
                reason: format!(
                    "kind '{}' has no property '{}'",
                    node.kind, target_property
                ),
            }
        })?;

        let probe = match &transform {
            Some(f) => f(&def.default_value),
            None => def.default_value,
        };
        if !target_def.property_type.matches(&probe) {
            return Err(PropertyError::TypeMismatch {
                name: exposed_name.to_string(),
                expected: target_def.property_type,
                got: probe.get_type(),
            });
        }

        let mut redirect = PropertyRedirect::new(exposed_name, target_node, target_property);
        if let Some(f) = transform {
            redirect = redirect.with_transform(f);
        }
        self.redirects.push(redirect);
        Ok(())
    }

    /// Build a meta-operation for one of the shipped variants.
    pub fn build(
        mut self,
        variant: Variant,
        initial: &HashMap<String, Value>,
    ) -> BuildResult<MetaOperation> {
        log::debug!("building '{}' meta-operation", variant);

        let graph = match variant {
            Variant::Artistic => self.assemble_artistic()?,
            Variant::Simple => self.assemble_simple()?,
        };

        for property in surface_for(variant) {
            self.declare_property(property)?;
        }
        for (exposed, label, target_property) in redirect_table(variant) {
            let target = graph
                .find_by_label(label)
                .map(|n| n.id)
                .ok_or_else(|| PropertyError::UnknownTarget {
                    reason: format!("no node labelled '{}'", label),
                })?;
            self.bind_redirect(&graph, exposed, target, target_property, None)?;
        }

        self.finish_with_variant(graph, initial, Some(variant))
    }

    /// Finalize a hand-assembled graph and surface into a meta-operation.
    ///
    /// Validates the topology (all-or-nothing), checks that every declared
    /// property is bound, then synchronizes node state: declared defaults
    /// flow through the redirect layer first, followed by the caller's
    /// initial values.
    pub fn finish(
        self,
        graph: OpGraph,
        initial: &HashMap<String, Value>,
    ) -> BuildResult<MetaOperation> {
        self.finish_with_variant(graph, initial, None)
    }

    fn finish_with_variant(
        self,
        graph: OpGraph,
        initial: &HashMap<String, Value>,
        variant: Option<Variant>,
    ) -> BuildResult<MetaOperation> {
        let issues = self.validator.validate(&graph);
        if !issues.is_empty() {
            return Err(BuildError::InvalidTopology {
                issues: issues.iter().map(ToString::to_string).collect(),
            });
        }

        for name in self.exposed.keys() {
            if !self.redirects.iter().any(|r| &r.exposed_name == name) {
                return Err(PropertyError::UnboundProperty(name.clone()).into());
            }
        }

        let mut operation = MetaOperation::new(variant, graph, self.exposed, self.redirects);

        let defaults: Vec<(String, Value)> = operation
            .surface()
            .iter()
            .map(|p| (p.name.clone(), p.default_value))
            .collect();
        for (name, value) in defaults {
            operation.set_property(&name, value)?;
        }
        for (name, value) in initial {
            operation.set_property(name, *value)?;
        }

        log::debug!(
            "meta-operation ready: {} nodes, {} connections, {} exposed properties",
            operation.graph().node_count(),
            operation.graph().connection_count(),
            operation.surface().len()
        );
        Ok(operation)
    }

    // ========================================================================
    // Variant Assembly
    // ========================================================================

    /// Variant A: input -> over -> emboss -> crop -> unsharp-mask ->
    /// multiply -> output, with cell-noise as over's aux layer and
    /// color-fill as multiply's aux layer, both fed from the input.
    fn assemble_artistic(&self) -> BuildResult<OpGraph> {
        let mut graph = self.new_graph()?;
        let input = graph.input_proxy();
        let output = graph.output_proxy();

        let over = graph.add_node(self.node("over", "over")?);
        let noise = graph.add_node(self.node("cell-noise", "noise")?);
        let emboss = graph.add_node(self.node("emboss", "emboss")?);
        let multiply = graph.add_node(self.node("multiply", "multiply")?);
        let color = graph.add_node(self.node("color-fill", "color")?);
        let crop = graph.add_node(self.node("crop", "crop")?);
        let sharpen = graph.add_node(self.node("unsharp-mask", "sharpen")?);

        link_chain(
            &mut graph,
            &[input, over, emboss, crop, sharpen, multiply, output],
        )?;

        // Aux wiring comes after the primary chain; the input proxy fans out
        // to the aux producers as a secondary consumer.
        graph.connect(noise, "output", over, "aux")?;
        graph.connect(input, "output", noise, "input")?;
        graph.connect(color, "output", multiply, "aux")?;
        graph.connect(input, "output", color, "input")?;

        Ok(graph)
    }

    /// Variant B: input -> over -> emboss -> clip -> multiply -> crop ->
    /// output. The noise rank is fixed internally, color-overlay feeds the
    /// multiply, and crop's aux is re-connected to the *raw* input rather
    /// than the upstream pipeline output.
    fn assemble_simple(&self) -> BuildResult<OpGraph> {
        let mut graph = self.new_graph()?;
        let input = graph.input_proxy();
        let output = graph.output_proxy();

        let mut fixed_rank = HashMap::new();
        fixed_rank.insert("rank".to_string(), Value::Integer(2));
        let noise = graph.add_node(
            self.registry
                .instantiate("cell-noise", &fixed_rank)?
                .with_label("noise"),
        );

        let over = graph.add_node(self.node("over", "over")?);
        let emboss = graph.add_node(self.node("emboss", "emboss")?);
        let clip = graph.add_node(self.node("clip", "clip")?);
        let multiply = graph.add_node(self.node("multiply", "multiply")?);
        let color = graph.add_node(self.node("color-overlay", "color")?);
        let crop = graph.add_node(self.node("crop", "crop")?);

        link_chain(
            &mut graph,
            &[input, over, emboss, clip, multiply, crop, output],
        )?;

        graph.connect(noise, "output", over, "aux")?;
        graph.connect(input, "output", noise, "input")?;
        graph.connect(color, "output", multiply, "aux")?;
        graph.connect(input, "output", color, "input")?;
        // The crop shapes itself from the unmodified source image, not the
        // processed stream. Fixed topology fact.
        graph.connect(input, "output", crop, "aux")?;

        Ok(graph)
    }

    fn node(&self, kind: &str, label: &str) -> BuildResult<crate::graph::structure::OpNode> {
        Ok(self
            .registry
            .instantiate(kind, &HashMap::new())?
            .with_label(label))
    }
}

impl Default for MetaOperationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire the primary single-input/single-output chain through sequential
/// connections.
fn link_chain(graph: &mut OpGraph, nodes: &[NodeId]) -> BuildResult<()> {
    for pair in nodes.windows(2) {
        graph.connect(pair[0], "output", pair[1], "input")?;
    }
    Ok(())
}

/// The exposed surface of a shipped variant.
fn surface_for(variant: Variant) -> Vec<ExposedProperty> {
    match variant {
        Variant::Artistic => vec![
            ExposedProperty::new("scale", PropertyType::Float, Value::Float(0.10))
                .with_range(0.05, 0.19)
                .with_label("Scale of Polygons")
                .with_description("The scale of the noise function"),
            ExposedProperty::new("rank", PropertyType::Integer, Value::Integer(2))
                .with_range(2.0, 3.0)
                .with_label("Rank of Polygons")
                .with_description("Select the n-th closest point")
                .with_role(Role::OutputExtent),
            ExposedProperty::new("seed", PropertyType::Seed, Value::Seed(0))
                .with_label("Random seed")
                .with_description("The random seed for the noise function"),
            ExposedProperty::new("azimuth", PropertyType::Float, Value::Float(2.0))
                .with_range(0.0, 360.0)
                .with_label("Light Rotation")
                .with_description("Light angle (degrees)")
                .with_unit("degree"),
            ExposedProperty::new("depth", PropertyType::Integer, Value::Integer(20))
                .with_range(6.0, 30.0)
                .with_label("Depth of Polygons")
                .with_description("Filter width"),
            ExposedProperty::new(
                "value",
                PropertyType::Color,
                Value::Color(Color::TRANSPARENT),
            )
            .with_label("Color")
            .with_description("The color to paint over the input")
            .with_role(Role::ColorPrimary),
            ExposedProperty::new("std_dev", PropertyType::Float, Value::Float(2.5))
                .with_range(2.5, 7.0)
                .with_label("Radius of Sharpen")
                .with_description("Expressed as standard deviation, in pixels")
                .with_unit("pixel-distance"),
            ExposedProperty::new("strength", PropertyType::Float, Value::Float(1.0))
                .with_range(0.0, 5.0)
                .with_label("Scaling Factor of Sharpen")
                .with_description("Scaling factor for unsharp-mask, the strength of effect"),
        ],
        Variant::Simple => vec![
            ExposedProperty::new("scale", PropertyType::Float, Value::Float(0.10))
                .with_range(0.05, 0.19)
                .with_label("Scale of Polygons")
                .with_description("The scale of the noise function"),
            ExposedProperty::new("seed", PropertyType::Seed, Value::Seed(0))
                .with_label("Random seed")
                .with_description("The random seed for the noise function"),
            ExposedProperty::new("azimuth", PropertyType::Float, Value::Float(30.0))
                .with_range(0.0, 360.0)
                .with_label("Light Rotation")
                .with_description("Light angle (degrees)")
                .with_unit("degree"),
            ExposedProperty::new("depth", PropertyType::Integer, Value::Integer(12))
                .with_range(6.0, 30.0)
                .with_label("Depth of Polygons")
                .with_description("Filter width"),
            ExposedProperty::new(
                "value",
                PropertyType::Color,
                Value::Color(Color::TRANSPARENT),
            )
            .with_label("Color")
            .with_description("The color to paint over the input")
            .with_role(Role::ColorPrimary),
        ],
    }
}

/// The redirect table of a shipped variant: exposed name, node label,
/// target property. All identity binds; a wrong row here is a variant
/// definition bug caught by the construction tests.
fn redirect_table(variant: Variant) -> &'static [(&'static str, &'static str, &'static str)] {
    match variant {
        Variant::Artistic => &[
            ("scale", "noise", "scale"),
            ("rank", "noise", "rank"),
            ("seed", "noise", "seed"),
            ("azimuth", "emboss", "azimuth"),
            ("depth", "emboss", "depth"),
            ("value", "color", "value"),
            ("std_dev", "sharpen", "std-dev"),
            ("strength", "sharpen", "scale"),
        ],
        Variant::Simple => &[
            ("scale", "noise", "scale"),
            ("seed", "noise", "seed"),
            ("azimuth", "emboss", "azimuth"),
            ("depth", "emboss", "depth"),
            ("value", "color", "value"),
        ],
    }
}
