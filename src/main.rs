//! Polygen CLI
//!
//! This is a demonstration CLI for the polygen library.

use anyhow::{bail, Result};
use polygen::prelude::*;
use std::collections::HashMap;

fn main() -> Result<()> {
    env_logger::init();

    println!("Polygen - polygon texture meta-operation v{}", polygen::VERSION);
    println!();

    // Parse command line args
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return Ok(());
    }

    match args[1].as_str() {
        "kinds" => list_kinds(),
        "info" => {
            if args.len() < 3 {
                bail!("Please specify an operation kind");
            }
            kind_info(&args[2])?;
        }
        "describe" => {
            if args.len() < 3 {
                bail!("Please specify a variant (artistic | simple)");
            }
            describe_variant(&args[2])?;
        }
        "demo" => demo()?,
        "help" | "--help" | "-h" => print_usage(&args[0]),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(&args[0]);
        }
    }
    Ok(())
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  kinds               List all built-in operation kinds");
    println!("  info <kind>         Show ports and properties of a kind");
    println!("  describe <variant>  Print a variant's exposed surface as JSON");
    println!("  demo                Build the artistic variant and walk its graph");
    println!("  help                Show this help message");
}

fn list_kinds() {
    let registry = OperationRegistry::with_builtins();

    println!("Built-in operation kinds ({} total):", registry.len());
    println!();
    for schema in registry.schemas() {
        println!("  {} - {}", schema.kind, schema.title);
    }
}

fn kind_info(kind: &str) -> Result<()> {
    let registry = OperationRegistry::with_builtins();
    let schema = registry.lookup(kind)?;

    println!("Kind: {}", schema.kind);
    println!("Title: {}", schema.title);
    if !schema.description.is_empty() {
        println!();
        println!("Description:");
        println!("  {}", schema.description);
    }
    println!();

    println!("Ports:");
    for port in &schema.ports {
        let optional = if port.optional { " (optional)" } else { "" };
        println!("  {} [{:?}]{}", port.name, port.direction, optional);
    }
    println!();

    if !schema.properties.is_empty() {
        println!("Properties:");
        for prop in &schema.properties {
            print!("  {} [{}] = {}", prop.name, prop.property_type, prop.default_value);
            if let Some((min, max)) = prop.range {
                print!("  range {}..={}", min, max);
            }
            println!();
            if !prop.description.is_empty() {
                println!("    {}", prop.description);
            }
        }
    }
    Ok(())
}

fn describe_variant(name: &str) -> Result<()> {
    let variant = match Variant::parse(name) {
        Some(v) => v,
        None => bail!("Unknown variant '{}' (expected: artistic | simple)", name),
    };

    let op = MetaOperationBuilder::new().build(variant, &HashMap::new())?;

    println!("Variant: {}", variant);
    println!("Topology: {}", variant.description());
    println!();
    println!("Exposed surface:");
    println!("{}", serde_json::to_string_pretty(&op.surface())?);
    Ok(())
}

fn demo() -> Result<()> {
    let mut initial = HashMap::new();
    initial.insert("scale".to_string(), Value::Float(0.15));
    initial.insert("value".to_string(), Value::Color(Color::rgba(40, 120, 200, 160)));

    let mut op = MetaOperationBuilder::new().build(Variant::Artistic, &initial)?;
    op.set_property("depth", Value::Integer(25))?;

    let graph = op.graph();
    println!(
        "Built '{}' variant: {} nodes, {} connections",
        Variant::Artistic,
        graph.node_count(),
        graph.connection_count()
    );
    println!();

    println!("Evaluation order:");
    let analyzer = TopologyAnalyzer::new(graph);
    for id in analyzer.topological_sort()? {
        let node = graph.get_node(id)?;
        match &node.label {
            Some(label) => println!("  {} ({}) [{}]", node.kind, label, node.id),
            None => println!("  {} [{}]", node.kind, node.id),
        }
    }
    println!();

    println!("Node state after writes:");
    for node in graph.nodes() {
        if node.properties.is_empty() {
            continue;
        }
        let label = node.label.as_deref().unwrap_or(&node.kind);
        let mut props: Vec<_> = node.properties.iter().collect();
        props.sort_by_key(|(name, _)| name.as_str());
        let rendered: Vec<String> = props
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        println!("  {}: {}", label, rendered.join(", "));
    }
    Ok(())
}
