//! Staged graph validator.

use crate::graph::structure::OpGraph;
use crate::validation::stages::{
    CardinalityValidation, SchemaValidation, StructuralValidation, TopologyIssue,
    ValidationStage,
};

/// Runs a series of validation stages over an assembled graph.
///
/// Construction is all-or-nothing: the builder turns any collected issue
/// into an `InvalidTopology` failure and discards the graph.
pub struct GraphValidator {
    stages: Vec<Box<dyn ValidationStage>>,
}

impl GraphValidator {
    /// Create a validator with the given stages.
    pub fn new(stages: Vec<Box<dyn ValidationStage>>) -> Self {
        Self { stages }
    }

    /// Create the default validator with all standard stages.
    pub fn default_stages() -> Self {
        Self {
            stages: vec![
                Box::new(StructuralValidation),
                Box::new(CardinalityValidation),
                Box::new(SchemaValidation),
            ],
        }
    }

    /// Add a custom validation stage.
    pub fn add_stage(&mut self, stage: Box<dyn ValidationStage>) {
        self.stages.push(stage);
    }

    /// Validate a graph through all stages, collecting every issue.
    pub fn validate(&self, graph: &OpGraph) -> Vec<TopologyIssue> {
        let mut issues = Vec::new();

        for stage in &self.stages {
            let found = stage.validate(graph);
            if !found.is_empty() {
                log::debug!(
                    "validation stage '{}' found {} issue(s)",
                    stage.name(),
                    found.len()
                );
            }
            issues.extend(found);
        }

        issues
    }

    /// Quick check: does the graph satisfy all invariants?
    pub fn is_valid(&self, graph: &OpGraph) -> bool {
        self.validate(graph).is_empty()
    }
}

impl Default for GraphValidator {
    fn default() -> Self {
        Self::default_stages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::registry::OperationRegistry;
    use std::collections::HashMap;

    #[test]
    fn test_validator_over_linked_proxies() {
        let registry = OperationRegistry::with_builtins();
        let input = registry.instantiate("input-proxy", &HashMap::new()).unwrap();
        let output = registry.instantiate("output-proxy", &HashMap::new()).unwrap();
        let mut graph = OpGraph::new(input, output);
        graph
            .connect(graph.input_proxy(), "output", graph.output_proxy(), "input")
            .unwrap();

        let validator = GraphValidator::default_stages();
        assert!(validator.is_valid(&graph));
    }

    #[test]
    fn test_validator_rejects_unlinked_proxies() {
        let registry = OperationRegistry::with_builtins();
        let input = registry.instantiate("input-proxy", &HashMap::new()).unwrap();
        let output = registry.instantiate("output-proxy", &HashMap::new()).unwrap();
        let graph = OpGraph::new(input, output);

        let validator = GraphValidator::default_stages();
        assert!(!validator.is_valid(&graph));
    }
}
