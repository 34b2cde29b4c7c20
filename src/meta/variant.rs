//! The two supported fixed topologies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which fixed topology a meta-operation instance is built against.
///
/// Variants differ in node set, connection pattern, default property values
/// and the value ranges of the exposed surface. The variant is chosen at
/// construction time and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// "Artistic" full pipeline: noise overlay, emboss, crop, sharpen, then
    /// a multiply pass against a color fill.
    Artistic,
    /// "Simple" published pipeline: noise overlay, emboss, value clip,
    /// multiply against a color overlay, then a crop shaped by the raw
    /// input image.
    Simple,
}

impl Variant {
    /// All supported variants.
    pub fn all() -> &'static [Variant] {
        &[Variant::Artistic, Variant::Simple]
    }

    /// Stable identifier for CLI and serialization purposes.
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Artistic => "artistic",
            Variant::Simple => "simple",
        }
    }

    /// Parse a variant from its identifier.
    pub fn parse(name: &str) -> Option<Variant> {
        match name {
            "artistic" => Some(Variant::Artistic),
            "simple" => Some(Variant::Simple),
            _ => None,
        }
    }

    /// Short description of the topology.
    pub fn description(&self) -> &'static str {
        match self {
            Variant::Artistic => {
                "input -> over -> emboss -> crop -> unsharp-mask -> multiply -> output, \
                 with cell-noise feeding over.aux and color-fill feeding multiply.aux"
            }
            Variant::Simple => {
                "input -> over -> emboss -> clip -> multiply -> crop -> output, \
                 with cell-noise feeding over.aux, color-overlay feeding multiply.aux \
                 and the raw input feeding crop.aux"
            }
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for &variant in Variant::all() {
            assert_eq!(Variant::parse(variant.name()), Some(variant));
        }
        assert_eq!(Variant::parse("deluxe"), None);
    }
}
