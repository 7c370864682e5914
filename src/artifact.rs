//! JSON artifacts exchanged with conformance runners in other languages.
//!
//! The parse artifact carries the flags and the AST; the compile artifact
//! carries the normalized IR and the feature list. Field order is fixed by the
//! struct definitions, so identical input always produces identical JSON.

use serde::{Deserialize, Serialize};

use crate::compiler::{compile_with_metadata, CompileOutput};
use crate::diagnostics::StrlingParseError;
use crate::primitives::Flags;
use crate::syntax::{parse_with_options, Node, ParseOptions};

pub const ARTIFACT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseArtifact {
    pub version: String,
    pub flags: Flags,
    pub root: Node,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ParseArtifact {
    pub fn new(flags: Flags, root: Node) -> Self {
        Self {
            version: ARTIFACT_VERSION.to_string(),
            flags,
            root,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Lowers and normalizes the artifact's AST.
    pub fn compile(&self) -> CompileOutput {
        compile_with_metadata(&self.root)
    }
}

/// The compile-stage artifact has exactly the shape of [`CompileOutput`].
pub type CompileArtifact = CompileOutput;

pub fn parse_to_artifact(text: &str) -> Result<ParseArtifact, StrlingParseError> {
    parse_to_artifact_with(text, &ParseOptions::default())
}

pub fn parse_to_artifact_with(
    text: &str,
    options: &ParseOptions,
) -> Result<ParseArtifact, StrlingParseError> {
    let (flags, root) = parse_with_options(text, options)?;
    Ok(ParseArtifact::new(flags, root))
}

pub fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod artifact_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_artifact_has_fixed_envelope() {
        let artifact = parse_to_artifact("%flags i\na+").unwrap();
        let value = serde_json::to_value(&artifact).unwrap();
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["flags"]["ignoreCase"], true);
        assert_eq!(value["warnings"], json!([]));
        assert_eq!(value["errors"], json!([]));
        assert_eq!(value["root"]["kind"], "Quant");
    }

    #[test]
    fn compile_artifact_lists_features() {
        let artifact = parse_to_artifact("(?<y>\\d+)(?=x)").unwrap();
        let compiled = serde_json::to_value(artifact.compile()).unwrap();
        assert_eq!(
            compiled["metadata"]["features_used"],
            json!(["lookahead", "named_group"])
        );
        assert_eq!(compiled["ir"]["ir"], "Seq");
    }

    #[test]
    fn serialization_is_deterministic() {
        let a = to_pretty_json(&parse_to_artifact("a|b[c-e]").unwrap()).unwrap();
        let b = to_pretty_json(&parse_to_artifact("a|b[c-e]").unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
