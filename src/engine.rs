//! One-call pipeline: directives → parse → lower → normalize → emit.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::compiler::{compile_with_metadata, Feature};
use crate::diagnostics::StrlingParseError;
use crate::emitter::{Emitter, Pcre2Emitter};
use crate::primitives::Flags;
use crate::syntax::{parse_with_options, ParseOptions};

/// Everything a caller needs from a successful compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledPattern {
    pub regex: String,
    pub flags: Flags,
    pub features_used: Vec<Feature>,
}

/// Compiles STRling source to a PCRE2 pattern with default options.
pub fn compile_pattern(text: &str) -> Result<CompiledPattern, StrlingParseError> {
    compile_pattern_with(text, &ParseOptions::default(), &Pcre2Emitter)
}

/// Compiles with explicit parse options and back end.
pub fn compile_pattern_with(
    text: &str,
    options: &ParseOptions,
    emitter: &dyn Emitter,
) -> Result<CompiledPattern, StrlingParseError> {
    let (flags, ast) = parse_with_options(text, options)?;
    let output = compile_with_metadata(&ast);
    let regex = emitter.emit(&output.ir, Some(&flags));
    info!(
        input_len = text.len(),
        regex_len = regex.len(),
        features = output.metadata.features_used.len(),
        "compiled pattern"
    );
    Ok(CompiledPattern {
        regex,
        flags,
        features_used: output.metadata.features_used,
    })
}
