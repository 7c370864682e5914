//! STRling: a readable pattern language that compiles to PCRE2 regexes.
//!
//! ```
//! let compiled = strling::compile_pattern("%flags i\n(?<year>\\d{4})-\\d{2}").unwrap();
//! assert_eq!(compiled.regex, "(?i)(?<year>\\d{4})-\\d{2}");
//! ```

pub use crate::compiler::{compile, compile_with_metadata, lower, normalize, Feature};
pub use crate::diagnostics::{ErrorKind, StrlingParseError};
pub use crate::emitter::{emit, Emitter, Pcre2Emitter};
pub use crate::engine::{compile_pattern, compile_pattern_with, CompiledPattern};
pub use crate::primitives::Flags;
pub use crate::syntax::{parse, parse_with_options, Node, ParseOptions};

pub mod artifact;
pub mod cli;
pub mod compiler;
pub mod conformance;
pub mod diagnostics;
pub mod emitter;
pub mod engine;
pub mod ir;
pub mod primitives;
pub mod syntax;
