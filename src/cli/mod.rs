//! The STRling Command-Line Interface.
//!
//! A thin shell over the library: read the pattern, run one pipeline stage,
//! print the result or a diagnostic, and return the process exit code.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use termcolor::ColorChoice;
use thiserror::Error;

use crate::artifact::{parse_to_artifact_with, to_pretty_json};
use crate::cli::args::{Command, PatternInput, StrlingArgs};
use crate::conformance::{run_dir, ConformanceError};
use crate::diagnostics::StrlingParseError;
use crate::emitter::Pcre2Emitter;
use crate::engine::compile_pattern_with;
use crate::syntax::ParseOptions;

pub mod args;
pub mod diagnostics;
pub mod output;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read pattern from stdin: {0}")]
    Stdin(#[source] io::Error),
    #[error(transparent)]
    Parse(#[from] StrlingParseError),
    #[error(transparent)]
    Conformance(#[from] ConformanceError),
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{failed} conformance case(s) failed")]
    ConformanceFailed { failed: usize },
}

/// Runs the parsed command line and returns the process exit code.
pub fn run(args: StrlingArgs) -> i32 {
    let color: ColorChoice = args.color.into();
    match execute(&args, color) {
        Ok(()) => 0,
        Err(CliError::Parse(error)) => {
            diagnostics::print_parse_error(&error, color, args.fancy);
            1
        }
        Err(error) => {
            diagnostics::print_cli_error(&error, color);
            1
        }
    }
}

fn execute(args: &StrlingArgs, color: ColorChoice) -> Result<(), CliError> {
    let options = ParseOptions {
        max_nesting_depth: args.max_depth,
    };

    match &args.command {
        Command::Compile { input, json } => {
            let source = read_input(input)?;
            let compiled = compile_pattern_with(&source, &options, &Pcre2Emitter)?;
            if *json {
                output::print_json(&to_pretty_json(&compiled)?);
            } else {
                output::print_regex(&compiled.regex, color);
            }
        }
        Command::Parse { input } => {
            let source = read_input(input)?;
            let artifact = parse_to_artifact_with(&source, &options)?;
            output::print_json(&to_pretty_json(&artifact)?);
        }
        Command::Ir { input } => {
            let source = read_input(input)?;
            let artifact = parse_to_artifact_with(&source, &options)?;
            output::print_json(&to_pretty_json(&artifact.compile())?);
        }
        Command::Conformance { dir } => {
            let summary = run_dir(dir)?;
            output::print_conformance_summary(&summary, color);
            if !summary.is_success() {
                return Err(CliError::ConformanceFailed {
                    failed: summary.failures.len(),
                });
            }
        }
    }
    Ok(())
}

fn read_input(input: &PatternInput) -> Result<String, CliError> {
    if let Some(pattern) = &input.pattern {
        return Ok(pattern.clone());
    }
    if let Some(path) = &input.file {
        return read_file(path);
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(CliError::Stdin)?;
    Ok(buffer.strip_suffix('\n').unwrap_or(&buffer).to_string())
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
