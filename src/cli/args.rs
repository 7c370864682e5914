//! Defines the command-line arguments and subcommands for the STRling CLI.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::syntax::DEFAULT_MAX_NESTING_DEPTH;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "strling",
    version,
    about = "Compile readable STRling patterns into PCRE2 regular expressions."
)]
pub struct StrlingArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// When to color terminal output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    /// Render parse errors as graphical reports.
    #[arg(long, global = true)]
    pub fancy: bool,

    /// Deepest allowed nesting of groups and lookarounds.
    #[arg(long, default_value_t = DEFAULT_MAX_NESTING_DEPTH, global = true)]
    pub max_depth: usize,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a pattern and print the PCRE2 regex.
    Compile {
        #[command(flatten)]
        input: PatternInput,
        /// Print the regex, flags and features as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the parse artifact (flags and AST) as JSON.
    Parse {
        #[command(flatten)]
        input: PatternInput,
    },
    /// Print the compile artifact (normalized IR and features) as JSON.
    Ir {
        #[command(flatten)]
        input: PatternInput,
    },
    /// Run every conformance case file in a directory.
    Conformance {
        #[arg(default_value = "tests/fixtures/conformance")]
        dir: PathBuf,
    },
}

/// Where the pattern text comes from. Standard input when neither is given.
#[derive(Debug, Args)]
pub struct PatternInput {
    /// Pattern source text.
    #[arg(conflicts_with = "file")]
    pub pattern: Option<String>,

    /// Read the pattern from a file.
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl From<ColorMode> for termcolor::ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => termcolor::ColorChoice::Auto,
            ColorMode::Always => termcolor::ColorChoice::Always,
            ColorMode::Never => termcolor::ColorChoice::Never,
        }
    }
}
