//! Terminal presentation of CLI errors.
//!
//! Parse errors print their rendered snippet with the header, caret and hint
//! colored, or a graphical `miette` report when `--fancy` is set.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::CliError;
use crate::diagnostics::StrlingParseError;

pub fn print_parse_error(error: &StrlingParseError, color: ColorChoice, fancy: bool) {
    if fancy {
        let report = miette::Report::new(error.clone().into_diagnostic());
        eprintln!("{report:?}");
        return;
    }
    let mut stderr = StandardStream::stderr(color);
    if print_parse_error_colored(&mut stderr, error).is_err() {
        eprintln!("{error}");
    }
}

pub fn print_cli_error(error: &CliError, color: ColorChoice) {
    let mut stderr = StandardStream::stderr(color);
    if print_cli_error_colored(&mut stderr, error).is_err() {
        eprintln!("Error: {error}");
    }
}

// === Internal Color Printing ===

fn print_cli_error_colored(writer: &mut impl WriteColor, error: &CliError) -> std::io::Result<()> {
    writer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(writer, "Error")?;
    writer.reset()?;
    writeln!(writer, ": {error}")
}

fn print_parse_error_colored(writer: &mut impl WriteColor, error: &StrlingParseError) -> std::io::Result<()> {
    let rendered = error.to_string();
    for line in rendered.lines() {
        if let Some(message) = line.strip_prefix("STRling Parse Error:") {
            writer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(writer, "STRling Parse Error:")?;
            writer.reset()?;
            writeln!(writer, "{message}")?;
        } else if let Some(hint) = line.strip_prefix("Hint:") {
            writer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
            write!(writer, "Hint:")?;
            writer.reset()?;
            writeln!(writer, "{hint}")?;
        } else if line.starts_with('>') && line.ends_with('^') {
            let (gutter, caret) = line.split_at(line.len() - 1);
            write!(writer, "{gutter}")?;
            writer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            writeln!(writer, "{caret}")?;
            writer.reset()?;
        } else {
            writeln!(writer, "{line}")?;
        }
    }
    writer.reset()
}
