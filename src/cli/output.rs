//! Handles all user-facing output for the CLI.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::conformance::Summary;

/// Prints a compiled regex on its own line.
pub fn print_regex(regex: &str, color: ColorChoice) {
    let mut stdout = StandardStream::stdout(color);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = write!(stdout, "{regex}");
    let _ = stdout.reset();
    let _ = writeln!(stdout);
}

/// JSON goes out uncolored so it can be piped.
pub fn print_json(json: &str) {
    println!("{json}");
}

pub fn print_conformance_summary(summary: &Summary, color: ColorChoice) {
    let mut stdout = StandardStream::stdout(color);
    for (id, detail) in &summary.failures {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        let _ = writeln!(stdout, "FAIL {id}");
        let _ = stdout.reset();
        print_detail(&mut stdout, detail);
    }

    let status = if summary.is_success() {
        Color::Green
    } else {
        Color::Red
    };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(status)).set_bold(true));
    let _ = writeln!(
        stdout,
        "{} passed, {} failed, {} skipped",
        summary.passed,
        summary.failures.len(),
        summary.skipped
    );
    let _ = stdout.reset();
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

/// Colors the `+`/`-` lines of a diff; other lines print plain.
fn print_detail(stdout: &mut StandardStream, detail: &str) {
    for line in detail.lines() {
        let color = match line.chars().next() {
            Some('+') => Some(Color::Green),
            Some('-') => Some(Color::Red),
            _ => None,
        };
        let _ = stdout.set_color(ColorSpec::new().set_fg(color));
        let _ = writeln!(stdout, "    {line}");
    }
    let _ = stdout.reset();
}
