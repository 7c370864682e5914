//! Plain-text rendering of parse errors.
//!
//! ```text
//! STRling Parse Error: Unterminated group
//!
//! > 1 | (abc
//! >   |     ^
//!
//! Hint: This group was opened with '(' but never closed. ...
//! ```

use unicode_width::UnicodeWidthStr;

use super::StrlingParseError;

/// A character offset resolved to its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location<'a> {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, counted in characters.
    pub column: usize,
    pub line_text: &'a str,
}

/// Resolves a character offset in `text` to a line and column.
///
/// Offsets past the end land after the last character of the last line.
pub fn locate(text: &str, pos: usize) -> Location<'_> {
    let mut consumed = 0;
    let mut lines = text.split('\n').enumerate().peekable();
    while let Some((index, line)) = lines.next() {
        let len = line.chars().count();
        if pos <= consumed + len || lines.peek().is_none() {
            return Location {
                line: index,
                column: pos.saturating_sub(consumed).min(len),
                line_text: line,
            };
        }
        // newline
        consumed += len + 1;
    }
    Location {
        line: 0,
        column: 0,
        line_text: "",
    }
}

/// Renders the error with a source snippet, caret and optional hint.
pub fn render_error(error: &StrlingParseError) -> String {
    let message = error.message();
    if error.text().is_empty() {
        return format!("{message} at position {}", error.pos());
    }

    let loc = locate(error.text(), error.pos());
    let line_no = (loc.line + 1).to_string();
    let prefix: String = loc.line_text.chars().take(loc.column).collect();
    let caret_pad = " ".repeat(UnicodeWidthStr::width(prefix.as_str()));

    let mut out = format!("STRling Parse Error: {message}\n\n");
    out.push_str(&format!("> {line_no} | {}\n", loc.line_text));
    out.push_str(&format!("> {:width$} | {caret_pad}^", "", width = line_no.len()));
    if let Some(hint) = error.hint() {
        out.push_str(&format!("\n\nHint: {hint}"));
    }
    out
}
