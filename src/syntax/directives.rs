//! Leading `%flags` directives.
//!
//! Directives may only precede pattern content. Blank lines and `#` comment
//! lines before the first content line are dropped. Everything else is joined
//! back with `\n` to form the pattern body the parser sees.

use tracing::debug;

use crate::diagnostics::{ErrorKind, StrlingParseError};
use crate::primitives::Flags;

/// Result of stripping directives from raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directives {
    pub flags: Flags,
    pub pattern: String,
}

const FLAGS_DIRECTIVE: &str = "%flags";

/// Splits `text` into its flag set and the pattern body.
///
/// Errors carry positions into the raw `text`.
pub fn extract_directives(text: &str) -> Result<Directives, StrlingParseError> {
    let mut flags = Flags::default();
    let mut pattern_lines: Vec<&str> = Vec::new();
    let mut in_pattern = false;
    let mut line_start = 0;

    for raw_line in text.split('\n') {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        let start = line_start;
        line_start += raw_line.chars().count() + 1;

        let stripped = line.trim_start();
        let indent = line.chars().count() - stripped.chars().count();

        if !in_pattern && (stripped.trim_end().is_empty() || stripped.starts_with('#')) {
            continue;
        }

        if stripped.starts_with('%') {
            let at = start + indent;
            if in_pattern {
                return Err(StrlingParseError::new(ErrorKind::DirectiveAfterPattern, at, text));
            }
            let Some(after) = stripped.strip_prefix(FLAGS_DIRECTIVE) else {
                let name: String = stripped[1..]
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                    .collect();
                return Err(StrlingParseError::new(ErrorKind::UnknownDirective(name), at, text));
            };
            let token_start = at + FLAGS_DIRECTIVE.len();
            if let Some(rest) = read_flags(after, token_start, &mut flags, text)? {
                in_pattern = true;
                pattern_lines.push(rest);
            }
            continue;
        }

        in_pattern = true;
        pattern_lines.push(line);
    }

    let pattern = pattern_lines.join("\n");
    debug!(flags = %flags.letters(), pattern_len = pattern.len(), "extracted directives");
    Ok(Directives { flags, pattern })
}

/// Applies the flags token at the start of `after` and returns any same-line
/// remainder that starts the pattern body.
fn read_flags<'a>(
    after: &'a str,
    token_start: usize,
    flags: &mut Flags,
    text: &str,
) -> Result<Option<&'a str>, StrlingParseError> {
    let token_len = after
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphabetic() || matches!(c, ',' | '[' | ']' | ' ' | '\t')))
        .map(|(byte, _)| byte)
        .unwrap_or(after.len());
    let (token, remainder) = after.split_at(token_len);

    let mut saw_letter = false;
    for (offset, ch) in token.chars().enumerate() {
        if !ch.is_ascii_alphabetic() {
            continue;
        }
        saw_letter = true;
        if !flags.set_letter(ch.to_ascii_lowercase()) {
            return Err(StrlingParseError::new(
                ErrorKind::InvalidFlag(ch),
                token_start + offset,
                text,
            ));
        }
    }

    let trimmed = remainder.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !saw_letter {
        let lead = remainder.chars().take_while(|c| c.is_whitespace()).count();
        let offending = trimmed.chars().next().unwrap_or(' ');
        return Err(StrlingParseError::new(
            ErrorKind::InvalidFlag(offending),
            token_start + token.chars().count() + lead,
            text,
        ));
    }
    Ok(Some(remainder))
}
