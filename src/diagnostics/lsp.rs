//! Language Server Protocol view of a parse error.

use serde::{Deserialize, Serialize};

use super::render::locate;
use super::StrlingParseError;

/// LSP `DiagnosticSeverity.Error`.
pub const SEVERITY_ERROR: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LspPosition {
    pub line: u32,
    pub character: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LspRange {
    pub start: LspPosition,
    pub end: LspPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LspDiagnostic {
    pub range: LspRange,
    pub severity: u8,
    pub message: String,
    pub source: String,
    pub code: String,
}

pub(crate) fn to_lsp_diagnostic(error: &StrlingParseError) -> LspDiagnostic {
    let loc = locate(error.text(), error.pos());
    let line = u32::try_from(loc.line).unwrap_or(u32::MAX);
    let character = u32::try_from(loc.column).unwrap_or(u32::MAX);

    let mut message = error.message();
    if let Some(hint) = error.hint() {
        message.push_str("\n\nHint: ");
        message.push_str(&hint);
    }

    LspDiagnostic {
        range: LspRange {
            start: LspPosition { line, character },
            end: LspPosition {
                line,
                character: character.saturating_add(1),
            },
        },
        severity: SEVERITY_ERROR,
        message,
        source: "STRling".to_string(),
        code: error.code().to_string(),
    }
}

#[cfg(test)]
mod lsp_tests {
    use crate::diagnostics::{ErrorKind, StrlingParseError};

    #[test]
    fn positions_are_zero_based_and_one_char_wide() {
        let err = StrlingParseError::new(ErrorKind::UnterminatedGroup, 5, "ab\n(cd");
        let diag = err.to_lsp_diagnostic();
        assert_eq!(diag.range.start.line, 1);
        assert_eq!(diag.range.start.character, 2);
        assert_eq!(diag.range.end.character, 3);
        assert_eq!(diag.severity, 1);
        assert_eq!(diag.source, "STRling");
        assert_eq!(diag.code, "unterminated_group");
        assert!(diag.message.starts_with("Unterminated group\n\nHint: "));
    }

    #[test]
    fn message_without_hint_is_bare() {
        let err = StrlingParseError::new(ErrorKind::IncompleteEscape, 1, "a\\");
        assert_eq!(err.to_lsp_diagnostic().message, "Incomplete escape at end of pattern");
    }
}
