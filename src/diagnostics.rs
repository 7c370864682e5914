//! Unified diagnostics for the STRling front end.
//!
//! Every failure the directive extractor or the parser can report is a
//! [`StrlingParseError`]: one [`ErrorKind`] plus the character offset it was
//! detected at and the text that offset is relative to. Nothing accumulates;
//! the first violation aborts the parse.
//!
//! Presentation lives in the submodules:
//!
//! - [`hints`]: the instructional hint attached to each kind.
//! - [`render`]: the plain-text snippet with a caret under the offending column.
//! - [`lsp`]: conversion into a Language Server Protocol diagnostic.
//!
//! [`ParseDiagnostic`] adapts an error to `miette` for graphical reports.

use std::fmt;

use miette::{Diagnostic, LabeledSpan, SourceCode};
use thiserror::Error;

pub mod hints;
pub mod lsp;
pub mod render;

pub use lsp::{LspDiagnostic, LspPosition, LspRange};

// ============================================================================
// ERROR KINDS
// ============================================================================

/// Closed set of everything that can go wrong while reading a pattern.
///
/// The `Display` text of each variant is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    // --- directives ---
    #[error("Invalid flag '{0}'")]
    InvalidFlag(char),
    #[error("Directive after pattern content")]
    DirectiveAfterPattern,
    #[error("Unknown directive '%{0}'")]
    UnknownDirective(String),

    // --- alternation and stray tokens ---
    #[error("Alternation lacks left-hand side")]
    AlternationLacksLeft,
    #[error("Alternation lacks right-hand side")]
    AlternationLacksRight,
    #[error("Empty alternation branch")]
    EmptyAlternationBranch,
    #[error("Invalid quantifier '{0}'")]
    InvalidQuantifier(char),
    #[error("Unmatched ')'")]
    UnmatchedParen,
    #[error("Unexpected token '{0}'")]
    UnexpectedToken(char),
    #[error("Unexpected trailing input")]
    UnexpectedTrailingInput,

    // --- backreferences ---
    #[error("Backreference to undefined group \\{0}")]
    UndefinedBackrefIndex(u32),
    #[error("Backreference to undefined group <{0}>")]
    UndefinedBackrefName(String),
    #[error("Expected '<' after \\k")]
    ExpectedNamedBackrefOpen,
    #[error("Unterminated named backref")]
    UnterminatedNamedBackref,

    // --- escapes ---
    #[error("Expected {{ after \\p/\\P")]
    ExpectedPropertyBrace,
    #[error("Unterminated \\p{{...}}")]
    UnterminatedProperty,
    #[error("Empty \\p{{...}} property name")]
    EmptyProperty,
    #[error("Invalid \\xHH escape")]
    InvalidHexEscape,
    #[error("Invalid \\uHHHH")]
    InvalidUnicodeEscape,
    #[error("Invalid \\UHHHHHHHH")]
    InvalidLongUnicodeEscape,
    #[error("Unterminated \\x{{...}}")]
    UnterminatedHexBrace,
    #[error("Unterminated \\u{{...}}")]
    UnterminatedUnicodeBrace,
    #[error("Invalid code point U+{0}")]
    InvalidCodePoint(String),
    #[error("Unknown escape sequence \\{0}")]
    UnknownEscape(char),
    #[error("Incomplete escape at end of pattern")]
    IncompleteEscape,

    // --- character classes ---
    #[error("Unterminated character class")]
    UnterminatedCharClass,
    /// Same message as [`ErrorKind::UnterminatedCharClass`]; only the hint differs.
    #[error("Unterminated character class")]
    EmptyCharClass,
    #[error("Invalid character range [{0}-{1}]")]
    InvalidCharRange(char, char),

    // --- groups ---
    #[error("Invalid group name <{0}>")]
    InvalidGroupName(String),
    #[error("Duplicate group name <{0}>")]
    DuplicateGroupName(String),
    #[error("Inline modifiers are not supported")]
    InlineModifiers,
    #[error("Unterminated group")]
    UnterminatedGroup,
    #[error("Unterminated lookahead")]
    UnterminatedLookahead,
    #[error("Unterminated lookbehind")]
    UnterminatedLookbehind,
    #[error("Unterminated group name")]
    UnterminatedGroupName,

    // --- quantifiers ---
    #[error("Invalid brace quantifier content")]
    InvalidBraceQuantifierContent,
    #[error("Incomplete quantifier")]
    IncompleteQuantifier,
    #[error("Invalid quantifier range")]
    InvalidQuantifierRange,
    #[error("Cannot quantify anchor")]
    CannotQuantifyAnchor,
    #[error("Quantifier bound too large")]
    QuantifierTooLarge,

    // --- resource limits ---
    #[error("Pattern nesting exceeds maximum depth of {0}")]
    NestingTooDeep(usize),
}

impl ErrorKind {
    /// Stable snake_case identifier, used as the LSP and `miette` code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidFlag(_) => "invalid_flag",
            ErrorKind::DirectiveAfterPattern => "directive_after_pattern",
            ErrorKind::UnknownDirective(_) => "unknown_directive",
            ErrorKind::AlternationLacksLeft => "alternation_lacks_left_hand_side",
            ErrorKind::AlternationLacksRight => "alternation_lacks_right_hand_side",
            ErrorKind::EmptyAlternationBranch => "empty_alternation_branch",
            ErrorKind::InvalidQuantifier(_) => "invalid_quantifier",
            ErrorKind::UnmatchedParen => "unmatched_paren",
            ErrorKind::UnexpectedToken(_) => "unexpected_token",
            ErrorKind::UnexpectedTrailingInput => "unexpected_trailing_input",
            ErrorKind::UndefinedBackrefIndex(_) | ErrorKind::UndefinedBackrefName(_) => {
                "backreference_to_undefined_group"
            }
            ErrorKind::ExpectedNamedBackrefOpen => "expected_named_backref_open",
            ErrorKind::UnterminatedNamedBackref => "unterminated_named_backref",
            ErrorKind::ExpectedPropertyBrace => "expected_property_brace",
            ErrorKind::UnterminatedProperty => "unterminated_property",
            ErrorKind::EmptyProperty => "empty_property",
            ErrorKind::InvalidHexEscape => "invalid_hex_escape",
            ErrorKind::InvalidUnicodeEscape => "invalid_unicode_escape",
            ErrorKind::InvalidLongUnicodeEscape => "invalid_long_unicode_escape",
            ErrorKind::UnterminatedHexBrace => "unterminated_hex_brace",
            ErrorKind::UnterminatedUnicodeBrace => "unterminated_unicode_brace",
            ErrorKind::InvalidCodePoint(_) => "invalid_code_point",
            ErrorKind::UnknownEscape(_) => "unknown_escape_sequence",
            ErrorKind::IncompleteEscape => "incomplete_escape",
            ErrorKind::UnterminatedCharClass => "unterminated_character_class",
            ErrorKind::EmptyCharClass => "empty_character_class",
            ErrorKind::InvalidCharRange(..) => "invalid_character_range",
            ErrorKind::InvalidGroupName(_) => "invalid_group_name",
            ErrorKind::DuplicateGroupName(_) => "duplicate_group_name",
            ErrorKind::InlineModifiers => "inline_modifiers_not_supported",
            ErrorKind::UnterminatedGroup => "unterminated_group",
            ErrorKind::UnterminatedLookahead => "unterminated_lookahead",
            ErrorKind::UnterminatedLookbehind => "unterminated_lookbehind",
            ErrorKind::UnterminatedGroupName => "unterminated_group_name",
            ErrorKind::InvalidBraceQuantifierContent => "invalid_brace_quantifier_content",
            ErrorKind::IncompleteQuantifier => "incomplete_quantifier",
            ErrorKind::InvalidQuantifierRange => "invalid_quantifier_range",
            ErrorKind::CannotQuantifyAnchor => "cannot_quantify_anchor",
            ErrorKind::QuantifierTooLarge => "quantifier_too_large",
            ErrorKind::NestingTooDeep(_) => "nesting_too_deep",
        }
    }

    pub fn hint(&self) -> Option<String> {
        hints::hint_for(self)
    }
}

// ============================================================================
// PARSE ERROR
// ============================================================================

/// A single fail-fast parse failure.
///
/// `pos` is a character offset into `text`. For directive errors `text` is
/// the raw input; for everything else it is the post-directive pattern body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrlingParseError {
    kind: ErrorKind,
    pos: usize,
    text: String,
}

impl StrlingParseError {
    pub fn new(kind: ErrorKind, pos: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            pos,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The bare message, without snippet or hint.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn hint(&self) -> Option<String> {
        self.kind.hint()
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Converts this error into an LSP diagnostic with zero-based positions.
    pub fn to_lsp_diagnostic(&self) -> LspDiagnostic {
        lsp::to_lsp_diagnostic(self)
    }

    /// Wraps this error for `miette` graphical reporting.
    pub fn into_diagnostic(self) -> ParseDiagnostic {
        ParseDiagnostic { error: self }
    }

    /// Byte offset of `pos` within `text`, clamped to the end of the text.
    pub fn byte_offset(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.pos)
            .map(|(byte, _)| byte)
            .unwrap_or(self.text.len())
    }
}

impl fmt::Display for StrlingParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::render_error(self))
    }
}

impl std::error::Error for StrlingParseError {}

// ============================================================================
// MIETTE ADAPTER
// ============================================================================

/// Owned `miette` view of a parse error: message as the headline, the hint
/// as help and a single label at the failing offset.
#[derive(Debug, Clone)]
pub struct ParseDiagnostic {
    error: StrlingParseError,
}

impl ParseDiagnostic {
    pub fn error(&self) -> &StrlingParseError {
        &self.error
    }
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error.kind)
    }
}

impl std::error::Error for ParseDiagnostic {}

impl Diagnostic for ParseDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("strling::{}", self.error.code())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.error
            .hint()
            .map(|hint| Box::new(hint) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        if self.error.text.is_empty() {
            return None;
        }
        Some(&self.error.text as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.error.text.is_empty() {
            return None;
        }
        let start = self.error.byte_offset();
        let len = self.error.text[start..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(0);
        let label = LabeledSpan::new(Some(self.error.kind.to_string()), start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

#[cfg(test)]
mod diagnostics_tests {
    use super::*;

    #[test]
    fn empty_class_shares_message_but_not_hint() {
        assert_eq!(
            ErrorKind::EmptyCharClass.to_string(),
            ErrorKind::UnterminatedCharClass.to_string()
        );
        assert_ne!(ErrorKind::EmptyCharClass.hint(), ErrorKind::UnterminatedCharClass.hint());
    }

    #[test]
    fn byte_offset_accounts_for_multibyte_chars() {
        let err = StrlingParseError::new(ErrorKind::UnterminatedGroup, 2, "é(a");
        assert_eq!(err.byte_offset(), 3);
        let past_end = StrlingParseError::new(ErrorKind::UnterminatedGroup, 9, "ab");
        assert_eq!(past_end.byte_offset(), 2);
    }

    #[test]
    fn miette_adapter_exposes_code_and_help() {
        let diag = StrlingParseError::new(ErrorKind::CannotQuantifyAnchor, 1, "^*").into_diagnostic();
        assert_eq!(diag.code().unwrap().to_string(), "strling::cannot_quantify_anchor");
        assert!(diag.help().is_some());
        let labels: Vec<_> = diag.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 1);
        assert_eq!(labels[0].len(), 1);
    }
}
