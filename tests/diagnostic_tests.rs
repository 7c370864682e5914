//! Golden master tests for diagnostic output.
//!
//! These capture the exact rendered text of parse errors so that error
//! presentation stays stable across changes.

use strling::diagnostics::lsp::SEVERITY_ERROR;
use strling::diagnostics::{ErrorKind, StrlingParseError};
use strling::parse;

fn rendered(text: &str) -> String {
    parse(text).unwrap_err().to_string()
}

#[test]
fn test_unterminated_group_snippet() {
    let expected = "STRling Parse Error: Unterminated group

> 1 | (abc
>   |     ^

Hint: This group was opened with '(' but never closed. Add a matching ')' to close the group.";
    assert_eq!(rendered("(abc"), expected);
}

#[test]
fn test_anchor_quantifier_snippet() {
    let expected = "STRling Parse Error: Cannot quantify anchor

> 1 | ^*
>   |  ^

Hint: Anchors like ^, $, \\b, \\B match positions, not characters, so they cannot be quantified with *, +, ?, or {}.";
    assert_eq!(rendered("^*"), expected);
}

#[test]
fn test_snippet_on_later_line() {
    let output = rendered("%flags x\nabc\n  (def");
    assert!(output.starts_with("STRling Parse Error: Unterminated group\n\n> 2 |   (def\n>   |       ^"));
}

#[test]
fn test_wide_characters_shift_caret() {
    let error = StrlingParseError::new(ErrorKind::UnterminatedGroup, 2, "漢(");
    let output = error.to_string();
    assert!(output.contains("> 1 | 漢(\n>   |    ^"), "{output}");
}

#[test]
fn test_error_without_source_text() {
    let error = StrlingParseError::new(ErrorKind::IncompleteEscape, 3, "");
    assert_eq!(error.to_string(), "Incomplete escape at end of pattern at position 3");
}

#[test]
fn test_every_parse_error_has_code_and_message() {
    for text in ["(a", "a)", "[", "\\k<x>", "a{2,1}", "(?<1>a)", "%flags z\na"] {
        let err = parse(text).unwrap_err();
        assert!(!err.message().is_empty(), "{text:?}");
        assert!(err.code().chars().all(|c| c.is_ascii_lowercase() || c == '_'), "{text:?}");
    }
}

#[test]
fn test_lsp_diagnostic_shape() {
    let diag = parse("ab\n(c").unwrap_err().to_lsp_diagnostic();
    assert_eq!(diag.severity, SEVERITY_ERROR);
    assert_eq!(diag.source, "STRling");
    assert_eq!(diag.code, "unterminated_group");
    assert_eq!((diag.range.start.line, diag.range.start.character), (1, 2));
    assert!(diag.message.starts_with("Unterminated group\n\nHint: "));
}

#[test]
fn test_miette_report_carries_code_and_help() {
    use miette::Diagnostic;

    let diag = parse("a{5,2}").unwrap_err().into_diagnostic();
    assert_eq!(
        diag.code().map(|c| c.to_string()),
        Some("strling::invalid_quantifier_range".to_string())
    );
    assert!(diag.help().is_some());
    assert_eq!(diag.labels().map(|labels| labels.count()), Some(1));
}
