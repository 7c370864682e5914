//! Instructional hints for parse errors.
//!
//! Every [`ErrorKind`] is matched here exhaustively, so adding a kind forces a
//! decision about its hint. Kinds without useful guidance return `None`.

use super::ErrorKind;

const LITERAL_ESCAPE_NOTE: &str = "If you meant a literal '[', escape it with '\\['.";

pub fn hint_for(kind: &ErrorKind) -> Option<String> {
    let text = match kind {
        ErrorKind::InvalidFlag(_) => "Unknown flag. Valid flags are: i (case-insensitive), m (multiline), \
             s (dotAll), u (unicode), x (extended/free-spacing)."
            .to_string(),
        ErrorKind::DirectiveAfterPattern => "Directives such as '%flags' must appear at the start of the \
             pattern (before any pattern content). Move the directive to the top of the input on its own line."
            .to_string(),
        ErrorKind::UnknownDirective(_) => "This directive looks malformed. Directives begin with '%' and must \
             be one of the supported forms, for example '%flags i' on a line by itself. \
             To match a literal '%', escape it with '\\%'."
            .to_string(),

        ErrorKind::AlternationLacksLeft => "The alternation operator '|' requires an expression on the left \
             side. Use 'a|b' to match either 'a' or 'b'."
            .to_string(),
        ErrorKind::AlternationLacksRight => "The alternation operator '|' requires an expression on the right \
             side. Use 'a|b' to match either 'a' or 'b'."
            .to_string(),
        ErrorKind::EmptyAlternationBranch => "One of the alternation branches is empty. Remove the empty branch \
             or provide an expression, e.g., 'a|b' instead of 'a||b'."
            .to_string(),
        ErrorKind::InvalidQuantifier(q) => format!(
            "The quantifier '{q}' must follow an atom (a character or group). \
             Place '{q}' after the thing it should quantify, e.g., 'a{q}'."
        ),
        ErrorKind::UnmatchedParen => "This ')' character does not have a matching opening '('. \
             Did you mean to escape it with '\\)'?"
            .to_string(),
        ErrorKind::UnexpectedToken('|') => "The alternation operator '|' requires expressions on both sides. \
             Use 'a|b' to match either 'a' or 'b'."
            .to_string(),
        ErrorKind::UnexpectedToken(_) => "This character appeared in an unexpected context.".to_string(),
        ErrorKind::UnexpectedTrailingInput => "There is unexpected content after the pattern ended. \
             Check for unmatched parentheses or extra characters."
            .to_string(),

        ErrorKind::UndefinedBackrefIndex(_) | ErrorKind::UndefinedBackrefName(_) => {
            "Backreferences refer to previously captured groups. Make sure the group is defined before \
             referencing it. STRling does not support forward references."
                .to_string()
        }
        ErrorKind::ExpectedNamedBackrefOpen | ErrorKind::UnterminatedNamedBackref => {
            "Named backreferences use the syntax \\k<name>. Make sure to close the '<name>' with '>'."
                .to_string()
        }

        ErrorKind::ExpectedPropertyBrace => "Unicode property escapes require braces: \\p{Letter} or \
             \\P{Letter}. Use \\p{L} for letters, \\p{N} for numbers, etc."
            .to_string(),
        ErrorKind::UnterminatedProperty => "Unicode property escapes use the syntax \\p{Property} or \
             \\P{Property}. Make sure to close the property name with '}'."
            .to_string(),
        ErrorKind::EmptyProperty => "Unicode property escapes need a property name between the braces, \
             e.g., \\p{L} or \\p{Greek}."
            .to_string(),
        ErrorKind::InvalidHexEscape => "Hex escapes must use valid hexadecimal digits (0-9, A-F). \
             Use \\xHH for 2-digit hex codes (e.g., \\x41 for 'A')."
            .to_string(),
        ErrorKind::InvalidUnicodeEscape | ErrorKind::InvalidLongUnicodeEscape => {
            "Unicode escapes must use valid hexadecimal digits (0-9, A-F). \
             Use \\uHHHH for 4-digit codes or \\u{...} for variable-length codes."
                .to_string()
        }
        ErrorKind::UnterminatedHexBrace => "Variable-length hex escapes use the syntax \\x{...}. \
             Make sure to close the escape with '}'."
            .to_string(),
        ErrorKind::UnterminatedUnicodeBrace => "Variable-length unicode escapes use the syntax \\u{...}. \
             Make sure to close the escape with '}'."
            .to_string(),
        ErrorKind::InvalidCodePoint(_) => "Code points must be Unicode scalar values: at most 10FFFF and \
             outside the surrogate range D800-DFFF."
            .to_string(),
        ErrorKind::UnknownEscape(c) => format!(
            "Unknown escape sequence '\\{c}'. If you intended a literal '{c}', remove the backslash \
             or use a recognized escape."
        ),
        ErrorKind::IncompleteEscape => return None,

        ErrorKind::UnterminatedCharClass => "This character class was opened with '[' but never closed. \
             Add a matching ']' to close the character class."
            .to_string(),
        ErrorKind::EmptyCharClass => format!(
            "Empty character class '[]' detected. Character classes must contain at least one element \
             (e.g., [a-z]) and cannot be left empty. {LITERAL_ESCAPE_NOTE}"
        ),
        ErrorKind::InvalidCharRange(..) => "Character ranges must be ascending, e.g., '[a-z]' or '[0-9]'. \
             Reversed ranges like '[z-a]' are invalid."
            .to_string(),

        ErrorKind::InvalidGroupName(_) => "Named groups require identifiers: IDENTIFIER = letter or '_' \
             followed by letters, digits or '_'. Choose a name that starts with a letter or underscore \
             and contains only letters, digits, or underscores."
            .to_string(),
        ErrorKind::DuplicateGroupName(_) => "Each named group must have a unique name. Use different names \
             for different groups, or use unnamed groups ()."
            .to_string(),
        ErrorKind::InlineModifiers => "STRling does not support inline modifiers like (?i) for \
             case-insensitivity. Instead, use the %flags directive at the start of your pattern: '%flags i'"
            .to_string(),
        ErrorKind::UnterminatedGroup => "This group was opened with '(' but never closed. \
             Add a matching ')' to close the group."
            .to_string(),
        ErrorKind::UnterminatedLookahead => "This lookahead was opened with '(?=' or '(?!' but never closed. \
             Add a matching ')' to close the lookahead."
            .to_string(),
        ErrorKind::UnterminatedLookbehind => "This lookbehind was opened with '(?<=' or '(?<!' but never \
             closed. Add a matching ')' to close the lookbehind."
            .to_string(),
        ErrorKind::UnterminatedGroupName => "Named groups use the syntax (?<name>...). Make sure to close \
             the '<name>' with '>' before the group content."
            .to_string(),

        ErrorKind::InvalidBraceQuantifierContent => "Brace quantifiers require numeric digits: use {n}, \
             {m,n}, or {m,}. Only numbers are valid inside braces. To match a literal '{', escape it with '\\{'."
            .to_string(),
        ErrorKind::IncompleteQuantifier => "Brace quantifiers use the syntax {m,n} or {n}. \
             Make sure to include the closing '}'."
            .to_string(),
        ErrorKind::InvalidQuantifierRange => "Quantifier ranges must have the minimum less than or equal to \
             the maximum (m <= n). For example, use '{2,5}' or '{2,2}', not '{5,2}'."
            .to_string(),
        ErrorKind::CannotQuantifyAnchor => "Anchors like ^, $, \\b, \\B match positions, not characters, \
             so they cannot be quantified with *, +, ?, or {}."
            .to_string(),
        ErrorKind::QuantifierTooLarge => "Quantifier bounds must fit in an unsigned 32-bit integer. \
             Use '*' or '{m,}' for an unbounded repetition."
            .to_string(),

        ErrorKind::NestingTooDeep(_) => "Flatten the pattern by removing redundant groups, or split it \
             into smaller patterns."
            .to_string(),
    };
    Some(text)
}

#[cfg(test)]
mod hints_tests {
    use super::*;

    #[test]
    fn dynamic_hints_mention_the_offending_character() {
        let hint = hint_for(&ErrorKind::UnknownEscape('q')).unwrap();
        assert!(hint.starts_with("Unknown escape sequence '\\q'"));
        assert!(hint.contains("literal 'q'"));

        let hint = hint_for(&ErrorKind::InvalidQuantifier('+')).unwrap();
        assert!(hint.contains("e.g., 'a+'"));
    }

    #[test]
    fn unexpected_pipe_gets_alternation_guidance() {
        let hint = hint_for(&ErrorKind::UnexpectedToken('|')).unwrap();
        assert!(hint.contains("both sides"));
        let other = hint_for(&ErrorKind::UnexpectedToken('#')).unwrap();
        assert_eq!(other, "This character appeared in an unexpected context.");
    }

    #[test]
    fn incomplete_escape_has_no_hint() {
        assert_eq!(hint_for(&ErrorKind::IncompleteEscape), None);
    }

    #[test]
    fn continuation_lines_do_not_leave_double_spaces() {
        let hint = hint_for(&ErrorKind::DirectiveAfterPattern).unwrap();
        assert!(!hint.contains("  "), "{hint}");
    }
}
