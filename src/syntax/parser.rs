//! STRling recursive-descent parser.
//!
//! Converts the post-directive pattern body into a [`Node`] tree. The parser
//! is fail-fast: the first violation becomes the only error and unwinds the
//! whole call chain with its character position.
//!
//! Grammar, informally:
//!
//! ```text
//! alt   = seq ('|' seq)*
//! seq   = (atom quant?)*
//! atom  = '.' | '^' | '$' | group | class | escape | literal
//! quant = ('*' | '+' | '?' | '{' m (',' n?)? '}') ('?' | '+')?
//! ```

use std::collections::HashSet;

use tracing::{debug, trace};

use super::cursor::Cursor;
use super::directives::extract_directives;
use super::{ClassItem, Node};
use crate::diagnostics::{ErrorKind, StrlingParseError};
use crate::primitives::{AnchorKind, EscapeKind, Flags, LookDir, Max, QuantMode};

type ParseResult<T> = Result<T, StrlingParseError>;

/// Default bound on group and lookaround nesting.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

/// Tunables for a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed nesting of groups and lookarounds.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses raw STRling text (directives included) into its flags and AST.
pub fn parse(text: &str) -> ParseResult<(Flags, Node)> {
    parse_with_options(text, &ParseOptions::default())
}

pub fn parse_with_options(text: &str, options: &ParseOptions) -> ParseResult<(Flags, Node)> {
    let directives = extract_directives(text)?;
    let mut parser = Parser::new(&directives.pattern, directives.flags, options);
    let root = parser.parse_pattern()?;
    debug!(
        captures = parser.captures.count,
        named = parser.captures.names.len(),
        "parsed pattern"
    );
    Ok((directives.flags, root))
}

// ============================================================================
// PARSER STATE
// ============================================================================

/// Capture groups opened so far in the current parse.
///
/// Backreferences are checked against this as they are read, which is what
/// rules out forward references.
#[derive(Debug, Default)]
struct CaptureScope {
    count: u32,
    names: HashSet<String>,
}

struct Parser<'a> {
    src: &'a str,
    cur: Cursor,
    captures: CaptureScope,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, flags: Flags, options: &ParseOptions) -> Self {
        Self {
            src,
            cur: Cursor::new(src, flags.extended),
            captures: CaptureScope::default(),
            depth: 0,
            max_depth: options.max_nesting_depth,
        }
    }

    fn error(&self, kind: ErrorKind, pos: usize) -> StrlingParseError {
        StrlingParseError::new(kind, pos, self.src)
    }

    fn fail<T>(&self, kind: ErrorKind, pos: usize) -> ParseResult<T> {
        Err(self.error(kind, pos))
    }

    // ------------------------------------------------------------------------
    // Alternation and sequence
    // ------------------------------------------------------------------------

    fn parse_pattern(&mut self) -> ParseResult<Node> {
        let node = self.parse_alt()?;
        self.cur.skip_ws_and_comments();
        match self.cur.peek() {
            None => Ok(node),
            Some(')') => self.fail(ErrorKind::UnmatchedParen, self.cur.pos()),
            Some('|') => self.fail(ErrorKind::AlternationLacksRight, self.cur.pos()),
            Some(_) => self.fail(ErrorKind::UnexpectedTrailingInput, self.cur.pos()),
        }
    }

    fn parse_alt(&mut self) -> ParseResult<Node> {
        self.cur.skip_ws_and_comments();
        if self.cur.peek() == Some('|') {
            return self.fail(ErrorKind::AlternationLacksLeft, self.cur.pos());
        }

        let mut branches = vec![self.parse_seq()?];
        loop {
            self.cur.skip_ws_and_comments();
            if self.cur.peek() != Some('|') {
                break;
            }
            let pipe = self.cur.pos();
            self.cur.take();
            self.cur.skip_ws_and_comments();
            match self.cur.peek() {
                None | Some(')') => return self.fail(ErrorKind::AlternationLacksRight, pipe),
                Some('|') => return self.fail(ErrorKind::EmptyAlternationBranch, pipe),
                Some(_) => {}
            }
            branches.push(self.parse_seq()?);
        }

        if branches.len() == 1 {
            return Ok(branches.remove(0));
        }
        Ok(Node::alt(branches))
    }

    fn parse_seq(&mut self) -> ParseResult<Node> {
        let mut parts: Vec<Node> = Vec::new();
        let mut prev_backtracked = false;

        loop {
            self.cur.skip_ws_and_comments();
            let Some(ch) = self.cur.peek() else { break };
            if ch == '|' || ch == ')' {
                break;
            }
            if parts.is_empty() && matches!(ch, '*' | '+' | '?' | '{') {
                return self.fail(ErrorKind::InvalidQuantifier(ch), self.cur.pos());
            }

            let atom = self.parse_atom(ch)?;
            let (node, backtracked) = self.parse_quantifier_if_any(atom)?;

            // Fresh literals fuse with the literal before them, except in
            // free-spacing mode and right after a brace that turned out literal.
            let fuse = !self.cur.is_extended() && !prev_backtracked;
            prev_backtracked = backtracked;
            if let (true, Node::Lit { value }) = (fuse, &node) {
                if let Some(Node::Lit { value: prev }) = parts.last_mut() {
                    prev.push_str(value);
                    continue;
                }
            }
            parts.push(node);
        }

        if parts.len() == 1 {
            return Ok(parts.remove(0));
        }
        Ok(Node::seq(parts))
    }

    // ------------------------------------------------------------------------
    // Atoms
    // ------------------------------------------------------------------------

    fn parse_atom(&mut self, ch: char) -> ParseResult<Node> {
        let pos = self.cur.pos();
        match ch {
            '.' => {
                self.cur.take();
                Ok(Node::Dot)
            }
            '^' => {
                self.cur.take();
                Ok(Node::anchor(AnchorKind::Start))
            }
            '$' => {
                self.cur.take();
                Ok(Node::anchor(AnchorKind::End))
            }
            '(' => self.parse_group(),
            '[' => self.parse_class(),
            '\\' => self.parse_escape(),
            ')' => self.fail(ErrorKind::UnmatchedParen, pos),
            '|' => self.fail(ErrorKind::UnexpectedToken('|'), pos),
            '*' | '+' | '?' => self.fail(ErrorKind::InvalidQuantifier(ch), pos),
            _ => {
                self.cur.take();
                Ok(Node::lit(ch))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Quantifiers
    // ------------------------------------------------------------------------

    /// Wraps `child` in a quantifier if one follows. The flag reports a `{`
    /// that was read back as a literal.
    fn parse_quantifier_if_any(&mut self, child: Node) -> ParseResult<(Node, bool)> {
        if self.cur.is_extended() {
            self.cur.skip_ws_and_comments();
        }
        let start = self.cur.pos();
        let (min, max) = match self.cur.peek() {
            Some('*') => {
                self.cur.take();
                (0, Max::Inf)
            }
            Some('+') => {
                self.cur.take();
                (1, Max::Inf)
            }
            Some('?') => {
                self.cur.take();
                (0, Max::Finite(1))
            }
            Some('{') => match self.parse_brace_bounds()? {
                Some(bounds) => bounds,
                None => {
                    trace!(pos = start, "brace read as literal");
                    return Ok((child, true));
                }
            },
            _ => return Ok((child, false)),
        };

        if matches!(child, Node::Anchor { .. }) {
            return self.fail(ErrorKind::CannotQuantifyAnchor, start);
        }
        if let Max::Finite(max) = max {
            if min > max {
                return self.fail(ErrorKind::InvalidQuantifierRange, start);
            }
        }

        let mode = if self.cur.eat('?') {
            QuantMode::Lazy
        } else if self.cur.eat('+') {
            QuantMode::Possessive
        } else {
            QuantMode::Greedy
        };
        Ok((Node::quant(child, min, max, mode), false))
    }

    /// Reads `{m}`, `{m,}` or `{m,n}`. Returns `None` with the cursor restored
    /// when the brace is a literal.
    fn parse_brace_bounds(&mut self) -> ParseResult<Option<(u32, Max)>> {
        let open = self.cur.pos();
        let mark = self.cur.checkpoint();
        self.cur.take();
        self.cur.skip_ws_and_comments();

        let min_digits = self.cur.take_while(|c| c.is_ascii_digit());
        if min_digits.is_empty() {
            if let Some(content) = self.cur.scan_to_on_line('}') {
                if content.chars().any(|c| !(c.is_ascii_digit() || c == ',')) {
                    return self.fail(ErrorKind::InvalidBraceQuantifierContent, open);
                }
            }
            self.cur.restore(mark);
            return Ok(None);
        }

        let min = self.bound(&min_digits, open)?;
        self.cur.skip_ws_and_comments();
        let max = if self.cur.eat(',') {
            self.cur.skip_ws_and_comments();
            let max_digits = self.cur.take_while(|c| c.is_ascii_digit());
            self.cur.skip_ws_and_comments();
            if max_digits.is_empty() {
                Max::Inf
            } else {
                Max::Finite(self.bound(&max_digits, open)?)
            }
        } else {
            Max::Finite(min)
        };

        if !self.cur.eat('}') {
            return self.fail(ErrorKind::IncompleteQuantifier, self.cur.pos());
        }
        Ok(Some((min, max)))
    }

    fn bound(&self, digits: &str, open: usize) -> ParseResult<u32> {
        digits
            .parse::<u32>()
            .map_err(|_| self.error(ErrorKind::QuantifierTooLarge, open))
    }

    // ------------------------------------------------------------------------
    // Escapes
    // ------------------------------------------------------------------------

    fn parse_escape(&mut self) -> ParseResult<Node> {
        let start = self.cur.pos();
        self.cur.take();
        let Some(ch) = self.cur.peek() else {
            return self.fail(ErrorKind::IncompleteEscape, start);
        };

        let anchor = match ch {
            'b' => Some(AnchorKind::WordBoundary),
            'B' => Some(AnchorKind::NotWordBoundary),
            'A' => Some(AnchorKind::AbsoluteStart),
            'Z' => Some(AnchorKind::EndBeforeFinalNewline),
            'z' => Some(AnchorKind::AbsoluteEnd),
            _ => None,
        };
        if let Some(at) = anchor {
            self.cur.take();
            return Ok(Node::anchor(at));
        }

        match ch {
            '1'..='9' => return self.parse_numeric_backref(start),
            'k' => return self.parse_named_backref(start),
            'p' | 'P' => {
                let item = self.parse_property(start)?;
                return Ok(Node::class(false, vec![item]));
            }
            _ => {}
        }
        if let Some(kind) = EscapeKind::from_letter(ch) {
            self.cur.take();
            return Ok(Node::shorthand(kind, None));
        }
        let literal = self.parse_char_escape(start, false)?;
        Ok(Node::lit(literal))
    }

    /// Reads the longest digit run whose value names an already-open group.
    fn parse_numeric_backref(&mut self, start: usize) -> ParseResult<Node> {
        let mut value: u32 = 0;
        let mut matched = false;
        while let Some(digit) = self.cur.peek().and_then(|c| c.to_digit(10)) {
            match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
                Some(next) if next <= self.captures.count => {
                    value = next;
                    matched = true;
                    self.cur.take();
                }
                _ => break,
            }
        }

        if !matched {
            let written = self.cur.take_while(|c| c.is_ascii_digit());
            let index = written.parse::<u32>().unwrap_or(u32::MAX);
            return self.fail(ErrorKind::UndefinedBackrefIndex(index), start);
        }
        Ok(Node::backref_index(value))
    }

    fn parse_named_backref(&mut self, start: usize) -> ParseResult<Node> {
        self.cur.take();
        if !self.cur.eat('<') {
            return self.fail(ErrorKind::ExpectedNamedBackrefOpen, start);
        }
        let name = self.cur.take_while(|c| c != '>');
        if !self.cur.eat('>') {
            return self.fail(ErrorKind::UnterminatedNamedBackref, start);
        }
        if !self.captures.names.contains(&name) {
            return self.fail(ErrorKind::UndefinedBackrefName(name), start);
        }
        Ok(Node::backref_name(name))
    }

    /// `\p{...}` / `\P{...}` with the cursor on the `p`.
    fn parse_property(&mut self, start: usize) -> ParseResult<ClassItem> {
        let kind = match self.cur.take() {
            Some('P') => EscapeKind::NotProperty,
            _ => EscapeKind::Property,
        };
        if !self.cur.eat('{') {
            return self.fail(ErrorKind::ExpectedPropertyBrace, start);
        }
        let name = self.cur.take_while(|c| c != '}');
        if !self.cur.eat('}') {
            return self.fail(ErrorKind::UnterminatedProperty, start);
        }
        if name.trim().is_empty() {
            return self.fail(ErrorKind::EmptyProperty, start);
        }
        Ok(ClassItem::Escape {
            kind,
            property: Some(name),
        })
    }

    /// Escapes that stand for a single character, with the cursor just past
    /// the backslash at `start`.
    fn parse_char_escape(&mut self, start: usize, in_class: bool) -> ParseResult<char> {
        let Some(ch) = self.cur.take() else {
            return self.fail(ErrorKind::IncompleteEscape, start);
        };
        match ch {
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'f' => Ok('\u{000C}'),
            'v' => Ok('\u{000B}'),
            '0' => Ok('\0'),
            'b' if in_class => Ok('\u{0008}'),
            'x' => self.parse_hex_escape(start),
            'u' => {
                if self.cur.eat('{') {
                    self.parse_braced_code_point(start, ErrorKind::UnterminatedUnicodeBrace)
                } else {
                    self.parse_fixed_code_point(start, 4, ErrorKind::InvalidUnicodeEscape)
                }
            }
            'U' => self.parse_fixed_code_point(start, 8, ErrorKind::InvalidLongUnicodeEscape),
            c if c.is_ascii_alphabetic() && !in_class => self.fail(ErrorKind::UnknownEscape(c), start),
            c if c.is_whitespace() && !in_class && !self.cur.is_extended() => {
                self.fail(ErrorKind::UnknownEscape(c), start)
            }
            c => Ok(c),
        }
    }

    fn parse_hex_escape(&mut self, start: usize) -> ParseResult<char> {
        if self.cur.eat('{') {
            return self.parse_braced_code_point(start, ErrorKind::UnterminatedHexBrace);
        }
        self.parse_fixed_code_point(start, 2, ErrorKind::InvalidHexEscape)
    }

    fn parse_braced_code_point(&mut self, start: usize, unterminated: ErrorKind) -> ParseResult<char> {
        let digits = self.cur.take_while(|c| c.is_ascii_hexdigit());
        if !self.cur.eat('}') {
            return self.fail(unterminated, start);
        }
        self.code_point(&digits, start)
    }

    fn parse_fixed_code_point(&mut self, start: usize, len: usize, invalid: ErrorKind) -> ParseResult<char> {
        let mut digits = String::with_capacity(len);
        for _ in 0..len {
            match self.cur.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    digits.push(c);
                    self.cur.take();
                }
                _ => return self.fail(invalid, start),
            }
        }
        self.code_point(&digits, start)
    }

    fn code_point(&self, digits: &str, start: usize) -> ParseResult<char> {
        if digits.is_empty() {
            return Ok('\0');
        }
        let invalid = || self.error(ErrorKind::InvalidCodePoint(digits.to_ascii_uppercase()), start);
        let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        char::from_u32(value).ok_or_else(invalid)
    }

    // ------------------------------------------------------------------------
    // Character classes
    // ------------------------------------------------------------------------

    fn parse_class(&mut self) -> ParseResult<Node> {
        self.cur.take();
        self.cur.enter_class();
        let parsed = self.parse_class_body();
        self.cur.leave_class();
        let (negated, items) = parsed?;
        Ok(Node::class(negated, items))
    }

    fn parse_class_body(&mut self) -> ParseResult<(bool, Vec<ClassItem>)> {
        let negated = self.cur.eat('^');
        let first = self.cur.pos();
        let mut items: Vec<ClassItem> = Vec::new();

        loop {
            let Some(ch) = self.cur.peek() else {
                return self.fail(ErrorKind::UnterminatedCharClass, self.cur.pos());
            };

            if ch == ']' {
                let at_first = self.cur.pos() == first;
                if at_first && matches!(self.cur.peek_at(1), None | Some(']')) {
                    return self.fail(ErrorKind::EmptyCharClass, first);
                }
                if !at_first {
                    self.cur.take();
                    return Ok((negated, items));
                }
                // a `]` in first position is a literal member
            }

            if ch == '-' && !matches!(self.cur.peek_at(1), None | Some(']')) {
                if let Some(&ClassItem::Literal { ch: from }) = items.last() {
                    let dash = self.cur.pos();
                    self.cur.take();
                    match self.parse_class_item()? {
                        ClassItem::Literal { ch: to } => {
                            if from > to {
                                return self.fail(ErrorKind::InvalidCharRange(from, to), dash);
                            }
                            items.pop();
                            items.push(ClassItem::range(from, to));
                        }
                        other => {
                            items.push(ClassItem::literal('-'));
                            items.push(other);
                        }
                    }
                    continue;
                }
            }

            items.push(self.parse_class_item()?);
        }
    }

    fn parse_class_item(&mut self) -> ParseResult<ClassItem> {
        let start = self.cur.pos();
        let Some(ch) = self.cur.take() else {
            return self.fail(ErrorKind::UnterminatedCharClass, start);
        };
        if ch != '\\' {
            return Ok(ClassItem::literal(ch));
        }

        let Some(next) = self.cur.peek() else {
            return self.fail(ErrorKind::UnterminatedCharClass, self.cur.pos());
        };
        if matches!(next, 'p' | 'P') {
            return self.parse_property(start);
        }
        if let Some(kind) = EscapeKind::from_letter(next) {
            self.cur.take();
            return Ok(ClassItem::escape(kind));
        }
        Ok(ClassItem::literal(self.parse_char_escape(start, true)?))
    }

    // ------------------------------------------------------------------------
    // Groups and lookarounds
    // ------------------------------------------------------------------------

    fn parse_group(&mut self) -> ParseResult<Node> {
        let open = self.cur.pos();
        self.cur.take();

        if self.cur.match_str("?:") {
            let body = self.parse_nested(open)?;
            self.expect_close(ErrorKind::UnterminatedGroup)?;
            return Ok(Node::non_capturing(body));
        }
        if self.cur.match_str("?>") {
            let body = self.parse_nested(open)?;
            self.expect_close(ErrorKind::UnterminatedGroup)?;
            return Ok(Node::atomic(body));
        }
        for (prefix, dir, neg) in [
            ("?=", LookDir::Ahead, false),
            ("?!", LookDir::Ahead, true),
            ("?<=", LookDir::Behind, false),
            ("?<!", LookDir::Behind, true),
        ] {
            if self.cur.match_str(prefix) {
                let body = self.parse_nested(open)?;
                let unterminated = match dir {
                    LookDir::Ahead => ErrorKind::UnterminatedLookahead,
                    LookDir::Behind => ErrorKind::UnterminatedLookbehind,
                };
                self.expect_close(unterminated)?;
                return Ok(Node::look(dir, neg, body));
            }
        }
        if self.cur.match_str("?<") {
            let name = self.read_group_name(open)?;
            let body = self.parse_nested(open)?;
            self.expect_close(ErrorKind::UnterminatedGroup)?;
            return Ok(Node::named(name, body));
        }
        if self.cur.peek() == Some('?') {
            return self.fail(ErrorKind::InlineModifiers, open + 1);
        }

        self.captures.count += 1;
        let body = self.parse_nested(open)?;
        self.expect_close(ErrorKind::UnterminatedGroup)?;
        Ok(Node::capture(body))
    }

    /// Reads `name>` after `(?<` and registers the capture before its body.
    fn read_group_name(&mut self, open: usize) -> ParseResult<String> {
        let name_start = self.cur.pos();
        let name = self.cur.take_while(|c| c != '>');
        if !self.cur.eat('>') {
            return self.fail(ErrorKind::UnterminatedGroupName, self.cur.pos());
        }
        if !is_identifier(&name) {
            return self.fail(ErrorKind::InvalidGroupName(name), name_start);
        }
        if self.captures.names.contains(&name) {
            return self.fail(ErrorKind::DuplicateGroupName(name), open);
        }
        self.captures.names.insert(name.clone());
        self.captures.count += 1;
        Ok(name)
    }

    fn parse_nested(&mut self, open: usize) -> ParseResult<Node> {
        if self.depth >= self.max_depth {
            return self.fail(ErrorKind::NestingTooDeep(self.max_depth), open);
        }
        self.depth += 1;
        let body = self.parse_alt();
        self.depth -= 1;
        body
    }

    fn expect_close(&mut self, unterminated: ErrorKind) -> ParseResult<()> {
        self.cur.skip_ws_and_comments();
        if self.cur.eat(')') {
            return Ok(());
        }
        self.fail(unterminated, self.cur.pos())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod parser_unit_tests {
    use super::*;

    #[test]
    fn identifiers_follow_ascii_word_rules() {
        assert!(is_identifier("_x1"));
        assert!(is_identifier("Year"));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }

    #[test]
    fn backtracked_brace_restores_cursor() {
        let (_, node) = parse("a{x").unwrap();
        assert_eq!(node, Node::seq(vec![Node::lit("a"), Node::lit("{x")]));
    }

    #[test]
    fn nesting_limit_is_configurable() {
        let options = ParseOptions {
            max_nesting_depth: 2,
        };
        assert!(parse_with_options("((a))", &options).is_ok());
        let err = parse_with_options("(((a)))", &options).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NestingTooDeep(2));
        assert_eq!(err.pos(), 2);
    }
}
