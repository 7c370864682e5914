//! Regex back ends.
//!
//! [`Emitter`] turns normalized IR into a pattern string for one regex
//! dialect. [`Pcre2Emitter`] is the PCRE2 back end: it escapes literals,
//! applies shorthand class forms, and inserts `(?:...)` wherever precedence
//! would otherwise change the meaning of the tree.

use tracing::debug;

use crate::ir::{IrClassItem, IrNode};
use crate::primitives::{AnchorKind, EscapeKind, Flags, LookDir, Max, QuantMode};

/// A regex dialect back end.
pub trait Emitter {
    /// Renders `ir`, prefixed with the inline form of `flags` when given.
    fn emit(&self, ir: &IrNode, flags: Option<&Flags>) -> String;
}

/// Emits PCRE2 syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pcre2Emitter;

impl Emitter for Pcre2Emitter {
    fn emit(&self, ir: &IrNode, flags: Option<&Flags>) -> String {
        let ctx = EmitContext {
            extended: flags.is_some_and(|f| f.extended),
        };
        let body = ctx.node(ir, Parent::Root);
        let prefix = flags
            .map(Flags::letters)
            .filter(|letters| !letters.is_empty())
            .map(|letters| format!("(?{letters})"))
            .unwrap_or_default();
        debug!(len = prefix.len() + body.len(), "emitted PCRE2 pattern");
        prefix + &body
    }
}

/// Emits `ir` as PCRE2.
pub fn emit(ir: &IrNode, flags: Option<&Flags>) -> String {
    Pcre2Emitter.emit(ir, flags)
}

// ============================================================================
// RENDERING
// ============================================================================

/// Where a node sits, as far as alternation precedence is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    Root,
    Seq,
    Quant,
    Group,
}

struct EmitContext {
    /// Literal whitespace and `#` must survive an `(?x)` prefix.
    extended: bool,
}

impl EmitContext {
    fn node(&self, node: &IrNode, parent: Parent) -> String {
        match node {
            IrNode::Lit { value } => value.chars().map(|c| self.literal(c)).collect(),
            IrNode::Dot => ".".to_string(),
            IrNode::Anchor { at } => anchor(*at).to_string(),
            IrNode::Backref { by_index, by_name } => backref(*by_index, by_name.as_deref()),
            IrNode::CharClass { negated, items } => class(*negated, items),
            IrNode::Seq { parts } => self.seq(parts),
            IrNode::Alt { branches } => {
                let body = branches
                    .iter()
                    .map(|b| self.node(b, Parent::Group))
                    .collect::<Vec<_>>()
                    .join("|");
                match parent {
                    Parent::Seq | Parent::Quant => format!("(?:{body})"),
                    Parent::Root | Parent::Group => body,
                }
            }
            IrNode::Quant {
                child,
                min,
                max,
                mode,
            } => {
                let inner = self.node(child, Parent::Quant);
                let inner = if needs_group(child) && !matches!(**child, IrNode::Alt { .. }) {
                    format!("(?:{inner})")
                } else {
                    inner
                };
                format!("{inner}{}", quantifier(*min, *max, *mode))
            }
            IrNode::Group {
                capturing,
                body,
                name,
                atomic,
            } => {
                let open = if *atomic == Some(true) {
                    "(?>".to_string()
                } else if let Some(name) = name {
                    format!("(?<{name}>")
                } else if *capturing {
                    "(".to_string()
                } else {
                    "(?:".to_string()
                };
                format!("{open}{})", self.node(body, Parent::Group))
            }
            IrNode::Look { dir, neg, body } => {
                let open = match (dir, neg) {
                    (LookDir::Ahead, false) => "(?=",
                    (LookDir::Ahead, true) => "(?!",
                    (LookDir::Behind, false) => "(?<=",
                    (LookDir::Behind, true) => "(?<!",
                };
                format!("{open}{})", self.node(body, Parent::Group))
            }
        }
    }

    fn seq(&self, parts: &[IrNode]) -> String {
        let rendered: Vec<String> = parts.iter().map(|p| self.node(p, Parent::Seq)).collect();
        let mut out = String::new();
        for (i, (part, text)) in parts.iter().zip(&rendered).enumerate() {
            let digit_follows = rendered
                .get(i + 1)
                .and_then(|next| next.chars().next())
                .is_some_and(|c| c.is_ascii_digit());
            // `\1` followed by `0` would read back as `\10`
            if matches!(part, IrNode::Backref { by_name: None, .. }) && digit_follows {
                out.push_str(&format!("(?:{text})"));
            } else {
                out.push_str(text);
            }
        }
        out
    }

    fn literal(&self, c: char) -> String {
        match c {
            '.' | '^' | '$' | '|' | '(' | ')' | '?' | '*' | '+' | '{' | '}' | '[' | ']' | '\\' => {
                format!("\\{c}")
            }
            '#' if self.extended => "\\#".to_string(),
            c if self.extended && c.is_whitespace() => escape_whitespace(c),
            c => c.to_string(),
        }
    }
}

/// Whether a quantified child must be wrapped so the quantifier applies to
/// all of it.
fn needs_group(child: &IrNode) -> bool {
    match child {
        IrNode::Lit { value } => value.chars().count() != 1,
        IrNode::Seq { parts } => match parts.as_slice() {
            [only] => needs_group(only),
            _ => true,
        },
        IrNode::Alt { .. } | IrNode::Look { .. } | IrNode::Quant { .. } | IrNode::Anchor { .. } => true,
        IrNode::Dot | IrNode::CharClass { .. } | IrNode::Group { .. } | IrNode::Backref { .. } => false,
    }
}

fn escape_whitespace(c: char) -> String {
    match c {
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        '\u{000C}' => "\\f".to_string(),
        '\u{000B}' => "\\v".to_string(),
        ' ' => "\\ ".to_string(),
        c => format!("\\x{{{:X}}}", c as u32),
    }
}

fn anchor(at: AnchorKind) -> &'static str {
    match at {
        AnchorKind::Start => "^",
        AnchorKind::End => "$",
        AnchorKind::WordBoundary => "\\b",
        AnchorKind::NotWordBoundary => "\\B",
        AnchorKind::AbsoluteStart => "\\A",
        AnchorKind::EndBeforeFinalNewline => "\\Z",
        AnchorKind::AbsoluteEnd => "\\z",
    }
}

fn backref(by_index: Option<u32>, by_name: Option<&str>) -> String {
    match (by_name, by_index) {
        (Some(name), _) => format!("\\k<{name}>"),
        (None, Some(index)) => format!("\\{index}"),
        (None, None) => String::new(),
    }
}

fn quantifier(min: u32, max: Max, mode: QuantMode) -> String {
    let base = match (min, max) {
        (0, Max::Inf) => "*".to_string(),
        (1, Max::Inf) => "+".to_string(),
        (0, Max::Finite(1)) => "?".to_string(),
        (n, Max::Inf) => format!("{{{n},}}"),
        (m, Max::Finite(n)) if m == n => format!("{{{n}}}"),
        (m, Max::Finite(n)) => format!("{{{m},{n}}}"),
    };
    let suffix = match mode {
        QuantMode::Greedy => "",
        QuantMode::Lazy => "?",
        QuantMode::Possessive => "+",
    };
    base + suffix
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

fn class(negated: bool, items: &[IrClassItem]) -> String {
    if let [only] = items {
        if let Some(shorthand) = single_item_shorthand(negated, only) {
            return shorthand;
        }
    }
    let mut out = String::from(if negated { "[^" } else { "[" });
    for item in items {
        match item {
            IrClassItem::Literal { ch } => out.push_str(&class_char(*ch)),
            IrClassItem::Range { from, to } => {
                out.push_str(&class_char(*from));
                out.push('-');
                out.push_str(&class_char(*to));
            }
            IrClassItem::Escape { kind, property } => out.push_str(&escape(*kind, property.as_deref())),
        }
    }
    out.push(']');
    out
}

/// `\d`, `\P{L}` and friends for a class holding one shorthand escape, or one
/// `0-9` range. A negated class flips the escape's case instead.
fn single_item_shorthand(negated: bool, item: &IrClassItem) -> Option<String> {
    match item {
        IrClassItem::Escape { kind, property } => {
            let kind = if negated { kind.complement() } else { *kind };
            Some(escape(kind, property.as_deref()))
        }
        IrClassItem::Range { from: '0', to: '9' } => {
            let kind = if negated {
                EscapeKind::NotDigit
            } else {
                EscapeKind::Digit
            };
            Some(escape(kind, None))
        }
        IrClassItem::Range { .. } | IrClassItem::Literal { .. } => None,
    }
}

fn escape(kind: EscapeKind, property: Option<&str>) -> String {
    if kind.is_property() {
        return format!("\\{}{{{}}}", kind.letter(), property.unwrap_or_default());
    }
    format!("\\{}", kind.letter())
}

fn class_char(c: char) -> String {
    match c {
        // `[` could otherwise open a POSIX `[:name:]` set
        ']' | '[' | '\\' | '-' | '^' => format!("\\{c}"),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        '\u{000C}' => "\\f".to_string(),
        '\u{000B}' => "\\v".to_string(),
        c if c.is_control() => format!("\\x{{{:02X}}}", c as u32),
        c => c.to_string(),
    }
}
