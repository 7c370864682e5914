//! STRling surface syntax: the AST and the front end that produces it.
//!
//! Text flows `directives` → `parser` (driving a `cursor`) → [`Node`]. The
//! AST is a closed sum type; its serde form is the `"kind"`-tagged object
//! used by conformance fixtures and parse artifacts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::primitives::{AnchorKind, EscapeKind, Flags, LookDir, Max, QuantMode};

pub mod cursor;
pub mod directives;
pub mod parser;

pub use parser::{parse, parse_with_options, ParseOptions, DEFAULT_MAX_NESTING_DEPTH};

// ============================================================================
// NODES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    Alt {
        branches: Vec<Node>,
    },
    Seq {
        parts: Vec<Node>,
    },
    Lit {
        value: String,
    },
    Dot,
    Anchor {
        at: AnchorKind,
    },
    CharClass {
        negated: bool,
        items: Vec<ClassItem>,
    },
    Quant {
        child: Box<Node>,
        min: u32,
        max: Max,
        mode: QuantMode,
    },
    Group {
        capturing: bool,
        body: Box<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        atomic: Option<bool>,
    },
    /// Exactly one of `by_index` / `by_name` is set by the parser.
    Backref {
        #[serde(rename = "byIndex", default, skip_serializing_if = "Option::is_none")]
        by_index: Option<u32>,
        #[serde(rename = "byName", default, skip_serializing_if = "Option::is_none")]
        by_name: Option<String>,
    },
    Look {
        dir: LookDir,
        neg: bool,
        body: Box<Node>,
    },
}

/// A member of a bracketed character class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClassItem {
    #[serde(rename = "Char")]
    Literal {
        #[serde(rename = "char")]
        ch: char,
    },
    Range {
        from: char,
        to: char,
    },
    #[serde(rename = "Esc")]
    Escape {
        #[serde(rename = "type")]
        kind: EscapeKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        property: Option<String>,
    },
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl Node {
    pub fn lit(value: impl Into<String>) -> Self {
        Node::Lit {
            value: value.into(),
        }
    }

    pub fn seq(parts: Vec<Node>) -> Self {
        Node::Seq { parts }
    }

    pub fn alt(branches: Vec<Node>) -> Self {
        Node::Alt { branches }
    }

    pub fn anchor(at: AnchorKind) -> Self {
        Node::Anchor { at }
    }

    pub fn quant(child: Node, min: u32, max: Max, mode: QuantMode) -> Self {
        Node::Quant {
            child: Box::new(child),
            min,
            max,
            mode,
        }
    }

    pub fn capture(body: Node) -> Self {
        Node::Group {
            capturing: true,
            body: Box::new(body),
            name: None,
            atomic: None,
        }
    }

    pub fn named(name: impl Into<String>, body: Node) -> Self {
        Node::Group {
            capturing: true,
            body: Box::new(body),
            name: Some(name.into()),
            atomic: None,
        }
    }

    pub fn non_capturing(body: Node) -> Self {
        Node::Group {
            capturing: false,
            body: Box::new(body),
            name: None,
            atomic: None,
        }
    }

    pub fn atomic(body: Node) -> Self {
        Node::Group {
            capturing: false,
            body: Box::new(body),
            name: None,
            atomic: Some(true),
        }
    }

    pub fn backref_index(index: u32) -> Self {
        Node::Backref {
            by_index: Some(index),
            by_name: None,
        }
    }

    pub fn backref_name(name: impl Into<String>) -> Self {
        Node::Backref {
            by_index: None,
            by_name: Some(name.into()),
        }
    }

    pub fn look(dir: LookDir, neg: bool, body: Node) -> Self {
        Node::Look {
            dir,
            neg,
            body: Box::new(body),
        }
    }

    pub fn class(negated: bool, items: Vec<ClassItem>) -> Self {
        Node::CharClass { negated, items }
    }

    /// A one-item class holding a shorthand escape such as `\d`.
    pub fn shorthand(kind: EscapeKind, property: Option<String>) -> Self {
        Node::CharClass {
            negated: false,
            items: vec![ClassItem::Escape { kind, property }],
        }
    }
}

impl ClassItem {
    pub fn literal(ch: char) -> Self {
        ClassItem::Literal { ch }
    }

    pub fn range(from: char, to: char) -> Self {
        ClassItem::Range { from, to }
    }

    pub fn escape(kind: EscapeKind) -> Self {
        ClassItem::Escape {
            kind,
            property: None,
        }
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// A structural rule broken by an AST that did not come from the parser,
/// such as one hydrated from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    #[error("alternation has no branches")]
    EmptyAlternation,
    #[error("backreference must set exactly one of byIndex or byName")]
    BackrefTarget,
    #[error("quantifier minimum {min} exceeds maximum {max}")]
    QuantifierRange { min: u32, max: u32 },
    #[error("character range {from:?}-{to:?} is out of order")]
    ClassRange { from: char, to: char },
    #[error("\\{0} escape requires a property name")]
    MissingProperty(char),
    #[error("\\{0} escape does not take a property name")]
    UnexpectedProperty(char),
}

impl Node {
    /// Checks the invariants the parser guarantees by construction.
    pub fn validate(&self) -> Result<(), AstError> {
        match self {
            Node::Alt { branches } => {
                if branches.is_empty() {
                    return Err(AstError::EmptyAlternation);
                }
                branches.iter().try_for_each(Node::validate)
            }
            Node::Seq { parts } => parts.iter().try_for_each(Node::validate),
            Node::CharClass { items, .. } => items.iter().try_for_each(ClassItem::validate),
            Node::Quant { child, min, max, .. } => {
                if let Max::Finite(max) = max {
                    if min > max {
                        return Err(AstError::QuantifierRange {
                            min: *min,
                            max: *max,
                        });
                    }
                }
                child.validate()
            }
            Node::Group { body, .. } | Node::Look { body, .. } => body.validate(),
            Node::Backref { by_index, by_name } => match (by_index, by_name) {
                (Some(_), None) | (None, Some(_)) => Ok(()),
                _ => Err(AstError::BackrefTarget),
            },
            Node::Lit { .. } | Node::Dot | Node::Anchor { .. } => Ok(()),
        }
    }
}

impl ClassItem {
    pub fn validate(&self) -> Result<(), AstError> {
        match self {
            ClassItem::Literal { .. } => Ok(()),
            ClassItem::Range { from, to } if from > to => Err(AstError::ClassRange {
                from: *from,
                to: *to,
            }),
            ClassItem::Range { .. } => Ok(()),
            ClassItem::Escape { kind, property } => match (kind.is_property(), property) {
                (true, None) => Err(AstError::MissingProperty(kind.letter())),
                (false, Some(_)) => Err(AstError::UnexpectedProperty(kind.letter())),
                _ => Ok(()),
            },
        }
    }
}
