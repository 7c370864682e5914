//! Leaf vocabulary shared by the AST and the IR.
//!
//! Both trees are built from the same small set of scalar descriptors (anchor
//! kinds, quantifier modes, lookaround directions, shorthand escapes and the
//! flag set). Keeping them here lets the emitter depend on the IR without ever
//! importing AST types.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// FLAGS
// ============================================================================

/// The pattern-wide modifier set selected by the `%flags` directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flags {
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub extended: bool,
}

impl Flags {
    /// Canonical flag letters, in emission order.
    pub const LETTERS: [char; 5] = ['i', 'm', 's', 'u', 'x'];

    /// Sets the flag named by `letter`. Returns `false` for letters outside `imsux`.
    pub fn set_letter(&mut self, letter: char) -> bool {
        match letter {
            'i' => self.ignore_case = true,
            'm' => self.multiline = true,
            's' => self.dot_all = true,
            'u' => self.unicode = true,
            'x' => self.extended = true,
            _ => return false,
        }
        true
    }

    /// The letters of every set flag, in `imsux` order.
    pub fn letters(&self) -> String {
        let set = [
            self.ignore_case,
            self.multiline,
            self.dot_all,
            self.unicode,
            self.extended,
        ];
        Self::LETTERS
            .iter()
            .zip(set)
            .filter_map(|(letter, on)| on.then_some(*letter))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == Flags::default()
    }
}

// ============================================================================
// NODE DESCRIPTORS
// ============================================================================

/// Zero-width position assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorKind {
    Start,
    End,
    WordBoundary,
    NotWordBoundary,
    AbsoluteStart,
    EndBeforeFinalNewline,
    AbsoluteEnd,
}

/// How a quantifier consumes input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantMode {
    #[default]
    Greedy,
    Lazy,
    Possessive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookDir {
    Ahead,
    Behind,
}

/// Upper bound of a quantifier. Serializes as an integer or the string `"Inf"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MaxRepr", into = "MaxRepr")]
pub enum Max {
    Finite(u32),
    Inf,
}

impl Max {
    pub fn is_inf(&self) -> bool {
        matches!(self, Max::Inf)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum MaxRepr {
    Count(u32),
    Word(String),
}

impl From<Max> for MaxRepr {
    fn from(max: Max) -> Self {
        match max {
            Max::Finite(n) => MaxRepr::Count(n),
            Max::Inf => MaxRepr::Word("Inf".to_string()),
        }
    }
}

impl TryFrom<MaxRepr> for Max {
    type Error = String;

    fn try_from(repr: MaxRepr) -> Result<Self, Self::Error> {
        match repr {
            MaxRepr::Count(n) => Ok(Max::Finite(n)),
            MaxRepr::Word(word) if word == "Inf" => Ok(Max::Inf),
            MaxRepr::Word(word) => Err(format!("expected an integer or \"Inf\", found \"{word}\"")),
        }
    }
}

impl fmt::Display for Max {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Max::Finite(n) => write!(f, "{n}"),
            Max::Inf => f.write_str("Inf"),
        }
    }
}

/// Shorthand class escapes (`\d`, `\W`, `\p{L}`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscapeKind {
    #[serde(rename = "d")]
    Digit,
    #[serde(rename = "D")]
    NotDigit,
    #[serde(rename = "w")]
    Word,
    #[serde(rename = "W")]
    NotWord,
    #[serde(rename = "s")]
    Space,
    #[serde(rename = "S")]
    NotSpace,
    #[serde(rename = "p")]
    Property,
    #[serde(rename = "P")]
    NotProperty,
}

impl EscapeKind {
    /// Maps the letter following a backslash to its shorthand kind.
    pub fn from_letter(letter: char) -> Option<Self> {
        Some(match letter {
            'd' => EscapeKind::Digit,
            'D' => EscapeKind::NotDigit,
            'w' => EscapeKind::Word,
            'W' => EscapeKind::NotWord,
            's' => EscapeKind::Space,
            'S' => EscapeKind::NotSpace,
            'p' => EscapeKind::Property,
            'P' => EscapeKind::NotProperty,
            _ => return None,
        })
    }

    pub fn letter(&self) -> char {
        match self {
            EscapeKind::Digit => 'd',
            EscapeKind::NotDigit => 'D',
            EscapeKind::Word => 'w',
            EscapeKind::NotWord => 'W',
            EscapeKind::Space => 's',
            EscapeKind::NotSpace => 'S',
            EscapeKind::Property => 'p',
            EscapeKind::NotProperty => 'P',
        }
    }

    /// The same shorthand with its sense inverted (`d` <-> `D`, `p` <-> `P`).
    pub fn complement(&self) -> Self {
        match self {
            EscapeKind::Digit => EscapeKind::NotDigit,
            EscapeKind::NotDigit => EscapeKind::Digit,
            EscapeKind::Word => EscapeKind::NotWord,
            EscapeKind::NotWord => EscapeKind::Word,
            EscapeKind::Space => EscapeKind::NotSpace,
            EscapeKind::NotSpace => EscapeKind::Space,
            EscapeKind::Property => EscapeKind::NotProperty,
            EscapeKind::NotProperty => EscapeKind::Property,
        }
    }

    pub fn is_property(&self) -> bool {
        matches!(self, EscapeKind::Property | EscapeKind::NotProperty)
    }
}
