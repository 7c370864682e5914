//! AST → IR lowering, normalization and feature detection.
//!
//! `lower` is a structural one-to-one mapping. `normalize` then flattens
//! nested sequences and alternations, fuses adjacent literals and collapses
//! single-element containers. Running `normalize` twice is the same as
//! running it once.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ir::{IrClassItem, IrNode};
use crate::primitives::{LookDir, QuantMode};
use crate::syntax::{ClassItem, Node};

// ============================================================================
// FEATURES
// ============================================================================

/// Advanced constructs a pattern uses. Declared in alphabetical order so the
/// derived ordering matches the serialized names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    AtomicGroup,
    Backreference,
    Lookahead,
    Lookbehind,
    NamedGroup,
    PossessiveQuantifier,
    UnicodeProperty,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::AtomicGroup => "atomic_group",
            Feature::Backreference => "backreference",
            Feature::Lookahead => "lookahead",
            Feature::Lookbehind => "lookbehind",
            Feature::NamedGroup => "named_group",
            Feature::PossessiveQuantifier => "possessive_quantifier",
            Feature::UnicodeProperty => "unicode_property",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub features_used: Vec<Feature>,
}

/// Normalized IR plus the features it exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOutput {
    pub ir: IrNode,
    pub metadata: Metadata,
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Lowers and normalizes `ast`.
pub fn compile(ast: &Node) -> IrNode {
    let lowered = lower(ast);
    let ir = normalize(lowered);
    debug!("compiled AST to normalized IR");
    ir
}

pub fn compile_with_metadata(ast: &Node) -> CompileOutput {
    let ir = compile(ast);
    let features_used = features_used(&ir);
    debug!(features = ?features_used, "detected features");
    CompileOutput {
        ir,
        metadata: Metadata { features_used },
    }
}

/// Maps every AST node to its IR counterpart without changing structure.
pub fn lower(node: &Node) -> IrNode {
    match node {
        Node::Alt { branches } => IrNode::alt(branches.iter().map(lower).collect()),
        Node::Seq { parts } => IrNode::seq(parts.iter().map(lower).collect()),
        Node::Lit { value } => IrNode::lit(value.clone()),
        Node::Dot => IrNode::Dot,
        Node::Anchor { at } => IrNode::Anchor { at: *at },
        Node::CharClass { negated, items } => {
            IrNode::class(*negated, items.iter().map(lower_class_item).collect())
        }
        Node::Quant {
            child,
            min,
            max,
            mode,
        } => IrNode::quant(lower(child), *min, *max, *mode),
        Node::Group {
            capturing,
            body,
            name,
            atomic,
        } => IrNode::Group {
            capturing: *capturing,
            body: Box::new(lower(body)),
            name: name.clone(),
            atomic: *atomic,
        },
        Node::Backref { by_index, by_name } => IrNode::Backref {
            by_index: *by_index,
            by_name: by_name.clone(),
        },
        Node::Look { dir, neg, body } => IrNode::Look {
            dir: *dir,
            neg: *neg,
            body: Box::new(lower(body)),
        },
    }
}

fn lower_class_item(item: &ClassItem) -> IrClassItem {
    match item {
        ClassItem::Literal { ch } => IrClassItem::Literal { ch: *ch },
        ClassItem::Range { from, to } => IrClassItem::Range {
            from: *from,
            to: *to,
        },
        ClassItem::Escape { kind, property } => IrClassItem::Escape {
            kind: *kind,
            property: property.clone(),
        },
    }
}

/// Rewrites `node` into canonical form, children first.
pub fn normalize(node: IrNode) -> IrNode {
    match node {
        IrNode::Seq { parts } => normalize_seq(parts),
        IrNode::Alt { branches } => normalize_alt(branches),
        IrNode::Quant {
            child,
            min,
            max,
            mode,
        } => IrNode::quant(normalize(*child), min, max, mode),
        IrNode::Group {
            capturing,
            body,
            name,
            atomic,
        } => IrNode::Group {
            capturing,
            body: Box::new(normalize(*body)),
            name,
            atomic,
        },
        IrNode::Look { dir, neg, body } => IrNode::Look {
            dir,
            neg,
            body: Box::new(normalize(*body)),
        },
        leaf => leaf,
    }
}

fn normalize_seq(parts: Vec<IrNode>) -> IrNode {
    let mut flat: Vec<IrNode> = Vec::with_capacity(parts.len());
    for part in parts.into_iter().map(normalize) {
        match part {
            IrNode::Seq { parts: inner } => flat.extend(inner),
            other => flat.push(other),
        }
    }

    let mut fused: Vec<IrNode> = Vec::with_capacity(flat.len());
    let mut pending = String::new();
    for part in flat {
        match part {
            IrNode::Lit { value } => pending.push_str(&value),
            other => {
                if !pending.is_empty() {
                    fused.push(IrNode::lit(std::mem::take(&mut pending)));
                }
                fused.push(other);
            }
        }
    }
    if !pending.is_empty() {
        fused.push(IrNode::lit(pending));
    }

    if fused.len() == 1 {
        return fused.remove(0);
    }
    IrNode::seq(fused)
}

fn normalize_alt(branches: Vec<IrNode>) -> IrNode {
    let mut flat: Vec<IrNode> = Vec::with_capacity(branches.len());
    for branch in branches.into_iter().map(normalize) {
        match branch {
            IrNode::Alt { branches: inner } => flat.extend(inner),
            other => flat.push(other),
        }
    }
    if flat.len() == 1 {
        return flat.remove(0);
    }
    IrNode::alt(flat)
}

/// Features used anywhere in `ir`, sorted and de-duplicated.
pub fn features_used(ir: &IrNode) -> Vec<Feature> {
    let mut found = BTreeSet::new();
    ir.walk(&mut |node| match node {
        IrNode::Group { atomic, name, .. } => {
            if *atomic == Some(true) {
                found.insert(Feature::AtomicGroup);
            }
            if name.is_some() {
                found.insert(Feature::NamedGroup);
            }
        }
        IrNode::Quant { mode, .. } => {
            if *mode == QuantMode::Possessive {
                found.insert(Feature::PossessiveQuantifier);
            }
        }
        IrNode::Look { dir, .. } => {
            found.insert(match dir {
                LookDir::Ahead => Feature::Lookahead,
                LookDir::Behind => Feature::Lookbehind,
            });
        }
        IrNode::Backref { .. } => {
            found.insert(Feature::Backreference);
        }
        IrNode::CharClass { items, .. } => {
            if items
                .iter()
                .any(|item| matches!(item, IrClassItem::Escape { kind, .. } if kind.is_property()))
            {
                found.insert(Feature::UnicodeProperty);
            }
        }
        IrNode::Alt { .. } | IrNode::Seq { .. } | IrNode::Lit { .. } | IrNode::Dot | IrNode::Anchor { .. } => {}
    });
    found.into_iter().collect()
}

#[cfg(test)]
mod compiler_tests {
    use super::*;
    use crate::primitives::Max;

    #[test]
    fn nested_sequences_flatten_and_fuse() {
        let ir = IrNode::seq(vec![
            IrNode::lit("a"),
            IrNode::seq(vec![IrNode::lit("b"), IrNode::lit("c")]),
            IrNode::Dot,
            IrNode::lit("d"),
        ]);
        assert_eq!(
            normalize(ir),
            IrNode::seq(vec![IrNode::lit("abc"), IrNode::Dot, IrNode::lit("d")])
        );
    }

    #[test]
    fn singleton_containers_collapse() {
        let ir = IrNode::alt(vec![IrNode::seq(vec![IrNode::lit("x")])]);
        assert_eq!(normalize(ir), IrNode::lit("x"));
    }

    #[test]
    fn alternations_flatten_without_fusing_branches() {
        let ir = IrNode::alt(vec![
            IrNode::alt(vec![IrNode::lit("a"), IrNode::lit("b")]),
            IrNode::lit("c"),
        ]);
        assert_eq!(
            normalize(ir),
            IrNode::alt(vec![IrNode::lit("a"), IrNode::lit("b"), IrNode::lit("c")])
        );
    }

    #[test]
    fn empty_literals_disappear_when_fused() {
        let ir = IrNode::seq(vec![IrNode::lit(""), IrNode::Dot]);
        assert_eq!(normalize(ir), IrNode::Dot);
    }

    #[test]
    fn quantifier_children_are_normalized_in_place() {
        let ir = IrNode::quant(
            IrNode::seq(vec![IrNode::lit("a"), IrNode::lit("b")]),
            1,
            Max::Inf,
            QuantMode::Greedy,
        );
        let expected = IrNode::quant(IrNode::lit("ab"), 1, Max::Inf, QuantMode::Greedy);
        assert_eq!(normalize(ir), expected);
    }

    #[test]
    fn feature_names_sort_alphabetically() {
        let mut names: Vec<&str> = [
            Feature::UnicodeProperty,
            Feature::AtomicGroup,
            Feature::Lookbehind,
            Feature::NamedGroup,
            Feature::Backreference,
            Feature::PossessiveQuantifier,
            Feature::Lookahead,
        ]
        .iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(Feature::as_str)
        .collect();
        let sorted = {
            let mut copy = names.clone();
            copy.sort_unstable();
            copy
        };
        assert_eq!(names, sorted);
        names.dedup();
        assert_eq!(names.len(), 7);
    }
}
