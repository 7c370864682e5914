//! Target-agnostic intermediate representation.
//!
//! The IR mirrors the AST shape but is its own closed type so that back ends
//! never see surface syntax. It serializes with an `"ir"` tag.

use serde::{Deserialize, Serialize};

pub use crate::primitives::{AnchorKind, EscapeKind, LookDir, Max, QuantMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ir")]
pub enum IrNode {
    Alt {
        branches: Vec<IrNode>,
    },
    Seq {
        parts: Vec<IrNode>,
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
        items: Vec<IrClassItem>,
    },
    Quant {
        child: Box<IrNode>,
        min: u32,
        max: Max,
        mode: QuantMode,
    },
    Group {
        capturing: bool,
        body: Box<IrNode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        atomic: Option<bool>,
    },
    Backref {
        #[serde(rename = "byIndex", default, skip_serializing_if = "Option::is_none")]
        by_index: Option<u32>,
        #[serde(rename = "byName", default, skip_serializing_if = "Option::is_none")]
        by_name: Option<String>,
    },
    Look {
        dir: LookDir,
        neg: bool,
        body: Box<IrNode>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ir")]
pub enum IrClassItem {
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

impl IrNode {
    pub fn lit(value: impl Into<String>) -> Self {
        IrNode::Lit {
            value: value.into(),
        }
    }

    pub fn seq(parts: Vec<IrNode>) -> Self {
        IrNode::Seq { parts }
    }

    pub fn alt(branches: Vec<IrNode>) -> Self {
        IrNode::Alt { branches }
    }

    pub fn quant(child: IrNode, min: u32, max: Max, mode: QuantMode) -> Self {
        IrNode::Quant {
            child: Box::new(child),
            min,
            max,
            mode,
        }
    }

    pub fn group(capturing: bool, body: IrNode) -> Self {
        IrNode::Group {
            capturing,
            body: Box::new(body),
            name: None,
            atomic: None,
        }
    }

    pub fn class(negated: bool, items: Vec<IrClassItem>) -> Self {
        IrNode::CharClass { negated, items }
    }

    /// Calls `visit` on this node and every descendant, parents first.
    pub fn walk(&self, visit: &mut impl FnMut(&IrNode)) {
        visit(self);
        match self {
            IrNode::Alt { branches: children } | IrNode::Seq { parts: children } => {
                for child in children {
                    child.walk(visit);
                }
            }
            IrNode::Quant { child, .. } => child.walk(visit),
            IrNode::Group { body, .. } | IrNode::Look { body, .. } => body.walk(visit),
            IrNode::Lit { .. }
            | IrNode::Dot
            | IrNode::Anchor { .. }
            | IrNode::CharClass { .. }
            | IrNode::Backref { .. } => {}
        }
    }
}

#[cfg(test)]
mod ir_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ir_nodes_use_ir_tag() {
        let node = IrNode::seq(vec![IrNode::lit("a"), IrNode::Dot]);
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"ir": "Seq", "parts": [{"ir": "Lit", "value": "a"}, {"ir": "Dot"}]})
        );
    }

    #[test]
    fn walk_visits_every_node() {
        let node = IrNode::alt(vec![
            IrNode::quant(IrNode::lit("a"), 0, Max::Inf, QuantMode::Greedy),
            IrNode::group(true, IrNode::Dot),
        ]);
        let mut count = 0;
        node.walk(&mut |_| count += 1);
        assert_eq!(count, 5);
    }
}
