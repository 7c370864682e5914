//! Property tests for normalization and literal emission.

use proptest::prelude::*;
use regex::Regex;
use strling::compiler::{lower, normalize};
use strling::emitter::emit;
use strling::ir::IrNode;
use strling::syntax::{AnchorKind, Flags, LookDir, Max, Node, QuantMode};

fn leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        "[a-z]{0,3}".prop_map(Node::lit),
        Just(Node::Dot),
        Just(Node::anchor(AnchorKind::Start)),
        (1u32..4).prop_map(Node::backref_index),
    ]
}

fn tree() -> impl Strategy<Value = Node> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Node::seq),
            prop::collection::vec(inner.clone(), 1..4).prop_map(Node::alt),
            inner.clone().prop_map(Node::capture),
            (inner.clone(), 0u32..3)
                .prop_map(|(child, min)| Node::quant(child, min, Max::Inf, QuantMode::Greedy)),
            (inner, any::<bool>()).prop_map(|(body, neg)| Node::look(LookDir::Ahead, neg, body)),
        ]
    })
}

/// No sequence directly holds another sequence or two adjacent literals,
/// and no alternation directly holds another alternation.
fn is_canonical(node: &IrNode) -> bool {
    let mut ok = true;
    node.walk(&mut |n| match n {
        IrNode::Seq { parts } => {
            ok &= parts.len() != 1;
            ok &= !parts.iter().any(|p| matches!(p, IrNode::Seq { .. }));
            ok &= !parts
                .windows(2)
                .any(|w| matches!((&w[0], &w[1]), (IrNode::Lit { .. }, IrNode::Lit { .. })));
        }
        IrNode::Alt { branches } => {
            ok &= branches.len() != 1;
            ok &= !branches.iter().any(|b| matches!(b, IrNode::Alt { .. }));
        }
        _ => {}
    });
    ok
}

proptest! {
    #[test]
    fn normalize_is_idempotent(ast in tree()) {
        let once = normalize(lower(&ast));
        prop_assert_eq!(normalize(once.clone()), once);
    }

    #[test]
    fn normalize_produces_canonical_trees(ast in tree()) {
        prop_assert!(is_canonical(&normalize(lower(&ast))));
    }

    #[test]
    fn emitted_literals_match_themselves(text in "\\PC{0,12}") {
        let pattern = emit(&IrNode::lit(text.clone()), None);
        let re = Regex::new(&format!("^{pattern}$")).unwrap();
        prop_assert!(re.is_match(&text));
    }

    #[test]
    fn emitted_literals_survive_free_spacing(text in "\\PC{0,12}") {
        let flags = Flags { extended: true, ..Flags::default() };
        let pattern = emit(&IrNode::lit(text.clone()), Some(&flags));
        let re = Regex::new(&format!("^(?:{pattern})$")).unwrap();
        prop_assert!(re.is_match(&text));
    }
}
