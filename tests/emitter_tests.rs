//! PCRE2 output for complete patterns.

use strling::compile_pattern;
use strling::emitter::emit;
use strling::ir::{IrClassItem, IrNode};
use strling::syntax::{LookDir, Max, QuantMode};

fn regex(text: &str) -> String {
    compile_pattern(text).unwrap().regex
}

#[test]
fn literals_are_escaped() {
    assert_eq!(regex("abc"), "abc");
    assert_eq!(regex("a.b"), "a.b");
    assert_eq!(regex("a\\.b\\(\\)"), "a\\.b\\(\\)");
    assert_eq!(regex("a{,3}"), "a\\{,3\\}");
}

#[test]
fn groups_and_alternation() {
    assert_eq!(regex("ab|c"), "ab|c");
    assert_eq!(regex("(a|b)c"), "(a|b)c");
    assert_eq!(regex("(?:ab)*"), "(?:ab)*");
    assert_eq!(regex("(?>a+)b"), "(?>a+)b");
    assert_eq!(regex("(?=x)(?<!y)z"), "(?=x)(?<!y)z");
}

#[test]
fn shorthand_classes() {
    assert_eq!(regex("[0-9]"), "\\d");
    assert_eq!(regex("[^0-9]"), "\\D");
    assert_eq!(regex("[^\\s]"), "\\S");
    assert_eq!(regex("[a-z_]+"), "[a-z_]+");
    assert_eq!(regex("[^\\]\\\\-]"), "[^\\]\\\\\\-]");
}

#[test]
fn quantifier_forms() {
    assert_eq!(regex("\\d{2,4}?"), "\\d{2,4}?");
    assert_eq!(regex("a{3}"), "a{3}");
    assert_eq!(regex("a{2,}"), "a{2,}");
    assert_eq!(regex("\\w*+"), "\\w*+");
}

#[test]
fn flags_prefix() {
    assert_eq!(regex("%flags im\n^a$"), "(?im)^a$");
    assert_eq!(regex("%flags x\na b"), "(?x)ab");
    assert_eq!(regex("%flags x\na\\ b"), "(?x)a\\ b");
    assert_eq!(regex("%flags x\n\\#"), "(?x)\\#");
}

#[test]
fn backreferences() {
    assert_eq!(regex("(a)\\1"), "(a)\\1");
    assert_eq!(regex("(?<w>\\w+)-\\k<w>"), "(?<w>\\w+)-\\k<w>");
    assert_eq!(regex("(a)\\1\\x30"), "(a)(?:\\1)0");
}

#[test]
fn multi_character_literal_under_quantifier_is_grouped() {
    let ir = IrNode::quant(IrNode::lit("ab"), 0, Max::Inf, QuantMode::Greedy);
    assert_eq!(emit(&ir, None), "(?:ab)*");
}

#[test]
fn nested_quantifier_is_grouped() {
    let inner = IrNode::quant(IrNode::lit("a"), 0, Max::Inf, QuantMode::Greedy);
    let ir = IrNode::quant(inner, 2, Max::Finite(2), QuantMode::Greedy);
    assert_eq!(emit(&ir, None), "(?:a*){2}");
}

#[test]
fn alternation_under_quantifier_is_grouped() {
    let ir = IrNode::quant(
        IrNode::alt(vec![IrNode::lit("a"), IrNode::lit("b")]),
        1,
        Max::Inf,
        QuantMode::Lazy,
    );
    assert_eq!(emit(&ir, None), "(?:a|b)+?");
}

#[test]
fn quantified_class_is_not_grouped() {
    let ir = IrNode::quant(
        IrNode::class(false, vec![IrClassItem::Literal { ch: 'a' }]),
        1,
        Max::Inf,
        QuantMode::Greedy,
    );
    assert_eq!(emit(&ir, None), "[a]+");
}

#[test]
fn quantified_lookaround_is_grouped() {
    let look = IrNode::Look {
        dir: LookDir::Ahead,
        neg: false,
        body: Box::new(IrNode::lit("a")),
    };
    let ir = IrNode::quant(look, 0, Max::Finite(1), QuantMode::Greedy);
    assert_eq!(emit(&ir, None), "(?:(?=a))?");
}

#[test]
fn bracket_in_class_cannot_open_posix_set() {
    assert_eq!(regex("[[:digit:]x]"), "[\\[:digit:]x\\]");
}
