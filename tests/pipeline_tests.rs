//! End-to-end: STRling source in, a working regex out.
//!
//! The `regex` crate covers the subset of PCRE2 without backreferences,
//! lookarounds, atomic groups or possessive quantifiers, which is enough to
//! check that emitted patterns actually match what the source describes.

use regex::Regex;
use strling::artifact::{parse_to_artifact, to_pretty_json, ARTIFACT_VERSION};
use strling::{compile_pattern, Feature};

fn compiled(text: &str) -> Regex {
    let pattern = compile_pattern(text).unwrap().regex;
    Regex::new(&format!("^(?:{pattern})$")).unwrap()
}

#[test]
fn date_pattern_matches_dates() {
    let re = compiled("(?<year>\\d{4})-(?<month>\\d{2})-(?<day>\\d{2})");
    assert!(re.is_match("2024-05-17"));
    assert!(!re.is_match("24-05-17"));

    let caps = Regex::new(&compile_pattern("(?<year>\\d{4})-(?<month>\\d{2})").unwrap().regex)
        .unwrap()
        .captures("on 2024-05")
        .unwrap();
    assert_eq!(&caps["year"], "2024");
    assert_eq!(&caps["month"], "05");
}

#[test]
fn bracket_inside_class_is_literal() {
    let re = compiled("[[:digit:]x]");
    assert!(re.is_match("dx]"));
    assert!(re.is_match(":x]"));
    assert!(re.is_match("[x]"));
    assert!(!re.is_match("5x]"));
}

#[test]
fn case_insensitive_flag_applies() {
    let re = compiled("%flags i\nhello");
    assert!(re.is_match("HeLLo"));
}

#[test]
fn free_spacing_pattern_keeps_escaped_space() {
    let source = "%flags x\n\
                  \\d+      # digits\n\
                  \\ \n\
                  [a-z]+    # word";
    let re = compiled(source);
    assert!(re.is_match("42 apples"));
    assert!(!re.is_match("42apples"));
}

#[test]
fn metacharacters_match_literally() {
    let re = compiled("a\\.b\\*c\\{2\\}");
    assert!(re.is_match("a.b*c{2}"));
    assert!(!re.is_match("axb*c{2}"));

    let brace = compiled("a{,3}");
    assert!(brace.is_match("a{,3}"));
}

#[test]
fn classes_and_properties() {
    let re = compiled("[^a-z_]+\\p{Lu}");
    assert!(re.is_match("123A"));
    assert!(!re.is_match("abcA"));

    let dash = compiled("[a\\-z]+");
    assert!(dash.is_match("a-z"));
    assert!(!dash.is_match("b"));
}

#[test]
fn alternation_inside_sequence() {
    let re = compiled("x(?:ab|cd)*y");
    assert!(re.is_match("xababcdy"));
    assert!(re.is_match("xy"));
    assert!(!re.is_match("xaby!"));
}

#[test]
fn compiled_pattern_reports_flags_and_features() {
    let compiled = compile_pattern("%flags s\n(?<a>.)(?=b)").unwrap();
    assert!(compiled.flags.dot_all);
    assert_eq!(
        compiled.features_used,
        vec![Feature::Lookahead, Feature::NamedGroup]
    );
}

#[test]
fn parse_artifact_json_shape() {
    let artifact = parse_to_artifact("%flags i\na|b").unwrap();
    let value: serde_json::Value = serde_json::from_str(&to_pretty_json(&artifact).unwrap()).unwrap();
    assert_eq!(value["version"], ARTIFACT_VERSION);
    assert_eq!(value["flags"]["ignoreCase"], true);
    assert_eq!(value["root"]["kind"], "Alt");
    assert_eq!(value["root"]["branches"][1]["value"], "b");
    assert_eq!(value["errors"], serde_json::json!([]));

    let compiled = serde_json::to_value(artifact.compile()).unwrap();
    assert_eq!(compiled["ir"]["ir"], "Alt");
    assert_eq!(compiled["metadata"]["features_used"], serde_json::json!([]));
}
