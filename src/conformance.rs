//! Conformance case runner.
//!
//! A case file is a JSON object with an `id` and either an
//! `input_ast`/`expected_ir` pair (compile check) or an
//! `input_dsl`/`expected_error` pair (parse-failure check).

use std::fs;
use std::path::{Path, PathBuf};

use difference::{Changeset, Difference};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::compiler::compile;
use crate::ir::IrNode;
use crate::syntax::{parse, Node};

#[derive(Debug, Error)]
pub enum ConformanceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("malformed case file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceCase {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_ast: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_ir: Option<IrNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_dsl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    Skipped(String),
    Failed(String),
}

/// Totals over a batch of cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub skipped: usize,
    pub failures: Vec<(String, String)>,
}

impl Summary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn record(&mut self, id: &str, outcome: CaseOutcome) {
        match outcome {
            CaseOutcome::Passed => self.passed += 1,
            CaseOutcome::Skipped(reason) => {
                debug!(id, %reason, "skipped conformance case");
                self.skipped += 1;
            }
            CaseOutcome::Failed(detail) => self.failures.push((id.to_string(), detail)),
        }
    }
}

// ============================================================================
// RUNNING
// ============================================================================

pub fn run_case(case: &ConformanceCase) -> CaseOutcome {
    match case {
        ConformanceCase {
            input_ast: Some(ast),
            expected_ir: Some(expected),
            ..
        } => check_compile(ast, expected),
        ConformanceCase {
            input_dsl: Some(dsl),
            expected_error: Some(expected),
            ..
        } => check_error(dsl, expected),
        _ => CaseOutcome::Skipped("no input_ast/expected_ir or input_dsl/expected_error pair".into()),
    }
}

fn check_compile(ast: &Node, expected: &IrNode) -> CaseOutcome {
    if let Err(err) = ast.validate() {
        return CaseOutcome::Failed(format!("invalid input_ast: {err}"));
    }
    let actual = compile(ast);
    if &actual == expected {
        return CaseOutcome::Passed;
    }
    CaseOutcome::Failed(format!("IR mismatch:\n{}", json_diff(expected, &actual)))
}

fn check_error(dsl: &str, expected: &str) -> CaseOutcome {
    match parse(dsl) {
        Ok(_) => CaseOutcome::Failed(format!("expected error containing {expected:?}, but parsing succeeded")),
        Err(err) if err.message().contains(expected) => CaseOutcome::Passed,
        Err(err) => CaseOutcome::Failed(format!(
            "expected error containing {expected:?}, got {:?}",
            err.message()
        )),
    }
}

/// Line diff of the pretty JSON forms: `-` expected, `+` actual.
pub fn json_diff(expected: &IrNode, actual: &IrNode) -> String {
    let render = |node: &IrNode| serde_json::to_string_pretty(node).unwrap_or_else(|e| e.to_string());
    let changeset = Changeset::new(&render(expected), &render(actual), "\n");
    let mut out = String::new();
    for diff in &changeset.diffs {
        let (mark, text) = match diff {
            Difference::Same(text) => (' ', text),
            Difference::Rem(text) => ('-', text),
            Difference::Add(text) => ('+', text),
        };
        for line in text.lines() {
            out.push(mark);
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

// ============================================================================
// LOADING
// ============================================================================

pub fn load_case(path: &Path) -> Result<ConformanceCase, ConformanceError> {
    let content = fs::read_to_string(path).map_err(|source| ConformanceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConformanceError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads every `*.json` case under `dir`, ordered by path.
pub fn load_cases(dir: &Path) -> Result<Vec<(PathBuf, ConformanceCase)>, ConformanceError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|source| ConformanceError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
        if entry.file_type().is_file() && is_json {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    let mut cases = Vec::with_capacity(paths.len());
    for path in paths {
        let case = load_case(&path)?;
        cases.push((path, case));
    }
    Ok(cases)
}

/// Loads and runs every case under `dir`.
pub fn run_dir(dir: &Path) -> Result<Summary, ConformanceError> {
    let mut summary = Summary::default();
    for (path, case) in load_cases(dir)? {
        let outcome = run_case(&case);
        if let CaseOutcome::Failed(detail) = &outcome {
            warn!(path = %path.display(), id = %case.id, "conformance failure: {detail}");
        }
        summary.record(&case.id, outcome);
    }
    Ok(summary)
}

#[cfg(test)]
mod conformance_tests {
    use super::*;
    use serde_json::json;

    fn case(value: serde_json::Value) -> ConformanceCase {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn compile_case_passes_on_matching_ir() {
        let c = case(json!({
            "id": "seq_fuse",
            "input_ast": {"kind": "Seq", "parts": [
                {"kind": "Lit", "value": "a"},
                {"kind": "Seq", "parts": [{"kind": "Lit", "value": "b"}]}
            ]},
            "expected_ir": {"ir": "Lit", "value": "ab"}
        }));
        assert_eq!(run_case(&c), CaseOutcome::Passed);
    }

    #[test]
    fn compile_case_reports_a_diff() {
        let c = case(json!({
            "id": "wrong",
            "input_ast": {"kind": "Dot"},
            "expected_ir": {"ir": "Lit", "value": "."}
        }));
        let CaseOutcome::Failed(detail) = run_case(&c) else {
            panic!("expected a failure");
        };
        assert!(detail.contains("-  \"ir\": \"Lit\""), "{detail}");
        assert!(detail.contains("+  \"ir\": \"Dot\""), "{detail}");
    }

    #[test]
    fn error_case_matches_message_substring() {
        let c = case(json!({
            "id": "bad_range",
            "input_dsl": "[z-a]",
            "expected_error": "Invalid character range"
        }));
        assert_eq!(run_case(&c), CaseOutcome::Passed);
    }

    #[test]
    fn invalid_input_ast_fails_before_compiling() {
        let c = case(json!({
            "id": "lost_backref",
            "input_ast": {"kind": "Seq", "parts": [
                {"kind": "Group", "capturing": true, "body": {"kind": "Lit", "value": "a"}},
                {"kind": "Backref"}
            ]},
            "expected_ir": {"ir": "Group", "capturing": true, "body": {"ir": "Lit", "value": "a"}}
        }));
        let CaseOutcome::Failed(detail) = run_case(&c) else {
            panic!("expected a failure");
        };
        assert!(detail.starts_with("invalid input_ast: backreference"), "{detail}");
    }

    #[test]
    fn incomplete_case_is_skipped() {
        let c = case(json!({"id": "todo"}));
        assert!(matches!(run_case(&c), CaseOutcome::Skipped(_)));
    }
}
