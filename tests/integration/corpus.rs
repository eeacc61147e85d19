//! Runs the analyzer over the MiniJava programs in tests/fixtures.
//!
//! Every line carrying a `// @error` marker must receive at least one
//! diagnostic, and no other line may receive one.

use std::collections::BTreeSet;
use std::path::PathBuf;

use mjsema::config::AnalyzerConfig;
use mjsema::diagnostics::{Diagnostic, DiagnosticKind};
use mjsema::span::LineIndex;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

fn analyze(source: &str, jobs: usize) -> Vec<Diagnostic> {
    let config = AnalyzerConfig { jobs, ..AnalyzerConfig::default() };
    mjsema::analyze_source(source, &config).expect("fixture should parse")
}

fn annotated_lines(source: &str) -> BTreeSet<usize> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains("// @error"))
        .map(|(i, _)| i + 1)
        .collect()
}

fn reported_lines(source: &str, diags: &[Diagnostic]) -> BTreeSet<usize> {
    let index = LineIndex::new(source);
    diags.iter().map(|d| index.line(d.span.start)).collect()
}

fn assert_matches_annotations(name: &str) -> Vec<Diagnostic> {
    let source = fixture(name);
    let diags = analyze(&source, 1);
    let expected = annotated_lines(&source);
    let actual = reported_lines(&source, &diags);
    assert_eq!(
        actual,
        expected,
        "{name}: reported lines differ from annotations\n{}",
        mjsema::diagnostics::format_plain(name, &source, &diags)
    );
    diags
}

fn count(diags: &[Diagnostic], kind: DiagnosticKind) -> usize {
    diags.iter().filter(|d| d.kind == kind).count()
}

#[test]
fn valid_program_has_no_diagnostics() {
    let source = fixture("D3.java");
    assert!(analyze(&source, 1).is_empty());
    assert!(analyze(&source, 4).is_empty());
}

#[test]
fn invalid_array_integer() {
    let diags = assert_matches_annotations("InvalidArrayInteger.java");
    assert_eq!(count(&diags, DiagnosticKind::InvalidArrayIndexType), 2);
    assert_eq!(count(&diags, DiagnosticKind::InvalidLengthUsage), 1);
    assert_eq!(count(&diags, DiagnosticKind::NotAnArray), 1);
    assert_eq!(count(&diags, DiagnosticKind::ReturnTypeMismatch), 1);
    assert_eq!(diags.len(), 5);
}

#[test]
fn invalid_definitions() {
    let diags = assert_matches_annotations("InvalidDefinitions.java");
    assert_eq!(count(&diags, DiagnosticKind::UndefinedType), 1);
    assert_eq!(count(&diags, DiagnosticKind::UndefinedMethod), 2);
    assert_eq!(count(&diags, DiagnosticKind::UndefinedVariable), 2);
    assert_eq!(count(&diags, DiagnosticKind::AssignmentTypeMismatch), 19);
}

#[test]
fn invalid_nested_method_calls() {
    let diags = assert_matches_annotations("InvalidNestedMethodCalls.java");
    assert_eq!(count(&diags, DiagnosticKind::InvalidMemberOnReturn), 1);
    assert_eq!(count(&diags, DiagnosticKind::ArgumentCountMismatch), 1);
    // Lines 22, 23, 24 and 30 have one bad argument each; line 33 has two and line 32 has three.
    assert_eq!(count(&diags, DiagnosticKind::ArgumentTypeMismatch), 9);
}

#[test]
fn invalid_operations() {
    let source = fixture("InvalidOperations.java");
    let diags = assert_matches_annotations("InvalidOperations.java");
    assert!(diags.iter().all(|d| d.kind == DiagnosticKind::OperandTypeMismatch), "{diags:?}");

    let index = LineIndex::new(&source);
    let on_line = |line: usize| diags.iter().filter(|d| index.line(d.span.start) == line).count();
    // `b1 + b1` and `c1 && c1`: both operands are wrong.
    assert_eq!(on_line(21), 2);
    assert_eq!(on_line(25), 2);
    // `ia1 + ia1[0]`: only the left operand is wrong.
    assert_eq!(on_line(23), 1);
}

#[test]
fn invalid_return() {
    let diags = assert_matches_annotations("InvalidReturn.java");
    assert_eq!(count(&diags, DiagnosticKind::ReturnTypeMismatch), 6);
    assert_eq!(count(&diags, DiagnosticKind::InvalidArrayIndexType), 1);
}

#[test]
fn little_test() {
    let diags = assert_matches_annotations("LittleTest.java");
    let kinds: Vec<_> = diags.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::UndefinedType,
            DiagnosticKind::AssignmentTypeMismatch,
            DiagnosticKind::InvalidLengthUsage,
            DiagnosticKind::AssignmentTypeMismatch,
            DiagnosticKind::AssignmentTypeMismatch,
            DiagnosticKind::InvalidArraySize,
            DiagnosticKind::ArgumentCountMismatch,
        ]
    );
}

#[test]
fn parallel_checking_matches_sequential_on_corpus() {
    for name in [
        "InvalidArrayInteger.java",
        "InvalidDefinitions.java",
        "InvalidNestedMethodCalls.java",
        "InvalidOperations.java",
        "InvalidReturn.java",
        "LittleTest.java",
    ] {
        let source = fixture(name);
        let sequential = analyze(&source, 1);
        assert_eq!(analyze(&source, 3), sequential, "{name}");
    }
}
