#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use mjsema::config::AnalyzerConfig;
use mjsema::diagnostics::{Diagnostic, DiagnosticKind};

pub fn mjsema() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mjsema"))
}

pub fn write_source(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, source).unwrap();
    path
}

/// Wrap class declarations with a main class that does nothing.
pub fn with_main(classes: &str) -> String {
    format!("class Main {{ public static void main(String[] a) {{ System.out.println(0); }} }}\n{classes}")
}

pub fn analyze(source: &str) -> Vec<Diagnostic> {
    match mjsema::analyze_source(source, &AnalyzerConfig::default()) {
        Ok(diags) => diags,
        Err(e) => panic!("expected program to parse, got: {e}"),
    }
}

pub fn check_should_pass(source: &str) {
    let diags = analyze(source);
    assert!(diags.is_empty(), "expected no diagnostics, got:\n{diags:#?}");
}

/// Assert that some diagnostic has `kind` and a message containing `expected_msg`.
pub fn check_should_fail_with(source: &str, kind: DiagnosticKind, expected_msg: &str) {
    let diags = analyze(source);
    assert!(
        diags.iter().any(|d| d.kind == kind && d.message.contains(expected_msg)),
        "expected {kind} containing '{expected_msg}', got:\n{diags:#?}"
    );
}

pub fn kinds(source: &str) -> Vec<DiagnosticKind> {
    analyze(source).into_iter().map(|d| d.kind).collect()
}
