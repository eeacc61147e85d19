use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::span::{LineIndex, Span, Spanned};

/// Fatal errors from the front end and driver. Semantic problems are never
/// reported through this type; see [`Diagnostic`].
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Syntax error: {msg}")]
    Syntax { msg: String, span: Span },

    #[error("I/O error: {msg}")]
    Io { msg: String, path: PathBuf },

    #[error("Config error: {msg}")]
    Config { msg: String, path: PathBuf },
}

impl CompileError {
    pub fn syntax(msg: impl Into<String>, span: Span) -> Self {
        Self::Syntax { msg: msg.into(), span }
    }

    pub fn io(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Io { msg: msg.into(), path }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Config { msg: msg.into(), path }
    }
}

/// The semantic error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    DuplicateClass,
    DuplicateMethod,
    DuplicateVariable,
    UndefinedType,
    UndefinedVariable,
    UndefinedMethod,
    InvalidMemberOnReturn,
    OperandTypeMismatch,
    InvalidLengthUsage,
    InvalidArrayIndexType,
    NotAnArray,
    InvalidArraySize,
    AssignmentTypeMismatch,
    ArgumentCountMismatch,
    ArgumentTypeMismatch,
    ReturnTypeMismatch,
    ConditionTypeMismatch,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::DuplicateClass => "DuplicateClass",
            DiagnosticKind::DuplicateMethod => "DuplicateMethod",
            DiagnosticKind::DuplicateVariable => "DuplicateVariable",
            DiagnosticKind::UndefinedType => "UndefinedType",
            DiagnosticKind::UndefinedVariable => "UndefinedVariable",
            DiagnosticKind::UndefinedMethod => "UndefinedMethod",
            DiagnosticKind::InvalidMemberOnReturn => "InvalidMemberOnReturn",
            DiagnosticKind::OperandTypeMismatch => "OperandTypeMismatch",
            DiagnosticKind::InvalidLengthUsage => "InvalidLengthUsage",
            DiagnosticKind::InvalidArrayIndexType => "InvalidArrayIndexType",
            DiagnosticKind::NotAnArray => "NotAnArray",
            DiagnosticKind::InvalidArraySize => "InvalidArraySize",
            DiagnosticKind::AssignmentTypeMismatch => "AssignmentTypeMismatch",
            DiagnosticKind::ArgumentCountMismatch => "ArgumentCountMismatch",
            DiagnosticKind::ArgumentTypeMismatch => "ArgumentTypeMismatch",
            DiagnosticKind::ReturnTypeMismatch => "ReturnTypeMismatch",
            DiagnosticKind::ConditionTypeMismatch => "ConditionTypeMismatch",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The analyzer only reports errors; there are no warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    /// Secondary location, e.g. the declaration a mismatch is measured against.
    pub note: Option<Spanned<String>>,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self { kind, severity: Severity::Error, message: message.into(), span, note: None }
    }

    pub fn with_note(mut self, message: impl Into<String>, span: Span) -> Self {
        self.note = Some(Spanned::new(message.into(), span));
        self
    }
}

/// Collects diagnostics for one analysis run.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, kind: DiagnosticKind, message: impl Into<String>, span: Span) {
        self.push(Diagnostic::error(kind, message, span));
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Consume the sink, returning diagnostics ordered by source position.
    /// The sort is stable, so diagnostics at the same span keep emission order.
    pub fn into_sorted(mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by_key(|d| d.span);
        self.diagnostics
    }
}

/// English ordinal for argument positions: 1st, 2nd, 3rd, 4th, 11th, 22nd...
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Render a CompileError with ariadne for nice terminal output.
pub fn render_error(source: &str, err: &CompileError) {
    use ariadne::{Label, Report, ReportKind, Source};

    match err {
        CompileError::Syntax { msg, span } => {
            let _ = Report::build(ReportKind::Error, (), span.start)
                .with_message("syntax error")
                .with_label(Label::new(span.start..span.end).with_message(msg))
                .finish()
                .eprint(Source::from(source));
        }
        CompileError::Io { msg, path } => {
            eprintln!("error[io]: {msg}");
            eprintln!("  --> {}", path.display());
        }
        CompileError::Config { msg, path } => {
            eprintln!("error[config]: {msg}");
            eprintln!("  --> {}", path.display());
        }
    }
}

/// Render diagnostics with ariadne to stderr.
pub fn render_diagnostics(source: &str, diagnostics: &[Diagnostic]) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    for d in diagnostics {
        let mut report = Report::build(ReportKind::Error, (), d.span.start)
            .with_code(d.kind.as_str())
            .with_message(&d.message)
            .with_label(
                Label::new(d.span.start..d.span.end)
                    .with_message(&d.message)
                    .with_color(Color::Red),
            );
        if let Some(note) = &d.note {
            report = report.with_label(
                Label::new(note.span.start..note.span.end)
                    .with_message(&note.node)
                    .with_color(Color::Blue),
            );
        }
        let _ = report.finish().eprint(Source::from(source));
    }
}

/// One line per diagnostic: `file:line:col: error[Kind]: message`.
pub fn format_plain(filename: &str, source: &str, diagnostics: &[Diagnostic]) -> String {
    let index = LineIndex::new(source);
    let mut out = String::new();
    for d in diagnostics {
        let pos = index.line_col(d.span.start);
        out.push_str(&format!(
            "{filename}:{}:{}: {}[{}]: {}\n",
            pos.line, pos.column, d.severity, d.kind, d.message
        ));
    }
    out
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    kind: DiagnosticKind,
    severity: Severity,
    message: &'a str,
    line: usize,
    column: usize,
    span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}

pub fn format_json(source: &str, diagnostics: &[Diagnostic]) -> Result<String, serde_json::Error> {
    let index = LineIndex::new(source);
    let items: Vec<JsonDiagnostic<'_>> = diagnostics
        .iter()
        .map(|d| {
            let pos = index.line_col(d.span.start);
            JsonDiagnostic {
                kind: d.kind,
                severity: d.severity,
                message: &d.message,
                line: pos.line,
                column: pos.column,
                span: d.span,
                note: d.note.as_ref().map(|n| n.node.as_str()),
            }
        })
        .collect();
    serde_json::to_string_pretty(&items)
}
