pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod typeck;
pub mod config;

use config::AnalyzerConfig;
use diagnostics::{CompileError, Diagnostic};
use parser::ast::Program;

/// Analyze a MiniJava source string (lex → parse → type check).
///
/// Syntax errors are fatal and come back as `Err`. Semantic problems are
/// returned as diagnostics ordered by source position; an empty list means
/// the program is well-typed.
pub fn analyze_source(source: &str, config: &AnalyzerConfig) -> Result<Vec<Diagnostic>, CompileError> {
    let program = parser::parse_source(source)?;
    Ok(check_program(&program, config))
}

/// Analyze an already-parsed program.
pub fn check_program(program: &Program, config: &AnalyzerConfig) -> Vec<Diagnostic> {
    let _span = tracing::debug_span!("check_program", classes = program.classes.len() + 1).entered();
    typeck::type_check(program, config)
}
