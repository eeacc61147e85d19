use crate::diagnostics::{DiagnosticKind, DiagnosticSink};
use crate::parser::ast::TypeExpr;
use crate::span::{Span, Spanned};
use super::env::ClassTable;
use super::types::Type;

/// Resolve a written type against the class table. An undeclared class name
/// is reported as `UndefinedType` and resolves to `Unknown`.
pub(crate) fn resolve_type(ty: &Spanned<TypeExpr>, table: &ClassTable, sink: &mut DiagnosticSink) -> Type {
    match &ty.node {
        TypeExpr::Int => Type::Int,
        TypeExpr::Boolean => Type::Boolean,
        TypeExpr::IntArray => Type::IntArray,
        TypeExpr::Named(name) => resolve_class(name, ty.span, table, sink),
    }
}

/// Class type named at `span`, e.g. the operand of `new`.
pub(crate) fn resolve_class(name: &str, span: Span, table: &ClassTable, sink: &mut DiagnosticSink) -> Type {
    if table.contains(name) {
        Type::Class(name.to_string())
    } else {
        sink.error(DiagnosticKind::UndefinedType, format!("unknown type '{name}'"), span);
        Type::Unknown
    }
}
