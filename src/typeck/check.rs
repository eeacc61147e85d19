use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::parser::ast::*;
use crate::span::Spanned;
use super::env::{ClassId, ClassTable, MethodSig};
use super::infer::{check_array_access, infer_expr};
use super::register::collect_local_decls;
use super::scope::Scope;
use super::types::{compatible, Type};

/// Check one method body, including its terminal `return`.
pub(crate) fn check_method(table: &ClassTable, sig: &MethodSig, method: &Method, sink: &mut DiagnosticSink) {
    let mut locals = Vec::new();
    collect_local_decls(&method.body.node.stmts, method.body.span, &mut locals);
    let mut scope = Scope::for_method(table, sig, locals);

    scope.push_frame();
    check_stmts(&method.body.node.stmts, &mut scope, sink);

    let actual = infer_expr(&method.return_expr, &scope, sink);
    if !compatible(&sig.return_type, &actual) {
        sink.push(
            Diagnostic::error(
                DiagnosticKind::ReturnTypeMismatch,
                format!("method '{}' must return {}, found {actual}", sig.name.node, sig.return_type),
                method.return_expr.span,
            )
            .with_note("return type declared here", sig.return_type_expr.span),
        );
    }
    scope.pop_frame();
}

/// Check the body of `main`.
pub(crate) fn check_main(table: &ClassTable, class: ClassId, main: &MainClass, sink: &mut DiagnosticSink) {
    let mut locals = Vec::new();
    collect_local_decls(&main.body.node.stmts, main.body.span, &mut locals);
    let mut scope = Scope::for_main(table, class, &main.args_name, locals);
    scope.push_frame();
    check_stmts(&main.body.node.stmts, &mut scope, sink);
    scope.pop_frame();
}

fn check_stmts(stmts: &[Spanned<Stmt>], scope: &mut Scope<'_>, sink: &mut DiagnosticSink) {
    for stmt in stmts {
        check_stmt(stmt, scope, sink);
    }
}

fn check_stmt(stmt: &Spanned<Stmt>, scope: &mut Scope<'_>, sink: &mut DiagnosticSink) {
    match &stmt.node {
        Stmt::VarDecl(decl) => scope.declare_local(decl, sink),
        Stmt::Block(block) => {
            scope.push_frame();
            check_stmts(&block.stmts, scope, sink);
            scope.pop_frame();
        }
        Stmt::If { condition, then_branch, else_branch } => {
            check_condition("if", condition, scope, sink);
            check_stmt(then_branch, scope, sink);
            if let Some(else_branch) = else_branch {
                check_stmt(else_branch, scope, sink);
            }
        }
        Stmt::While { condition, body } => {
            check_condition("while", condition, scope, sink);
            check_stmt(body, scope, sink);
        }
        Stmt::Print(value) => {
            infer_expr(value, scope, sink);
        }
        Stmt::Assign { target, value } => {
            let target_ty = scope.resolve(&target.node, target.span, sink);
            let value_ty = infer_expr(value, scope, sink);
            if !compatible(&target_ty, &value_ty) {
                sink.error(
                    DiagnosticKind::AssignmentTypeMismatch,
                    format!("cannot assign {value_ty} to '{}' of type {target_ty}", target.node),
                    value.span,
                );
            }
        }
        Stmt::IndexAssign { target, index, value } => {
            let target_ty = scope.resolve(&target.node, target.span, sink);
            let label = format!("'{}'", target.node);
            check_array_access(&target_ty, &label, target.span, index, scope, sink);
            let value_ty = infer_expr(value, scope, sink);
            if !compatible(&Type::Int, &value_ty) {
                sink.error(
                    DiagnosticKind::AssignmentTypeMismatch,
                    format!("cannot assign {value_ty} to an element of '{}' (int)", target.node),
                    value.span,
                );
            }
        }
    }
}

fn check_condition(keyword: &str, condition: &Spanned<Expr>, scope: &Scope<'_>, sink: &mut DiagnosticSink) {
    let ty = infer_expr(condition, scope, sink);
    if !compatible(&Type::Boolean, &ty) {
        sink.error(
            DiagnosticKind::ConditionTypeMismatch,
            format!("{keyword} condition must be boolean, found {ty}"),
            condition.span,
        );
    }
}
