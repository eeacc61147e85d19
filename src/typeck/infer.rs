use crate::diagnostics::{ordinal, Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::parser::ast::*;
use crate::span::{Span, Spanned};
use super::resolve::resolve_class;
use super::scope::Scope;
use super::types::Type;

/// Type an expression. Never fails: anything that cannot be typed is
/// reported (once) and comes back as `Unknown`.
pub(crate) fn infer_expr(expr: &Spanned<Expr>, scope: &Scope<'_>, sink: &mut DiagnosticSink) -> Type {
    match &expr.node {
        Expr::IntLit(_) => Type::Int,
        Expr::BoolLit(_) => Type::Boolean,
        Expr::Ident(name) => scope.resolve(name, expr.span, sink),
        Expr::This => scope.this_type(expr.span, sink),
        Expr::Paren(inner) => infer_expr(inner, scope, sink),
        Expr::BinOp { op, lhs, rhs } => infer_binop(*op, lhs, rhs, scope, sink),
        Expr::Not { operand } => {
            let ty = infer_expr(operand, scope, sink);
            if expect_operand("!", operand, &ty, &Type::Boolean, sink) {
                Type::Boolean
            } else {
                Type::Unknown
            }
        }
        Expr::Index { object, index } => infer_index(object, index, scope, sink),
        Expr::Length { object } => {
            let ty = infer_expr(object, scope, sink);
            match ty {
                Type::IntArray => Type::Int,
                Type::Unknown => Type::Unknown,
                other => {
                    sink.error(
                        DiagnosticKind::InvalidLengthUsage,
                        format!("'.length' requires int[], found {other}"),
                        expr.span,
                    );
                    Type::Unknown
                }
            }
        }
        Expr::NewArray { size } => {
            let ty = infer_expr(size, scope, sink);
            match ty {
                Type::Int => Type::IntArray,
                Type::Unknown => Type::Unknown,
                other => {
                    sink.error(
                        DiagnosticKind::InvalidArraySize,
                        format!("array size must be int, found {other}"),
                        size.span,
                    );
                    Type::Unknown
                }
            }
        }
        Expr::NewObject { class } => resolve_class(&class.node, class.span, scope.table(), sink),
        Expr::MethodCall { object, method, args } => infer_method_call(object, method, args, scope, sink),
    }
}

/// Short label for an operand in messages: `'b1'`, `'f()'`, or `operand`.
fn describe(expr: &Expr) -> String {
    match expr {
        Expr::Ident(name) => format!("'{name}'"),
        Expr::This => "'this'".to_string(),
        Expr::MethodCall { method, .. } => format!("'{}()'", method.node),
        Expr::Paren(inner) => describe(&inner.node),
        _ => "operand".to_string(),
    }
}

/// Report `operand` unless it has the `expected` type. `Unknown` operands are
/// not reported again. Returns whether the operand is usable.
fn expect_operand(
    op: &str,
    operand: &Spanned<Expr>,
    ty: &Type,
    expected: &Type,
    sink: &mut DiagnosticSink,
) -> bool {
    if ty == expected {
        return true;
    }
    if !ty.is_unknown() {
        sink.error(
            DiagnosticKind::OperandTypeMismatch,
            format!(
                "{} is of wrong type: operator '{op}' expects {expected}, found {ty}",
                describe(&operand.node)
            ),
            operand.span,
        );
    }
    false
}

fn infer_binop(
    op: BinOp,
    lhs: &Spanned<Expr>,
    rhs: &Spanned<Expr>,
    scope: &Scope<'_>,
    sink: &mut DiagnosticSink,
) -> Type {
    let lhs_ty = infer_expr(lhs, scope, sink);
    let rhs_ty = infer_expr(rhs, scope, sink);

    let (operand, result) = match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => (Type::Int, Type::Int),
        BinOp::Lt | BinOp::Gt => (Type::Int, Type::Boolean),
        BinOp::And | BinOp::Or => (Type::Boolean, Type::Boolean),
        BinOp::Eq => {
            if lhs_ty.is_unknown() || rhs_ty.is_unknown() {
                return Type::Unknown;
            }
            if lhs_ty != rhs_ty {
                sink.error(
                    DiagnosticKind::OperandTypeMismatch,
                    format!("operator '==' cannot compare {lhs_ty} with {rhs_ty}"),
                    rhs.span,
                );
                return Type::Unknown;
            }
            return Type::Boolean;
        }
    };

    // Both sides are checked so each bad operand is reported.
    let lhs_ok = expect_operand(op.symbol(), lhs, &lhs_ty, &operand, sink);
    let rhs_ok = expect_operand(op.symbol(), rhs, &rhs_ty, &operand, sink);
    if lhs_ok && rhs_ok { result } else { Type::Unknown }
}

/// Shared by `a[i]` expressions and `a[i] = v` statements. Base and index are
/// reported independently.
pub(crate) fn check_array_access(
    base_ty: &Type,
    base_label: &str,
    base_span: Span,
    index: &Spanned<Expr>,
    scope: &Scope<'_>,
    sink: &mut DiagnosticSink,
) -> bool {
    let base_ok = match base_ty {
        Type::IntArray => true,
        Type::Unknown => false,
        other => {
            sink.error(
                DiagnosticKind::NotAnArray,
                format!("cannot index {base_label} of type {other} as int[]"),
                base_span,
            );
            false
        }
    };

    let index_ty = infer_expr(index, scope, sink);
    let index_ok = match index_ty {
        Type::Int => true,
        Type::Unknown => false,
        other => {
            sink.error(
                DiagnosticKind::InvalidArrayIndexType,
                format!("array index must be int, found {other}"),
                index.span,
            );
            false
        }
    };

    base_ok && index_ok
}

fn infer_index(
    object: &Spanned<Expr>,
    index: &Spanned<Expr>,
    scope: &Scope<'_>,
    sink: &mut DiagnosticSink,
) -> Type {
    let base_ty = infer_expr(object, scope, sink);
    if check_array_access(&base_ty, &describe(&object.node), object.span, index, scope, sink) {
        Type::Int
    } else {
        Type::Unknown
    }
}

fn unparen(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(inner) => unparen(&inner.node),
        other => other,
    }
}

fn infer_method_call(
    object: &Spanned<Expr>,
    method: &Spanned<String>,
    args: &[Spanned<Expr>],
    scope: &Scope<'_>,
    sink: &mut DiagnosticSink,
) -> Type {
    let recv_ty = infer_expr(object, scope, sink);
    // Arguments carry their own errors whatever happens to the call.
    let arg_types: Vec<Type> = args.iter().map(|a| infer_expr(a, scope, sink)).collect();

    let sig = match &recv_ty {
        Type::Unknown => return Type::Unknown,
        Type::Class(name) => scope.table().method(name, &method.node),
        _ => None,
    };

    let Some(sig) = sig else {
        match unparen(&object.node) {
            Expr::MethodCall { method: prev, .. } => sink.error(
                DiagnosticKind::InvalidMemberOnReturn,
                format!(
                    "invalid member '{}' on return of '{}()' (type {recv_ty})",
                    method.node, prev.node
                ),
                method.span,
            ),
            _ => sink.error(
                DiagnosticKind::UndefinedMethod,
                format!("method '{}' is not declared for type '{recv_ty}'", method.node),
                method.span,
            ),
        }
        return Type::Unknown;
    };

    if arg_types.len() != sig.params.len() {
        let noun = if sig.params.len() == 1 { "argument" } else { "arguments" };
        sink.push(
            Diagnostic::error(
                DiagnosticKind::ArgumentCountMismatch,
                format!(
                    "method '{}' expects {} {noun}, {} given",
                    method.node,
                    sig.params.len(),
                    arg_types.len()
                ),
                method.span,
            )
            .with_note("declared here", sig.name.span),
        );
        return Type::Unknown;
    }

    let mut ok = true;
    for (k, ((arg, arg_ty), param)) in args.iter().zip(&arg_types).zip(&sig.params).enumerate() {
        if arg_ty.is_unknown() || param.ty.is_unknown() || *arg_ty == param.ty {
            continue;
        }
        ok = false;
        sink.push(
            Diagnostic::error(
                DiagnosticKind::ArgumentTypeMismatch,
                format!(
                    "invalid {} argument to '{}': expected {}, found {arg_ty}",
                    ordinal(k + 1),
                    method.node,
                    param.ty
                ),
                arg.span,
            )
            .with_note(format!("parameter '{}' declared here", param.name.node), param.name.span),
        );
    }

    if ok { sig.return_type.clone() } else { Type::Unknown }
}
