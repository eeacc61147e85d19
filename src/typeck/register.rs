use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::parser::ast::*;
use crate::span::{Span, Spanned};
use super::env::{ClassId, ClassTable, FieldInfo, MethodSig, ParamInfo};
use super::resolve::resolve_type;
use super::types::Type;

/// Build the global class table: register names, then members, then resolve
/// every member type once all classes are known.
pub(crate) fn build_class_table(program: &Program, sink: &mut DiagnosticSink) -> ClassTable {
    let mut table = ClassTable::new();
    register_class_names(program, &mut table, sink);
    register_class_members(program, &mut table, sink);
    resolve_member_types(&mut table, sink);
    tracing::debug!(classes = table.len(), "class table built");
    table
}

/// Pass 1a: every class name, main class first. Ids follow source order.
pub(crate) fn register_class_names(program: &Program, table: &mut ClassTable, sink: &mut DiagnosticSink) {
    let names = std::iter::once((&program.main_class.node.name, true))
        .chain(program.classes.iter().map(|c| (&c.node.name, false)));

    for (name, is_main) in names {
        let (_, shadowed) = table.add_class(name.clone(), is_main);
        if let Some(first) = shadowed {
            sink.push(
                Diagnostic::error(
                    DiagnosticKind::DuplicateClass,
                    format!("class '{}' is already declared", name.node),
                    name.span,
                )
                .with_note("first declared here", first),
            );
        }
    }
}

/// Pass 1b: fields and method signatures, with their types left unresolved.
/// Class-typed members may name classes declared further down the file.
pub(crate) fn register_class_members(program: &Program, table: &mut ClassTable, sink: &mut DiagnosticSink) {
    for (i, class) in program.classes.iter().enumerate() {
        let c = &class.node;
        let id = ClassId(i + 1);
        let info = table.get_mut(id);

        for field in &c.fields {
            let prev = info.add_field(FieldInfo {
                name: field.name.clone(),
                type_expr: field.ty.clone(),
                ty: Type::Unknown,
            });
            if let Some(prev) = prev {
                sink.push(
                    Diagnostic::error(
                        DiagnosticKind::DuplicateVariable,
                        format!("field '{}' is already declared in class '{}'", field.name.node, c.name.node),
                        field.name.span,
                    )
                    .with_note("first declared here", prev.name.span),
                );
            }
        }

        for method in &c.methods {
            let m = &method.node;
            let params = register_params(m, sink);
            let shadowed = info.add_method(MethodSig {
                name: m.name.clone(),
                owner: id,
                params,
                return_type_expr: m.return_type.clone(),
                return_type: Type::Unknown,
            });
            if let Some(first) = shadowed {
                sink.push(
                    Diagnostic::error(
                        DiagnosticKind::DuplicateMethod,
                        format!("method '{}' is already declared in class '{}'", m.name.node, c.name.node),
                        m.name.span,
                    )
                    .with_note("first declared here", first),
                );
            }
        }
    }
}

fn register_params(m: &Method, sink: &mut DiagnosticSink) -> Vec<ParamInfo> {
    let mut params: Vec<ParamInfo> = Vec::with_capacity(m.params.len());
    for p in &m.params {
        if let Some(prev) = params.iter().find(|q| q.name.node == p.name.node) {
            sink.push(
                Diagnostic::error(
                    DiagnosticKind::DuplicateVariable,
                    format!("parameter '{}' is already declared in method '{}'", p.name.node, m.name.node),
                    p.name.span,
                )
                .with_note("first declared here", prev.name.span),
            );
        }
        // Duplicates still count toward arity.
        params.push(ParamInfo { name: p.name.clone(), type_expr: p.ty.clone(), ty: Type::Unknown });
    }
    params
}

/// Pass 2: resolve every field, parameter and return type now that the
/// class table is complete.
pub(crate) fn resolve_member_types(table: &mut ClassTable, sink: &mut DiagnosticSink) {
    let ids: Vec<ClassId> = table.ids().collect();
    for id in ids {
        let info = table.get(id);
        let field_types: Vec<Type> = info
            .fields
            .iter()
            .map(|f| resolve_type(&f.type_expr, table, sink))
            .collect();
        let method_types: Vec<(Vec<Type>, Type)> = info
            .methods
            .iter()
            .map(|m| {
                let params = m.params.iter().map(|p| resolve_type(&p.type_expr, table, sink)).collect();
                let ret = resolve_type(&m.return_type_expr, table, sink);
                (params, ret)
            })
            .collect();

        let info = table.get_mut(id);
        for (field, ty) in info.fields.iter_mut().zip(field_types) {
            field.ty = ty;
        }
        for (method, (params, ret)) in info.methods.iter_mut().zip(method_types) {
            for (param, ty) in method.params.iter_mut().zip(params) {
                param.ty = ty;
            }
            method.return_type = ret;
        }
    }
}

/// A local declaration together with the span of the block that owns it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LocalDecl<'a> {
    pub name: &'a Spanned<String>,
    pub block: Span,
}

/// Every local declared anywhere in a statement list, nested blocks
/// included, in source order. `block` is the span of the list itself.
pub(crate) fn collect_local_decls<'a>(stmts: &'a [Spanned<Stmt>], block: Span, out: &mut Vec<LocalDecl<'a>>) {
    for stmt in stmts {
        collect_in_stmt(stmt, block, out);
    }
}

fn collect_in_stmt<'a>(stmt: &'a Spanned<Stmt>, block: Span, out: &mut Vec<LocalDecl<'a>>) {
    match &stmt.node {
        Stmt::VarDecl(decl) => out.push(LocalDecl { name: &decl.name, block }),
        Stmt::Block(inner) => collect_local_decls(&inner.stmts, stmt.span, out),
        Stmt::If { then_branch, else_branch, .. } => {
            collect_in_stmt(then_branch, block, out);
            if let Some(else_branch) = else_branch {
                collect_in_stmt(else_branch, block, out);
            }
        }
        Stmt::While { body, .. } => collect_in_stmt(body, block, out),
        Stmt::Print(_) | Stmt::Assign { .. } | Stmt::IndexAssign { .. } => {}
    }
}
