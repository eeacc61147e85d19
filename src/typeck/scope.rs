//! Name resolution inside one method body.
//!
//! Lookup order is locals (innermost block first), then parameters, then
//! fields of the enclosing class. Locals become visible only after their
//! declaration statement has been processed.

use std::collections::HashMap;

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::parser::ast::VarDecl;
use crate::span::{Span, Spanned};
use super::env::{ClassId, ClassTable, MethodSig};
use super::register::LocalDecl;
use super::resolve::resolve_type;
use super::types::Type;

#[derive(Debug, Clone)]
struct Binding {
    ty: Type,
    span: Span,
}

pub(crate) struct Scope<'a> {
    table: &'a ClassTable,
    class: ClassId,
    /// `frames[0]` holds parameters; the rest are block frames.
    frames: Vec<HashMap<String, Binding>>,
    /// Every local declared in the body, used to tell "declared later" apart
    /// from "never declared".
    declared_later: Vec<LocalDecl<'a>>,
    is_static: bool,
}

impl<'a> Scope<'a> {
    pub(crate) fn for_method(table: &'a ClassTable, sig: &MethodSig, locals: Vec<LocalDecl<'a>>) -> Self {
        let mut params = HashMap::new();
        for p in &sig.params {
            // First declaration wins; duplicates were reported at registration.
            params
                .entry(p.name.node.clone())
                .or_insert_with(|| Binding { ty: p.ty.clone(), span: p.name.span });
        }
        Self { table, class: sig.owner, frames: vec![params], declared_later: locals, is_static: false }
    }

    /// `main` has no `this`, and its `String[]` parameter has no MiniJava type.
    pub(crate) fn for_main(
        table: &'a ClassTable,
        class: ClassId,
        args: &Spanned<String>,
        locals: Vec<LocalDecl<'a>>,
    ) -> Self {
        let mut params = HashMap::new();
        params.insert(args.node.clone(), Binding { ty: Type::Unknown, span: args.span });
        Self { table, class, frames: vec![params], declared_later: locals, is_static: true }
    }

    pub(crate) fn table(&self) -> &'a ClassTable {
        self.table
    }

    pub(crate) fn class_name(&self) -> &'a str {
        &self.table.get(self.class).name.node
    }

    pub(crate) fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub(crate) fn pop_frame(&mut self) {
        // Never pop the parameter frame.
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    fn lookup_local(&self, name: &str) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Type of `name` without reporting anything.
    pub(crate) fn lookup(&self, name: &str) -> Option<Type> {
        if let Some(binding) = self.lookup_local(name) {
            return Some(binding.ty.clone());
        }
        if self.is_static {
            return None;
        }
        self.table.get(self.class).field(name).map(|f| f.ty.clone())
    }

    /// Resolve an identifier use at `span`, reporting `UndefinedVariable` on failure.
    pub(crate) fn resolve(&self, name: &str, span: Span, sink: &mut DiagnosticSink) -> Type {
        if let Some(ty) = self.lookup(name) {
            return ty;
        }
        // Only a later declaration in a block enclosing the use counts.
        let later = self.declared_later.iter().find(|decl| {
            decl.name.node == name
                && decl.name.span.start > span.start
                && decl.block.start <= span.start
                && span.end <= decl.block.end
        });
        match later {
            Some(decl) => sink.push(
                Diagnostic::error(
                    DiagnosticKind::UndefinedVariable,
                    format!("'{name}' is used before its declaration"),
                    span,
                )
                .with_note("declared here", decl.name.span),
            ),
            None => sink.error(
                DiagnosticKind::UndefinedVariable,
                format!("'{name}' does not exist in the current scope"),
                span,
            ),
        }
        Type::Unknown
    }

    /// Type of `this` at `span`.
    pub(crate) fn this_type(&self, span: Span, sink: &mut DiagnosticSink) -> Type {
        if self.is_static {
            sink.error(
                DiagnosticKind::UndefinedVariable,
                "'this' cannot be used in a static context",
                span,
            );
            return Type::Unknown;
        }
        Type::Class(self.class_name().to_string())
    }

    /// Bind a local declaration in the innermost frame. Redeclaring a visible
    /// local or parameter is reported and the earlier binding is kept.
    pub(crate) fn declare_local(&mut self, decl: &VarDecl, sink: &mut DiagnosticSink) {
        let ty = resolve_type(&decl.ty, self.table, sink);
        let name = &decl.name;
        if let Some(prev) = self.lookup_local(&name.node) {
            sink.push(
                Diagnostic::error(
                    DiagnosticKind::DuplicateVariable,
                    format!("variable '{}' is already declared in this method", name.node),
                    name.span,
                )
                .with_note("first declared here", prev.span),
            );
            return;
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.node.clone(), Binding { ty, span: name.span });
        }
    }
}
