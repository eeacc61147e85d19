use std::collections::HashMap;

use crate::parser::ast::TypeExpr;
use crate::span::{Span, Spanned};
use super::types::Type;

/// Index of a class in the [`ClassTable`] arena. The main class is always
/// `ClassId(0)`; the remaining classes follow in source order, so the id of
/// `program.classes[i]` is `ClassId(i + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub usize);

#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: Spanned<String>,
    /// Declared type as written; resolved into `ty` by the second pass.
    pub type_expr: Spanned<TypeExpr>,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct ParamInfo {
    pub name: Spanned<String>,
    pub type_expr: Spanned<TypeExpr>,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct MethodSig {
    pub name: Spanned<String>,
    /// Class the method is declared in.
    pub owner: ClassId,
    pub params: Vec<ParamInfo>,
    pub return_type_expr: Spanned<TypeExpr>,
    pub return_type: Type,
}

impl MethodSig {
    pub fn param_types(&self) -> impl Iterator<Item = &Type> {
        self.params.iter().map(|p| &p.ty)
    }
}

#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: Spanned<String>,
    pub is_main: bool,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodSig>,
    field_index: HashMap<String, usize>,
    method_index: HashMap<String, usize>,
}

impl ClassInfo {
    fn new(name: Spanned<String>, is_main: bool) -> Self {
        Self {
            name,
            is_main,
            fields: Vec::new(),
            methods: Vec::new(),
            field_index: HashMap::new(),
            method_index: HashMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.field_index.get(name).map(|&i| &self.fields[i])
    }

    pub fn method(&self, name: &str) -> Option<&MethodSig> {
        self.method_index.get(name).map(|&i| &self.methods[i])
    }

    /// Adds a field. Returns the earlier field of the same name, if any; the
    /// earlier one stays visible.
    pub fn add_field(&mut self, field: FieldInfo) -> Option<&FieldInfo> {
        let idx = self.fields.len();
        let name = field.name.node.clone();
        self.fields.push(field);
        if let Some(&prev) = self.field_index.get(&name) {
            return Some(&self.fields[prev]);
        }
        self.field_index.insert(name, idx);
        None
    }

    /// Adds a method signature. Every signature is kept (so method bodies can
    /// be paired with it by position); a later duplicate shadows the earlier
    /// one for call resolution. Returns the name span of the shadowed method.
    pub fn add_method(&mut self, sig: MethodSig) -> Option<Span> {
        let idx = self.methods.len();
        let name = sig.name.node.clone();
        self.methods.push(sig);
        self.method_index
            .insert(name, idx)
            .map(|prev| self.methods[prev].name.span)
    }
}

/// Global class table: an arena of every class declaration plus a name index.
#[derive(Debug, Clone, Default)]
pub struct ClassTable {
    classes: Vec<ClassInfo>,
    by_name: HashMap<String, ClassId>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class to the arena. A later declaration with the same name
    /// shadows the earlier one; the shadowed declaration's name span is returned.
    pub fn add_class(&mut self, name: Spanned<String>, is_main: bool) -> (ClassId, Option<Span>) {
        let id = ClassId(self.classes.len());
        let key = name.node.clone();
        self.classes.push(ClassInfo::new(name, is_main));
        let shadowed = self.by_name.insert(key, id).map(|prev| self.classes[prev.0].name.span);
        (id, shadowed)
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, id: ClassId) -> &ClassInfo {
        &self.classes[id.0]
    }

    pub fn get_mut(&mut self, id: ClassId) -> &mut ClassInfo {
        &mut self.classes[id.0]
    }

    pub fn by_name(&self, name: &str) -> Option<&ClassInfo> {
        self.lookup(name).map(|id| self.get(id))
    }

    /// Method `method` of the class visible under `class`.
    pub fn method(&self, class: &str, method: &str) -> Option<&MethodSig> {
        self.by_name(class)?.method(method)
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.classes.len()).map(ClassId)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
