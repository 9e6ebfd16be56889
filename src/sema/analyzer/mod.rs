// src/sema/analyzer/mod.rs

mod declarations;
mod expr;
mod stmt;

use crate::errors::SemanticError;
use crate::frontend::ast::{Decl, TypeRef, TypeRefKind};
use crate::frontend::{Ast, Interner, NodeId, Span};
use crate::sema::compatibility::is_subtype;
use crate::sema::scope::toplevel_lookup;
use crate::sema::types::Type;
use rustc_hash::FxHashMap;

/// A semantic error with the span it was reported at
#[derive(Debug, Clone)]
pub struct TypeError {
    pub error: SemanticError,
    pub span: Span,
}

impl TypeError {
    pub fn new(error: SemanticError, span: Span) -> Self {
        Self { error, span }
    }
}

/// One-pass semantic analyzer. Walks the tree top-down, resolves names
/// through the parent chain, fills the expression type table, and collects
/// diagnostics. Never aborts on user errors.
pub struct Analyzer<'a> {
    ast: &'a Ast,
    interner: &'a Interner,
    /// Inferred type per expression node, written exactly once each
    expr_types: FxHashMap<NodeId, Type>,
    errors: Vec<TypeError>,
}

impl<'a> Analyzer<'a> {
    pub fn new(ast: &'a Ast, interner: &'a Interner) -> Self {
        Self {
            ast,
            interner,
            expr_types: FxHashMap::default(),
            errors: Vec::new(),
        }
    }

    /// Analyze the program rooted at `root`. Returns the diagnostics sorted
    /// by source location (stable for equal positions); the error count is
    /// the vector's length.
    pub fn analyze(&mut self, root: NodeId) -> Result<(), Vec<TypeError>> {
        self.check_program(root);
        if self.errors.is_empty() {
            return Ok(());
        }
        let mut errors = std::mem::take(&mut self.errors);
        errors.sort_by_key(|e| (e.span.line, e.span.column));
        Err(errors)
    }

    /// Inferred type of an expression node, if analysis reached it
    pub fn expr_type(&self, id: NodeId) -> Option<&Type> {
        self.expr_types.get(&id)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn add_error(&mut self, error: SemanticError, span: Span) {
        self.errors.push(TypeError::new(error, span));
    }

    pub(crate) fn record_type(&mut self, id: NodeId, ty: Type) {
        let prev = self.expr_types.insert(id, ty);
        debug_assert!(prev.is_none(), "expression type assigned twice");
    }

    pub(crate) fn display(&self, ty: &Type) -> String {
        ty.display(self.interner)
    }

    pub(crate) fn name(&self, sym: crate::frontend::Symbol) -> String {
        self.interner.resolve(sym).to_string()
    }

    /// `sub` is acceptable where `sup` is expected: equal, subtype, or
    /// `null` against a reference type (covered by the subtype relation).
    pub(crate) fn assignable(&self, at: NodeId, sub: &Type, sup: &Type) -> bool {
        is_subtype(self.ast, at, sub, sup)
    }

    /// The type a declaration contributes when its name is used in an
    /// expression: a variable's declared type, a function's return type, a
    /// class or interface's named type.
    pub(crate) fn decl_type(&self, id: NodeId) -> Type {
        match self.ast.decl(id) {
            Some(Decl::Var(v)) => Type::from_type_ref(&v.declared),
            Some(Decl::Fn(f)) => Type::from_type_ref(&f.return_type),
            Some(Decl::Class(c)) => Type::Named(c.name.sym),
            Some(Decl::Interface(i)) => Type::Named(i.name.sym),
            None => Type::Error,
        }
    }

    /// Resolve a named annotation's base to its class or interface decl.
    pub(crate) fn resolve_named(&self, at: NodeId, ty: &TypeRef) -> Option<NodeId> {
        match &ty.base().kind {
            TypeRefKind::Named(sym) => toplevel_lookup(self.ast, at, *sym),
            _ => None,
        }
    }
}
