// src/sema/analyzer/declarations.rs
//
// Declaration checking: duplicate names, declared-type existence,
// inheritance validity, interface conformance, override signatures.

use super::*;
use crate::frontend::ast::{ClassDecl, FnDecl, NodeKind};
use crate::sema::compatibility::signatures_match;
use crate::sema::scope::{class_member, superclass_of};
use rustc_hash::FxHashSet;

impl Analyzer<'_> {
    pub(crate) fn check_program(&mut self, root: NodeId) {
        let Some(program) = self.ast.program(root) else {
            debug_assert!(false, "analyze called on a non-program node");
            return;
        };
        self.check_duplicates(&program.decls, true);
        for &decl in &program.decls {
            self.check_decl(decl);
        }
    }

    /// Report same-named siblings within one scope container. The first
    /// declaration keeps the binding; each later one conflicts. At the top
    /// level a class/class collision is left to the parser's one-slot rule.
    pub(crate) fn check_duplicates(&mut self, decls: &[NodeId], exempt_classes: bool) {
        let mut seen: FxHashMap<crate::frontend::Symbol, NodeId> = FxHashMap::default();
        for &id in decls {
            let Some(name) = self.ast.decl_name(id) else {
                continue;
            };
            match seen.get(&name.sym) {
                Some(&prev) => {
                    let both_classes = matches!(self.ast.decl(prev), Some(Decl::Class(_)))
                        && matches!(self.ast.decl(id), Some(Decl::Class(_)));
                    if exempt_classes && both_classes {
                        continue;
                    }
                    let line = self.ast.span(prev).line;
                    self.add_error(
                        SemanticError::ConflictingDeclaration {
                            name: self.name(name.sym),
                            line,
                            span: name.span.into(),
                        },
                        name.span,
                    );
                }
                None => {
                    seen.insert(name.sym, id);
                }
            }
        }
    }

    pub(crate) fn check_decl(&mut self, id: NodeId) {
        match self.ast.decl(id) {
            Some(Decl::Var(v)) => {
                self.check_type_ref(id, &v.declared);
            }
            Some(Decl::Fn(_)) => self.check_fn(id),
            Some(Decl::Class(_)) => self.check_class(id),
            Some(Decl::Interface(i)) => {
                self.check_duplicates(&i.members, false);
                for &member in &i.members {
                    self.check_decl(member);
                }
            }
            None => debug_assert!(false, "check_decl on a non-decl node"),
        }
    }

    fn check_fn(&mut self, id: NodeId) {
        let Some(Decl::Fn(f)) = self.ast.decl(id) else {
            return;
        };
        let in_interface = matches!(
            self.ast.parent(id).map(|p| self.ast.kind(p)),
            Some(NodeKind::Decl(Decl::Interface(_)))
        );
        debug_assert!(
            f.body.is_some() != in_interface,
            "function body present iff outside an interface"
        );

        self.check_type_ref(id, &f.return_type);
        self.check_duplicates(&f.formals, false);
        for &formal in &f.formals {
            self.check_decl(formal);
        }
        if let Some(body) = f.body {
            self.check_stmt(body);
        }
    }

    fn check_class(&mut self, id: NodeId) {
        let Some(Decl::Class(class)) = self.ast.decl(id) else {
            return;
        };
        let class_name = class.name.sym;
        let members = &class.members;

        // extends must name a class
        if let Some(extends) = &class.extends {
            if let TypeRefKind::Named(sym) = &extends.kind {
                let target = toplevel_lookup(self.ast, id, *sym);
                if !matches!(target.and_then(|t| self.ast.decl(t)), Some(Decl::Class(_))) {
                    self.add_error(
                        SemanticError::UndeclaredClass {
                            name: self.name(*sym),
                            span: extends.span.into(),
                        },
                        extends.span,
                    );
                }
            }
        }

        // implements entries must name interfaces, without repeats
        let mut listed: FxHashSet<crate::frontend::Symbol> = FxHashSet::default();
        let mut interfaces: Vec<(NodeId, &TypeRef)> = Vec::new();
        for entry in &class.implements {
            let TypeRefKind::Named(sym) = &entry.kind else {
                continue;
            };
            if !listed.insert(*sym) {
                self.add_error(
                    SemanticError::RepeatedInterface {
                        class: self.name(class_name),
                        interface: self.name(*sym),
                        span: entry.span.into(),
                    },
                    entry.span,
                );
                continue;
            }
            let target = toplevel_lookup(self.ast, id, *sym);
            match target {
                Some(t) if matches!(self.ast.decl(t), Some(Decl::Interface(_))) => {
                    interfaces.push((t, entry));
                }
                _ => {
                    self.add_error(
                        SemanticError::UndeclaredInterface {
                            name: self.name(*sym),
                            span: entry.span.into(),
                        },
                        entry.span,
                    );
                }
            }
        }

        self.check_duplicates(members, false);
        for &member in members {
            self.check_decl(member);
        }

        self.check_overrides(id, members);
        for (interface, entry) in interfaces {
            self.check_conformance(id, class_name, interface, entry);
        }
    }

    /// Locally redeclared superclass methods must keep the signature.
    fn check_overrides(&mut self, class: NodeId, members: &[NodeId]) {
        let Some(superclass) = superclass_of(self.ast, class) else {
            return;
        };
        for &member in members {
            let Some(Decl::Fn(f)) = self.ast.decl(member) else {
                continue;
            };
            let name = f.name;
            let mut visited = FxHashSet::default();
            let inherited = class_member(self.ast, superclass, name.sym, &mut visited);
            if let Some(inherited) = inherited {
                if matches!(self.ast.decl(inherited), Some(Decl::Fn(_)))
                    && !signatures_match(self.ast, member, inherited)
                {
                    self.add_error(
                        SemanticError::SignatureMismatch {
                            method: self.name(name.sym),
                            span: name.span.into(),
                        },
                        name.span,
                    );
                }
            }
        }
    }

    /// Every method the interface declares must exist on the class
    /// (inherited counts) with an equal signature. Missing methods and
    /// inherited-only mismatches batch into one class-level diagnostic per
    /// interface; a mismatch on a locally declared method points at it.
    fn check_conformance(
        &mut self,
        class: NodeId,
        class_name: crate::frontend::Symbol,
        interface: NodeId,
        entry: &TypeRef,
    ) {
        let Some(Decl::Interface(decl)) = self.ast.decl(interface) else {
            return;
        };
        let interface_name = decl.name.sym;

        let mut incomplete = false;
        for &wanted in &decl.members {
            let Some(Decl::Fn(proto)) = self.ast.decl(wanted) else {
                continue;
            };
            let method_name = proto.name;
            let mut visited = FxHashSet::default();
            let found = class_member(self.ast, class, method_name.sym, &mut visited);
            let Some(found) = found else {
                incomplete = true;
                continue;
            };
            if !matches!(self.ast.decl(found), Some(Decl::Fn(_))) {
                incomplete = true;
                continue;
            }
            if signatures_match(self.ast, found, wanted) {
                continue;
            }
            let declared_here = self.ast.parent(found) == Some(class);
            if declared_here {
                let name = self.ast.decl_name(found).unwrap_or(method_name);
                self.add_error(
                    SemanticError::SignatureMismatch {
                        method: self.name(name.sym),
                        span: name.span.into(),
                    },
                    name.span,
                );
            } else {
                incomplete = true;
            }
        }

        if incomplete {
            self.add_error(
                SemanticError::InterfaceNotImplemented {
                    class: self.name(class_name),
                    interface: self.name(interface_name),
                    span: entry.span.into(),
                },
                entry.span,
            );
        }
    }

    /// A named base of a declared type must resolve to a class or interface.
    pub(crate) fn check_type_ref(&mut self, at: NodeId, ty: &TypeRef) -> bool {
        let base = ty.base();
        let TypeRefKind::Named(sym) = &base.kind else {
            return true;
        };
        let resolved = toplevel_lookup(self.ast, at, *sym);
        let exists = matches!(
            resolved.and_then(|id| self.ast.decl(id)),
            Some(Decl::Class(_)) | Some(Decl::Interface(_))
        );
        if !exists {
            self.add_error(
                SemanticError::UndeclaredType {
                    name: self.name(*sym),
                    span: base.span.into(),
                },
                base.span,
            );
        }
        exists
    }

    /// Look up a callable member on a class or interface decl.
    pub(crate) fn find_method(&self, holder: NodeId, name: crate::frontend::Symbol) -> Option<NodeId> {
        match self.ast.decl(holder) {
            Some(Decl::Class(_)) => {
                let mut visited = FxHashSet::default();
                let member = class_member(self.ast, holder, name, &mut visited)?;
                matches!(self.ast.decl(member), Some(Decl::Fn(_))).then_some(member)
            }
            Some(Decl::Interface(decl)) => decl
                .members
                .iter()
                .copied()
                .find(|&m| self.ast.decl_name(m).is_some_and(|n| n.sym == name)),
            _ => None,
        }
    }

    /// Look up a field (variable member) on a class decl, inherited included.
    pub(crate) fn find_field(&self, holder: NodeId, name: crate::frontend::Symbol) -> Option<NodeId> {
        match self.ast.decl(holder) {
            Some(Decl::Class(_)) => {
                let mut visited = FxHashSet::default();
                let member = class_member(self.ast, holder, name, &mut visited)?;
                matches!(self.ast.decl(member), Some(Decl::Var(_))).then_some(member)
            }
            _ => None,
        }
    }

}

// Accessors returning arena-lifetime references, so callers can keep them
// across error reporting.
impl<'a> Analyzer<'a> {
    pub(crate) fn class_decl(&self, id: NodeId) -> Option<&'a ClassDecl> {
        match self.ast.decl(id) {
            Some(Decl::Class(c)) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn fn_decl(&self, id: NodeId) -> Option<&'a FnDecl> {
        match self.ast.decl(id) {
            Some(Decl::Fn(f)) => Some(f),
            _ => None,
        }
    }
}
