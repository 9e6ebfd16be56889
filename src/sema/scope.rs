// src/sema/scope.rs
//! Parent-chain name resolution. Scopes are implicit in tree structure: each
//! lookup walks the arena's parent links upward, consulting the nodes that
//! introduce bindings (program, block, function formals, class members,
//! interface members).

use crate::frontend::ast::{Decl, NodeKind, Stmt, TypeRefKind};
use crate::frontend::{Ast, NodeId, Symbol};
use rustc_hash::FxHashSet;

/// Find the declaration named `name` visible at `from`. Inner scopes win:
/// block locals over formals, formals over class members, class members over
/// globals. Subclass members shadow superclass members.
pub fn lookup_name(ast: &Ast, from: NodeId, name: Symbol) -> Option<NodeId> {
    let mut at = Some(from);
    while let Some(node) = at {
        if let Some(found) = lookup_local(ast, node, name) {
            return Some(found);
        }
        at = ast.parent(node);
    }
    None
}

/// Bindings introduced directly at `node`, if it is a scope-bearing node.
fn lookup_local(ast: &Ast, node: NodeId, name: Symbol) -> Option<NodeId> {
    match ast.kind(node) {
        NodeKind::Program(program) => find_named(ast, &program.decls, name),
        NodeKind::Stmt(Stmt::Block(block)) => find_named(ast, &block.decls, name),
        NodeKind::Decl(Decl::Fn(f)) => find_named(ast, &f.formals, name),
        NodeKind::Decl(Decl::Class(_)) => {
            let mut visited = FxHashSet::default();
            class_member(ast, node, name, &mut visited)
        }
        NodeKind::Decl(Decl::Interface(i)) => find_named(ast, &i.members, name),
        _ => None,
    }
}

fn find_named(ast: &Ast, decls: &[NodeId], name: Symbol) -> Option<NodeId> {
    decls
        .iter()
        .copied()
        .find(|&id| ast.decl_name(id).is_some_and(|n| n.sym == name))
}

/// Member lookup on a class: own members first, then the superclass chain.
/// The visited set bounds the walk on malformed cyclic hierarchies.
pub fn class_member(
    ast: &Ast,
    class: NodeId,
    name: Symbol,
    visited: &mut FxHashSet<NodeId>,
) -> Option<NodeId> {
    if !visited.insert(class) {
        return None;
    }
    let Some(Decl::Class(decl)) = ast.decl(class) else {
        return None;
    };
    if let Some(found) = find_named(ast, &decl.members, name) {
        return Some(found);
    }
    let superclass = superclass_of(ast, class)?;
    class_member(ast, superclass, name, visited)
}

/// Resolve a class's `extends` reference to the superclass decl, if any.
pub fn superclass_of(ast: &Ast, class: NodeId) -> Option<NodeId> {
    let Some(Decl::Class(decl)) = ast.decl(class) else {
        return None;
    };
    let extends = decl.extends.as_ref()?;
    let TypeRefKind::Named(sym) = &extends.kind else {
        return None;
    };
    match toplevel_lookup(ast, class, *sym) {
        Some(id) if matches!(ast.decl(id), Some(Decl::Class(_))) => Some(id),
        _ => None,
    }
}

/// Look a name up among the program's top-level decls, starting from any
/// node. Type names resolve here: classes and interfaces are top-level only.
pub fn toplevel_lookup(ast: &Ast, from: NodeId, name: Symbol) -> Option<NodeId> {
    let mut at = from;
    while let Some(parent) = ast.parent(at) {
        at = parent;
    }
    let program = ast.program(at)?;
    find_named(ast, &program.decls, name)
}

/// Nearest enclosing class of `from`, if any.
pub fn enclosing_class(ast: &Ast, from: NodeId) -> Option<NodeId> {
    let mut at = Some(from);
    while let Some(node) = at {
        if matches!(ast.kind(node), NodeKind::Decl(Decl::Class(_))) {
            return Some(node);
        }
        at = ast.parent(node);
    }
    None
}

/// Nearest enclosing function of `from`, if any.
pub fn enclosing_function(ast: &Ast, from: NodeId) -> Option<NodeId> {
    let mut at = Some(from);
    while let Some(node) = at {
        if matches!(ast.kind(node), NodeKind::Decl(Decl::Fn(_))) {
            return Some(node);
        }
        at = ast.parent(node);
    }
    None
}

/// True when `from` sits inside a breakable statement (for, while, switch).
pub fn in_breakable(ast: &Ast, from: NodeId) -> bool {
    let mut at = ast.parent(from);
    while let Some(node) = at {
        if ast.is_breakable(node) {
            return true;
        }
        at = ast.parent(node);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Parser;
    use crate::frontend::ast::{Decl, Stmt};

    fn parse(source: &str) -> (Ast, crate::frontend::Interner, NodeId) {
        let mut parser = Parser::new(source);
        let root = parser.parse_program().expect("parse failed");
        let (ast, interner) = parser.into_parts();
        (ast, interner, root)
    }

    /// First node satisfying a predicate, in allocation order
    fn find_node(ast: &Ast, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        ast.node_ids().find(|&id| pred(ast.kind(id)))
    }

    #[test]
    fn block_local_shadows_global() {
        let (ast, interner, _root) = parse("int x;\nvoid f() { double x; x = 1.0; }");
        let x = interner.lookup("x").unwrap();
        // find the assignment's left FieldAccess node
        let access = find_node(&ast, |k| {
            matches!(k, NodeKind::Expr(crate::frontend::ast::Expr::FieldAccess { base: None, .. }))
        })
        .unwrap();
        let found = lookup_name(&ast, access, x).unwrap();
        let Some(Decl::Var(var)) = ast.decl(found) else {
            panic!("expected var");
        };
        // the block-local double, not the global int
        assert_eq!(var.declared.kind, crate::frontend::ast::TypeRefKind::Double);
    }

    #[test]
    fn formal_is_visible_in_body() {
        let (ast, interner, _root) = parse("void f(int n) { n = 2; }");
        let n = interner.lookup("n").unwrap();
        let access = find_node(&ast, |k| {
            matches!(k, NodeKind::Expr(crate::frontend::ast::Expr::FieldAccess { base: None, .. }))
        })
        .unwrap();
        assert!(lookup_name(&ast, access, n).is_some());
    }

    #[test]
    fn lookup_is_idempotent() {
        let (ast, interner, _root) = parse("int g;\nvoid f() { g = 1; }");
        let g = interner.lookup("g").unwrap();
        let access = find_node(&ast, |k| {
            matches!(k, NodeKind::Expr(crate::frontend::ast::Expr::FieldAccess { base: None, .. }))
        })
        .unwrap();
        assert_eq!(lookup_name(&ast, access, g), lookup_name(&ast, access, g));
    }

    #[test]
    fn subclass_member_shadows_superclass() {
        let (ast, interner, _root) =
            parse("class A { int v; }\nclass B extends A { double v; }");
        let v = interner.lookup("v").unwrap();
        let b = find_node(&ast, |k| {
            matches!(k, NodeKind::Decl(Decl::Class(c)) if interner.resolve(c.name.sym) == "B")
        })
        .unwrap();
        let mut visited = FxHashSet::default();
        let found = class_member(&ast, b, v, &mut visited).unwrap();
        let Some(Decl::Var(var)) = ast.decl(found) else {
            panic!("expected var");
        };
        assert_eq!(var.declared.kind, crate::frontend::ast::TypeRefKind::Double);
    }

    #[test]
    fn inherited_member_found_through_chain() {
        let (ast, interner, _root) = parse(
            "class A { int v; }\nclass B extends A { }\nclass C extends B { }",
        );
        let v = interner.lookup("v").unwrap();
        let c = find_node(&ast, |k| {
            matches!(k, NodeKind::Decl(Decl::Class(cl)) if interner.resolve(cl.name.sym) == "C")
        })
        .unwrap();
        let mut visited = FxHashSet::default();
        assert!(class_member(&ast, c, v, &mut visited).is_some());
    }

    #[test]
    fn cyclic_extends_terminates() {
        let (ast, interner, _root) =
            parse("class A extends B { }\nclass B extends A { }");
        let missing = interner.lookup("A").unwrap();
        let a = find_node(&ast, |k| matches!(k, NodeKind::Decl(Decl::Class(_)))).unwrap();
        let mut visited = FxHashSet::default();
        // looks for a member named 'A'; must return None, not hang
        assert!(class_member(&ast, a, missing, &mut visited).is_none());
    }

    #[test]
    fn enclosing_class_and_function() {
        let (ast, _interner, _root) = parse("class A { void m() { return; } }");
        let ret = find_node(&ast, |k| matches!(k, NodeKind::Stmt(Stmt::Return(_)))).unwrap();
        let class = enclosing_class(&ast, ret).unwrap();
        assert!(matches!(ast.decl(class), Some(Decl::Class(_))));
        let func = enclosing_function(&ast, ret).unwrap();
        assert!(matches!(ast.decl(func), Some(Decl::Fn(_))));
    }

    #[test]
    fn break_context_detection() {
        let (ast, _interner, _root) =
            parse("void f() { while (true) { break; } break; }");
        let breaks: Vec<_> = ast
            .node_ids()
            .filter(|&id| matches!(ast.kind(id), NodeKind::Stmt(Stmt::Break)))
            .collect();
        assert_eq!(breaks.len(), 2);
        assert!(in_breakable(&ast, breaks[0]));
        assert!(!in_breakable(&ast, breaks[1]));
    }
}
