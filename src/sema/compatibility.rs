// src/sema/compatibility.rs
//! Subtyping over the extends/implements graph, and method signature
//! equality.

use crate::frontend::ast::{Decl, TypeRefKind};
use crate::frontend::{Ast, NodeId, Symbol};
use crate::sema::scope::toplevel_lookup;
use crate::sema::types::Type;
use rustc_hash::FxHashSet;

/// `sub <: sup`. Reflexive; `null` is a subtype of every reference type;
/// named types follow extends/implements edges transitively. Arrays are
/// invariant.
pub fn is_subtype(ast: &Ast, at: NodeId, sub: &Type, sup: &Type) -> bool {
    if sub == sup {
        return true;
    }
    match (sub, sup) {
        (Type::Null, t) if t.is_reference() => true,
        (Type::Named(start), Type::Named(target)) => named_subtype(ast, at, *start, *target),
        _ => false,
    }
}

/// Walk ancestors of `start` (superclasses and implemented interfaces)
/// looking for `target`. The visited set bounds malformed cyclic graphs.
fn named_subtype(ast: &Ast, at: NodeId, start: Symbol, target: Symbol) -> bool {
    let mut visited: FxHashSet<Symbol> = FxHashSet::default();
    let mut pending = vec![start];

    while let Some(name) = pending.pop() {
        if !visited.insert(name) {
            continue;
        }
        if name == target && name != start {
            return true;
        }
        let Some(decl_id) = toplevel_lookup(ast, at, name) else {
            continue;
        };
        if let Some(Decl::Class(class)) = ast.decl(decl_id) {
            if let Some(extends) = &class.extends {
                if let TypeRefKind::Named(parent) = &extends.kind {
                    if *parent == target {
                        return true;
                    }
                    pending.push(*parent);
                }
            }
            for implemented in &class.implements {
                if let TypeRefKind::Named(interface) = &implemented.kind {
                    if *interface == target {
                        return true;
                    }
                    pending.push(*interface);
                }
            }
        }
    }
    false
}

/// Signature equality: return types nominally equal, same formal count,
/// each formal type nominally equal in order. Annotations compare
/// structurally, which is exactly nominal equality for this type language.
pub fn signatures_match(ast: &Ast, a: NodeId, b: NodeId) -> bool {
    let (Some(Decl::Fn(fa)), Some(Decl::Fn(fb))) = (ast.decl(a), ast.decl(b)) else {
        return false;
    };
    if fa.return_type.kind != fb.return_type.kind {
        return false;
    }
    if fa.formals.len() != fb.formals.len() {
        return false;
    }
    fa.formals.iter().zip(&fb.formals).all(|(&x, &y)| {
        match (ast.decl(x), ast.decl(y)) {
            (Some(Decl::Var(vx)), Some(Decl::Var(vy))) => vx.declared.kind == vy.declared.kind,
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::NodeKind;
    use crate::frontend::{Interner, Parser};

    fn parse(source: &str) -> (Ast, Interner, NodeId) {
        let mut parser = Parser::new(source);
        let root = parser.parse_program().expect("parse failed");
        let (ast, interner) = parser.into_parts();
        (ast, interner, root)
    }

    fn named(interner: &Interner, name: &str) -> Type {
        Type::Named(interner.lookup(name).unwrap())
    }

    #[test]
    fn subtyping_is_reflexive() {
        let (ast, interner, root) = parse("class A { }");
        for ty in [
            Type::Int,
            Type::Double,
            Type::Null,
            named(&interner, "A"),
            Type::Array(Box::new(Type::Int)),
        ] {
            assert!(is_subtype(&ast, root, &ty, &ty));
        }
    }

    #[test]
    fn null_is_subtype_of_references_only() {
        let (ast, interner, root) = parse("class A { }");
        assert!(is_subtype(&ast, root, &Type::Null, &named(&interner, "A")));
        assert!(is_subtype(
            &ast,
            root,
            &Type::Null,
            &Type::Array(Box::new(Type::Int))
        ));
        assert!(!is_subtype(&ast, root, &Type::Null, &Type::Int));
        assert!(!is_subtype(&ast, root, &Type::Null, &Type::Bool));
        assert!(!is_subtype(&ast, root, &Type::Null, &Type::String));
    }

    #[test]
    fn extends_chain_is_transitive() {
        let (ast, interner, root) = parse(
            "class A { }\nclass B extends A { }\nclass C extends B { }",
        );
        assert!(is_subtype(&ast, root, &named(&interner, "C"), &named(&interner, "A")));
        assert!(!is_subtype(&ast, root, &named(&interner, "A"), &named(&interner, "C")));
    }

    #[test]
    fn implements_reaches_through_superclass() {
        let (ast, interner, root) = parse(
            "interface I { }\nclass A implements I { }\nclass B extends A { }",
        );
        assert!(is_subtype(&ast, root, &named(&interner, "B"), &named(&interner, "I")));
    }

    #[test]
    fn arrays_are_invariant() {
        let (ast, interner, root) = parse("class A { }\nclass B extends A { }");
        let arr_a = Type::Array(Box::new(named(&interner, "A")));
        let arr_b = Type::Array(Box::new(named(&interner, "B")));
        assert!(!is_subtype(&ast, root, &arr_b, &arr_a));
        assert!(is_subtype(&ast, root, &arr_a, &arr_a));
    }

    #[test]
    fn cyclic_graph_terminates() {
        let (ast, interner, root) = parse("class A extends B { }\nclass B extends A { }");
        // each direction resolves through a direct edge; the walk must not hang
        assert!(is_subtype(&ast, root, &named(&interner, "A"), &named(&interner, "B")));
        assert!(is_subtype(&ast, root, &named(&interner, "B"), &named(&interner, "A")));
    }

    fn fn_decl(ast: &Ast, interner: &Interner, name: &str) -> NodeId {
        ast.node_ids()
            .find(|&id| {
                matches!(ast.kind(id), NodeKind::Decl(Decl::Fn(f)) if interner.resolve(f.name.sym) == name)
            })
            .unwrap()
    }

    #[test]
    fn matching_signatures() {
        let (ast, interner, _root) = parse(
            "int f(int a, bool b) { return 0; }\nint g(int x, bool y) { return 1; }",
        );
        let f = fn_decl(&ast, &interner, "f");
        let g = fn_decl(&ast, &interner, "g");
        assert!(signatures_match(&ast, f, g));
    }

    #[test]
    fn differing_return_type_rejected() {
        let (ast, interner, _root) =
            parse("int f() { return 0; }\nbool g() { return true; }");
        let f = fn_decl(&ast, &interner, "f");
        let g = fn_decl(&ast, &interner, "g");
        assert!(!signatures_match(&ast, f, g));
    }

    #[test]
    fn differing_formal_count_rejected() {
        let (ast, interner, _root) =
            parse("void f(int a) { }\nvoid g(int a, int b) { }");
        let f = fn_decl(&ast, &interner, "f");
        let g = fn_decl(&ast, &interner, "g");
        assert!(!signatures_match(&ast, f, g));
    }

    #[test]
    fn formal_order_matters() {
        let (ast, interner, _root) =
            parse("void f(int a, bool b) { }\nvoid g(bool b, int a) { }");
        let f = fn_decl(&ast, &interner, "f");
        let g = fn_decl(&ast, &interner, "g");
        assert!(!signatures_match(&ast, f, g));
    }
}
