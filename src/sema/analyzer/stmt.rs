// src/sema/analyzer/stmt.rs
//
// Statement-context rules: test booleanity, break placement, return
// compatibility, Print argument restrictions.

use super::*;
use crate::frontend::ast::{Expr, NodeKind, Stmt};
use crate::sema::scope::{enclosing_function, in_breakable};

impl Analyzer<'_> {
    /// Check a node in statement position: either a statement proper or an
    /// expression used as one.
    pub(crate) fn check_stmt(&mut self, id: NodeId) {
        match self.ast.kind(id) {
            NodeKind::Expr(_) => {
                self.check_expr(id);
            }
            NodeKind::Stmt(stmt) => self.check_stmt_kind(id, stmt),
            _ => debug_assert!(false, "check_stmt on a declaration node"),
        }
    }

    fn check_stmt_kind(&mut self, id: NodeId, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => {
                self.check_duplicates(&block.decls, false);
                for &decl in &block.decls {
                    self.check_decl(decl);
                }
                for &stmt in &block.stmts {
                    self.check_stmt(stmt);
                }
            }
            Stmt::If(s) => {
                self.check_test(s.test);
                self.check_stmt(s.then_body);
                if let Some(else_body) = s.else_body {
                    self.check_stmt(else_body);
                }
            }
            Stmt::While(s) => {
                self.check_test(s.test);
                self.check_stmt(s.body);
            }
            Stmt::For(s) => {
                self.check_expr(s.init);
                self.check_test(s.test);
                self.check_expr(s.step);
                self.check_stmt(s.body);
            }
            Stmt::Return(s) => self.check_return(id, s.expr),
            Stmt::Break => {
                if !in_breakable(self.ast, id) {
                    let span = self.ast.span(id);
                    self.add_error(
                        SemanticError::BreakOutsideLoop { span: span.into() },
                        span,
                    );
                }
            }
            Stmt::Print(s) => {
                for (i, &arg) in s.args.iter().enumerate() {
                    let ty = self.check_expr(arg);
                    if !ty.is_printable() && !ty.is_error() {
                        let span = self.ast.span(arg);
                        self.add_error(
                            SemanticError::IncompatibleArgument {
                                index: i + 1,
                                given: self.display(&ty),
                                expected: "int/bool/string".to_string(),
                                span: span.into(),
                            },
                            span,
                        );
                    }
                }
            }
            Stmt::Switch(s) => {
                self.check_expr(s.expr);
                for &case in &s.cases {
                    self.check_stmt(case);
                }
            }
            Stmt::Case(s) => {
                if let Some(value) = s.value {
                    self.check_expr(value);
                }
                for &stmt in &s.stmts {
                    self.check_stmt(stmt);
                }
            }
        }
    }

    /// A present, non-error test must be boolean. Empty tests (for-clauses)
    /// are exempt.
    fn check_test(&mut self, test: NodeId) {
        let ty = self.check_expr(test);
        if matches!(self.ast.expr(test), Some(Expr::Empty)) {
            return;
        }
        if ty != Type::Bool && !ty.is_error() {
            let span = self.ast.span(test);
            self.add_error(SemanticError::TestNotBoolean { span: span.into() }, span);
        }
    }

    /// The returned type (void when the expression is omitted) must equal or
    /// be a subtype of the enclosing function's return type.
    fn check_return(&mut self, id: NodeId, expr: NodeId) {
        let is_empty = matches!(self.ast.expr(expr), Some(Expr::Empty));
        let given = if is_empty {
            self.check_expr(expr);
            Type::Void
        } else {
            self.check_expr(expr)
        };
        if given.is_error() {
            return;
        }

        let Some(function) = enclosing_function(self.ast, id) else {
            return;
        };
        let Some(f) = self.fn_decl(function) else {
            return;
        };
        let expected = Type::from_type_ref(&f.return_type);
        if self.assignable(id, &given, &expected) {
            return;
        }

        let span = if is_empty {
            self.ast.span(id)
        } else {
            self.ast.span(expr)
        };
        self.add_error(
            SemanticError::IncompatibleReturn {
                given: self.display(&given),
                expected: self.display(&expected),
                span: span.into(),
            },
            span,
        );
    }
}
