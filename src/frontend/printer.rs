// src/frontend/printer.rs
//! Indented AST dump for the `inspect ast` subcommand. Debug aid only.

use crate::frontend::ast::*;
use crate::frontend::{Ast, Interner};
use std::fmt::Write;

pub fn print_ast(ast: &Ast, interner: &Interner, root: NodeId) -> String {
    let mut printer = Printer {
        ast,
        interner,
        out: String::new(),
    };
    printer.node(root, 0, "");
    printer.out
}

struct Printer<'a> {
    ast: &'a Ast,
    interner: &'a Interner,
    out: String,
}

impl Printer<'_> {
    fn line(&mut self, id: NodeId, indent: usize, label: &str, text: &str) {
        let line = self.ast.span(id).line;
        let _ = writeln!(
            self.out,
            "{:>3}{:indent$}{}{}",
            line,
            "",
            label,
            text,
            indent = indent * 3 + 1
        );
    }

    fn type_ref(&self, ty: &TypeRef) -> String {
        match &ty.kind {
            TypeRefKind::Int => "int".to_string(),
            TypeRefKind::Double => "double".to_string(),
            TypeRefKind::Bool => "bool".to_string(),
            TypeRefKind::String => "string".to_string(),
            TypeRefKind::Void => "void".to_string(),
            TypeRefKind::Named(sym) => self.interner.resolve(*sym).to_string(),
            TypeRefKind::Array(inner) => format!("{}[]", self.type_ref(inner)),
        }
    }

    fn name(&self, ident: Ident) -> &str {
        self.interner.resolve(ident.sym)
    }

    fn node(&mut self, id: NodeId, indent: usize, label: &str) {
        match self.ast.kind(id) {
            NodeKind::Program(p) => {
                self.line(id, indent, label, "Program:");
                for &decl in &p.decls {
                    self.node(decl, indent + 1, "");
                }
            }
            NodeKind::Decl(decl) => self.decl(id, decl, indent, label),
            NodeKind::Stmt(stmt) => self.stmt(id, stmt, indent, label),
            NodeKind::Expr(expr) => self.expr(id, expr, indent, label),
        }
    }

    fn decl(&mut self, id: NodeId, decl: &Decl, indent: usize, label: &str) {
        match decl {
            Decl::Var(v) => {
                let text = format!("VarDecl: {} {}", self.type_ref(&v.declared), self.name(v.name));
                self.line(id, indent, label, &text);
            }
            Decl::Fn(f) => {
                let text = format!(
                    "FnDecl: {} {}",
                    self.type_ref(&f.return_type),
                    self.name(f.name)
                );
                self.line(id, indent, label, &text);
                for &formal in &f.formals {
                    self.node(formal, indent + 1, "(formal) ");
                }
                if let Some(body) = f.body {
                    self.node(body, indent + 1, "(body) ");
                }
            }
            Decl::Class(c) => {
                let mut text = format!("ClassDecl: {}", self.name(c.name));
                if let Some(extends) = &c.extends {
                    let _ = write!(text, " extends {}", self.type_ref(extends));
                }
                if !c.implements.is_empty() {
                    let list: Vec<_> = c.implements.iter().map(|t| self.type_ref(t)).collect();
                    let _ = write!(text, " implements {}", list.join(", "));
                }
                self.line(id, indent, label, &text);
                for &member in &c.members {
                    self.node(member, indent + 1, "");
                }
            }
            Decl::Interface(i) => {
                let text = format!("InterfaceDecl: {}", self.name(i.name));
                self.line(id, indent, label, &text);
                for &member in &i.members {
                    self.node(member, indent + 1, "");
                }
            }
        }
    }

    fn stmt(&mut self, id: NodeId, stmt: &Stmt, indent: usize, label: &str) {
        match stmt {
            Stmt::Block(b) => {
                self.line(id, indent, label, "StmtBlock:");
                for &decl in &b.decls {
                    self.node(decl, indent + 1, "");
                }
                for &stmt in &b.stmts {
                    self.node(stmt, indent + 1, "");
                }
            }
            Stmt::If(s) => {
                self.line(id, indent, label, "IfStmt:");
                self.node(s.test, indent + 1, "(test) ");
                self.node(s.then_body, indent + 1, "(then) ");
                if let Some(else_body) = s.else_body {
                    self.node(else_body, indent + 1, "(else) ");
                }
            }
            Stmt::While(s) => {
                self.line(id, indent, label, "WhileStmt:");
                self.node(s.test, indent + 1, "(test) ");
                self.node(s.body, indent + 1, "(body) ");
            }
            Stmt::For(s) => {
                self.line(id, indent, label, "ForStmt:");
                self.node(s.init, indent + 1, "(init) ");
                self.node(s.test, indent + 1, "(test) ");
                self.node(s.step, indent + 1, "(step) ");
                self.node(s.body, indent + 1, "(body) ");
            }
            Stmt::Return(s) => {
                self.line(id, indent, label, "ReturnStmt:");
                self.node(s.expr, indent + 1, "");
            }
            Stmt::Break => self.line(id, indent, label, "BreakStmt"),
            Stmt::Print(s) => {
                self.line(id, indent, label, "PrintStmt:");
                for &arg in &s.args {
                    self.node(arg, indent + 1, "(args) ");
                }
            }
            Stmt::Switch(s) => {
                self.line(id, indent, label, "SwitchStmt:");
                self.node(s.expr, indent + 1, "");
                for &case in &s.cases {
                    self.node(case, indent + 1, "");
                }
            }
            Stmt::Case(s) => {
                let name = if s.value.is_some() { "Case:" } else { "Default:" };
                self.line(id, indent, label, name);
                if let Some(value) = s.value {
                    self.node(value, indent + 1, "");
                }
                for &stmt in &s.stmts {
                    self.node(stmt, indent + 1, "");
                }
            }
        }
    }

    fn expr(&mut self, id: NodeId, expr: &Expr, indent: usize, label: &str) {
        match expr {
            Expr::IntConstant(v) => {
                self.line(id, indent, label, &format!("IntConstant: {}", v));
            }
            Expr::DoubleConstant(v) => {
                self.line(id, indent, label, &format!("DoubleConstant: {}", v));
            }
            Expr::BoolConstant(v) => {
                self.line(id, indent, label, &format!("BoolConstant: {}", v));
            }
            Expr::StringConstant(v) => {
                self.line(id, indent, label, &format!("StringConstant: \"{}\"", v));
            }
            Expr::NullConstant => self.line(id, indent, label, "NullConstant"),
            Expr::Empty => self.line(id, indent, label, "Empty"),
            Expr::This => self.line(id, indent, label, "This"),
            Expr::ReadInteger => self.line(id, indent, label, "ReadIntegerExpr"),
            Expr::ReadLine => self.line(id, indent, label, "ReadLineExpr"),
            Expr::Arithmetic {
                op, left, right, ..
            } => {
                self.line(id, indent, label, &format!("ArithmeticExpr: {}", op.as_str()));
                if let Some(left) = left {
                    self.node(*left, indent + 1, "");
                }
                self.node(*right, indent + 1, "");
            }
            Expr::Relational {
                op, left, right, ..
            } => {
                self.line(id, indent, label, &format!("RelationalExpr: {}", op.as_str()));
                self.node(*left, indent + 1, "");
                self.node(*right, indent + 1, "");
            }
            Expr::Equality {
                op, left, right, ..
            } => {
                self.line(id, indent, label, &format!("EqualityExpr: {}", op.as_str()));
                self.node(*left, indent + 1, "");
                self.node(*right, indent + 1, "");
            }
            Expr::Logical {
                op, left, right, ..
            } => {
                self.line(id, indent, label, &format!("LogicalExpr: {}", op.as_str()));
                if let Some(left) = left {
                    self.node(*left, indent + 1, "");
                }
                self.node(*right, indent + 1, "");
            }
            Expr::Assign { left, right, .. } => {
                self.line(id, indent, label, "AssignExpr: =");
                self.node(*left, indent + 1, "");
                self.node(*right, indent + 1, "");
            }
            Expr::ArrayAccess { base, subscript } => {
                self.line(id, indent, label, "ArrayAccess:");
                self.node(*base, indent + 1, "");
                self.node(*subscript, indent + 1, "(subscript) ");
            }
            Expr::FieldAccess { base, field } => {
                let text = format!("FieldAccess: {}", self.name(*field));
                self.line(id, indent, label, &text);
                if let Some(base) = base {
                    self.node(*base, indent + 1, "");
                }
            }
            Expr::Call {
                base,
                field,
                actuals,
            } => {
                let text = format!("Call: {}", self.name(*field));
                self.line(id, indent, label, &text);
                if let Some(base) = base {
                    self.node(*base, indent + 1, "");
                }
                for &actual in actuals {
                    self.node(actual, indent + 1, "(actuals) ");
                }
            }
            Expr::New { class } => {
                let text = format!("NewExpr: {}", self.type_ref(class));
                self.line(id, indent, label, &text);
            }
            Expr::NewArray { size, elem } => {
                let text = format!("NewArrayExpr: {}", self.type_ref(elem));
                self.line(id, indent, label, &text);
                self.node(*size, indent + 1, "(size) ");
            }
            Expr::Postfix { op, lvalue, .. } => {
                self.line(id, indent, label, &format!("PostfixExpr: {}", op.as_str()));
                self.node(*lvalue, indent + 1, "");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Parser;

    #[test]
    fn dump_shows_structure() {
        let mut parser = Parser::new("int x;\nvoid main() { Print(1); }");
        let root = parser.parse_program().unwrap();
        let (ast, interner) = parser.into_parts();
        let dump = print_ast(&ast, &interner, root);
        assert!(dump.contains("Program:"));
        assert!(dump.contains("VarDecl: int x"));
        assert!(dump.contains("FnDecl: void main"));
        assert!(dump.contains("PrintStmt:"));
        assert!(dump.contains("IntConstant: 1"));
    }
}
