// src/frontend/ast.rs
//
// The tree is stored in an arena: nodes live in one vector and refer to each
// other through `NodeId` indices. Parent links are wired by `Ast::alloc` when
// a parent is created over already-allocated children, mirroring the
// bottom-up parse.

use crate::frontend::Span;
use smallvec::SmallVec;

/// Unique identifier for symbols (interned strings)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(pub u32);

/// Index of a node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named occurrence with its own location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident {
    pub sym: Symbol,
    pub span: Span,
}

/// A parsed type annotation. Not an arena node: carried inline by the decl
/// or expression that wrote it, resolved during checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub kind: TypeRefKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRefKind {
    Int,
    Double,
    Bool,
    String,
    Void,
    Named(Symbol),
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// The innermost non-array annotation (`int[][]` -> `int`)
    pub fn base(&self) -> &TypeRef {
        match &self.kind {
            TypeRefKind::Array(inner) => inner.base(),
            _ => self,
        }
    }
}

#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
}

#[derive(Debug)]
pub enum NodeKind {
    Program(Program),
    Decl(Decl),
    Stmt(Stmt),
    Expr(Expr),
}

#[derive(Debug)]
pub struct Program {
    pub decls: Vec<NodeId>,
}

#[derive(Debug)]
pub enum Decl {
    Var(VarDecl),
    Fn(FnDecl),
    Class(ClassDecl),
    Interface(InterfaceDecl),
}

impl Decl {
    pub fn name(&self) -> Ident {
        match self {
            Decl::Var(d) => d.name,
            Decl::Fn(d) => d.name,
            Decl::Class(d) => d.name,
            Decl::Interface(d) => d.name,
        }
    }
}

#[derive(Debug)]
pub struct VarDecl {
    pub name: Ident,
    pub declared: TypeRef,
}

#[derive(Debug)]
pub struct FnDecl {
    pub name: Ident,
    pub return_type: TypeRef,
    pub formals: Vec<NodeId>,
    /// None only for interface prototypes
    pub body: Option<NodeId>,
}

#[derive(Debug)]
pub struct ClassDecl {
    pub name: Ident,
    pub extends: Option<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub members: Vec<NodeId>,
}

#[derive(Debug)]
pub struct InterfaceDecl {
    pub name: Ident,
    pub members: Vec<NodeId>,
}

#[derive(Debug)]
pub enum Stmt {
    Block(BlockStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Break,
    Print(PrintStmt),
    Switch(SwitchStmt),
    Case(CaseStmt),
}

#[derive(Debug)]
pub struct BlockStmt {
    pub decls: Vec<NodeId>,
    /// Statement positions may hold expression nodes directly
    pub stmts: Vec<NodeId>,
}

#[derive(Debug)]
pub struct IfStmt {
    pub test: NodeId,
    pub then_body: NodeId,
    pub else_body: Option<NodeId>,
}

#[derive(Debug)]
pub struct WhileStmt {
    pub test: NodeId,
    pub body: NodeId,
}

#[derive(Debug)]
pub struct ForStmt {
    /// Each of init/test/step may be the Empty expression
    pub init: NodeId,
    pub test: NodeId,
    pub step: NodeId,
    pub body: NodeId,
}

#[derive(Debug)]
pub struct ReturnStmt {
    /// Empty expression when the return carries no value
    pub expr: NodeId,
}

#[derive(Debug)]
pub struct PrintStmt {
    pub args: Vec<NodeId>,
}

#[derive(Debug)]
pub struct SwitchStmt {
    pub expr: NodeId,
    pub cases: Vec<NodeId>,
}

#[derive(Debug)]
pub struct CaseStmt {
    /// None for the default case
    pub value: Option<NodeId>,
    pub stmts: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelOp {
    pub fn as_str(self) -> &'static str {
        match self {
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqOp {
    Eq,
    Ne,
}

impl EqOp {
    pub fn as_str(self) -> &'static str {
        match self {
            EqOp::Eq => "==",
            EqOp::Ne => "!=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
    Not,
}

impl LogicOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicOp::And => "&&",
            LogicOp::Or => "||",
            LogicOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Inc,
    Dec,
}

impl PostfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PostfixOp::Inc => "++",
            PostfixOp::Dec => "--",
        }
    }
}

#[derive(Debug)]
pub enum Expr {
    IntConstant(i32),
    DoubleConstant(f64),
    BoolConstant(bool),
    StringConstant(String),
    NullConstant,
    /// Stands in for an omitted expression (for-clauses, bare return)
    Empty,
    This,
    ReadInteger,
    ReadLine,
    Arithmetic {
        op: ArithOp,
        op_span: Span,
        /// None for unary minus
        left: Option<NodeId>,
        right: NodeId,
    },
    Relational {
        op: RelOp,
        op_span: Span,
        left: NodeId,
        right: NodeId,
    },
    Equality {
        op: EqOp,
        op_span: Span,
        left: NodeId,
        right: NodeId,
    },
    Logical {
        op: LogicOp,
        op_span: Span,
        /// None for unary '!'
        left: Option<NodeId>,
        right: NodeId,
    },
    Assign {
        op_span: Span,
        left: NodeId,
        right: NodeId,
    },
    ArrayAccess {
        base: NodeId,
        subscript: NodeId,
    },
    FieldAccess {
        /// None means no explicit base
        base: Option<NodeId>,
        field: Ident,
    },
    Call {
        base: Option<NodeId>,
        field: Ident,
        actuals: Vec<NodeId>,
    },
    New {
        class: TypeRef,
    },
    NewArray {
        size: NodeId,
        elem: TypeRef,
    },
    Postfix {
        op: PostfixOp,
        op_span: Span,
        lvalue: NodeId,
    },
}

impl NodeKind {
    /// Direct children, in source order
    pub fn collect_children(&self, out: &mut SmallVec<[NodeId; 8]>) {
        match self {
            NodeKind::Program(p) => out.extend_from_slice(&p.decls),
            NodeKind::Decl(decl) => match decl {
                Decl::Var(_) => {}
                Decl::Fn(f) => {
                    out.extend_from_slice(&f.formals);
                    if let Some(body) = f.body {
                        out.push(body);
                    }
                }
                Decl::Class(c) => out.extend_from_slice(&c.members),
                Decl::Interface(i) => out.extend_from_slice(&i.members),
            },
            NodeKind::Stmt(stmt) => match stmt {
                Stmt::Block(b) => {
                    out.extend_from_slice(&b.decls);
                    out.extend_from_slice(&b.stmts);
                }
                Stmt::If(s) => {
                    out.push(s.test);
                    out.push(s.then_body);
                    if let Some(e) = s.else_body {
                        out.push(e);
                    }
                }
                Stmt::While(s) => {
                    out.push(s.test);
                    out.push(s.body);
                }
                Stmt::For(s) => {
                    out.push(s.init);
                    out.push(s.test);
                    out.push(s.step);
                    out.push(s.body);
                }
                Stmt::Return(s) => out.push(s.expr),
                Stmt::Break => {}
                Stmt::Print(s) => out.extend_from_slice(&s.args),
                Stmt::Switch(s) => {
                    out.push(s.expr);
                    out.extend_from_slice(&s.cases);
                }
                Stmt::Case(s) => {
                    if let Some(v) = s.value {
                        out.push(v);
                    }
                    out.extend_from_slice(&s.stmts);
                }
            },
            NodeKind::Expr(expr) => match expr {
                Expr::IntConstant(_)
                | Expr::DoubleConstant(_)
                | Expr::BoolConstant(_)
                | Expr::StringConstant(_)
                | Expr::NullConstant
                | Expr::Empty
                | Expr::This
                | Expr::ReadInteger
                | Expr::ReadLine
                | Expr::New { .. } => {}
                Expr::Arithmetic { left, right, .. } | Expr::Logical { left, right, .. } => {
                    if let Some(l) = left {
                        out.push(*l);
                    }
                    out.push(*right);
                }
                Expr::Relational { left, right, .. }
                | Expr::Equality { left, right, .. }
                | Expr::Assign { left, right, .. } => {
                    out.push(*left);
                    out.push(*right);
                }
                Expr::ArrayAccess { base, subscript } => {
                    out.push(*base);
                    out.push(*subscript);
                }
                Expr::FieldAccess { base, .. } => {
                    if let Some(b) = base {
                        out.push(*b);
                    }
                }
                Expr::Call { base, actuals, .. } => {
                    if let Some(b) = base {
                        out.push(*b);
                    }
                    out.extend_from_slice(actuals);
                }
                Expr::NewArray { size, .. } => out.push(*size),
                Expr::Postfix { lvalue, .. } => out.push(*lvalue),
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and adopt its already-allocated children.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut children: SmallVec<[NodeId; 8]> = SmallVec::new();
        kind.collect_children(&mut children);
        self.nodes.push(Node {
            kind,
            span,
            parent: None,
        });
        for child in children {
            let slot = &mut self.nodes[child.index()].parent;
            debug_assert!(slot.is_none(), "node adopted twice");
            *slot = Some(id);
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn program(&self, id: NodeId) -> Option<&Program> {
        match self.kind(id) {
            NodeKind::Program(p) => Some(p),
            _ => None,
        }
    }

    pub fn decl(&self, id: NodeId) -> Option<&Decl> {
        match self.kind(id) {
            NodeKind::Decl(d) => Some(d),
            _ => None,
        }
    }

    pub fn stmt(&self, id: NodeId) -> Option<&Stmt> {
        match self.kind(id) {
            NodeKind::Stmt(s) => Some(s),
            _ => None,
        }
    }

    pub fn expr(&self, id: NodeId) -> Option<&Expr> {
        match self.kind(id) {
            NodeKind::Expr(e) => Some(e),
            _ => None,
        }
    }

    /// The declared name of a decl node
    pub fn decl_name(&self, id: NodeId) -> Option<Ident> {
        self.decl(id).map(|d| d.name())
    }

    /// True for statements a `break` may escape from
    pub fn is_breakable(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            NodeKind::Stmt(Stmt::While(_)) | NodeKind::Stmt(Stmt::For(_)) | NodeKind::Stmt(Stmt::Switch(_))
        )
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::default()
    }

    #[test]
    fn alloc_wires_parent_links() {
        let mut ast = Ast::new();
        let lit = ast.alloc(NodeKind::Expr(Expr::IntConstant(1)), span());
        let ret = ast.alloc(NodeKind::Stmt(Stmt::Return(ReturnStmt { expr: lit })), span());
        assert_eq!(ast.parent(lit), Some(ret));
        assert_eq!(ast.parent(ret), None);
    }

    #[test]
    fn every_non_root_node_has_one_parent() {
        let mut ast = Ast::new();
        let a = ast.alloc(NodeKind::Expr(Expr::IntConstant(1)), span());
        let b = ast.alloc(NodeKind::Expr(Expr::IntConstant(2)), span());
        let add = ast.alloc(
            NodeKind::Expr(Expr::Arithmetic {
                op: ArithOp::Add,
                op_span: span(),
                left: Some(a),
                right: b,
            }),
            span(),
        );
        let block = ast.alloc(
            NodeKind::Stmt(Stmt::Block(BlockStmt {
                decls: vec![],
                stmts: vec![add],
            })),
            span(),
        );
        let root = ast.alloc(NodeKind::Program(Program { decls: vec![] }), span());

        let orphans: Vec<_> = ast
            .node_ids()
            .filter(|&id| id != root && id != block && ast.parent(id).is_none())
            .collect();
        assert!(orphans.is_empty());
    }

    #[test]
    fn type_ref_base_unwraps_arrays() {
        let named = TypeRef {
            kind: TypeRefKind::Named(Symbol(0)),
            span: span(),
        };
        let arr = TypeRef {
            kind: TypeRefKind::Array(Box::new(TypeRef {
                kind: TypeRefKind::Array(Box::new(named.clone())),
                span: span(),
            })),
            span: span(),
        };
        assert_eq!(arr.base(), &named);
    }

    #[test]
    fn breakable_nodes() {
        let mut ast = Ast::new();
        let test = ast.alloc(NodeKind::Expr(Expr::BoolConstant(true)), span());
        let body = ast.alloc(
            NodeKind::Stmt(Stmt::Block(BlockStmt {
                decls: vec![],
                stmts: vec![],
            })),
            span(),
        );
        let while_stmt = ast.alloc(NodeKind::Stmt(Stmt::While(WhileStmt { test, body })), span());
        assert!(ast.is_breakable(while_stmt));
        assert!(!ast.is_breakable(body));
    }
}
