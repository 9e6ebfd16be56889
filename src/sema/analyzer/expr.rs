// src/sema/analyzer/expr.rs
//
// Expression type inference. Every expression gets a type exactly once; an
// operand of type Error makes the whole expression Error with no diagnostic
// of its own, so one mistake does not cascade.

use super::*;
use crate::frontend::ast::{ArithOp, Expr, Ident, LogicOp};
use crate::sema::scope::{enclosing_class, lookup_name};

impl Analyzer<'_> {
    pub(crate) fn check_expr(&mut self, id: NodeId) -> Type {
        let Some(expr) = self.ast.expr(id) else {
            debug_assert!(false, "check_expr on a non-expression node");
            return Type::Error;
        };

        let ty = match expr {
            Expr::IntConstant(_) => Type::Int,
            Expr::DoubleConstant(_) => Type::Double,
            Expr::BoolConstant(_) => Type::Bool,
            Expr::StringConstant(_) => Type::String,
            Expr::NullConstant => Type::Null,
            // Stands in for an omitted expression; callers treat it as absent
            Expr::Empty => Type::Null,
            Expr::ReadInteger => Type::Int,
            Expr::ReadLine => Type::String,
            Expr::This => self.check_this(id),
            Expr::Arithmetic {
                op,
                op_span,
                left,
                right,
            } => match left {
                Some(left) => self.check_arithmetic(*op, *op_span, *left, *right),
                None => self.check_unary_minus(*right),
            },
            Expr::Relational {
                op,
                op_span,
                left,
                right,
            } => {
                let op = op.as_str();
                self.check_numeric_comparison(op, *op_span, *left, *right)
            }
            Expr::Equality {
                op,
                op_span,
                left,
                right,
            } => self.check_equality(op.as_str(), *op_span, *left, *right),
            Expr::Logical {
                op,
                op_span,
                left,
                right,
            } => match left {
                Some(left) => self.check_logical(op.as_str(), *op_span, *left, *right),
                None => self.check_not(*op_span, *right),
            },
            Expr::Assign {
                op_span,
                left,
                right,
            } => self.check_assign(*op_span, *left, *right),
            Expr::ArrayAccess { base, subscript } => self.check_array_access(id, *base, *subscript),
            Expr::FieldAccess { base, field } => self.check_field_access(id, *base, *field),
            Expr::Call {
                base,
                field,
                actuals,
            } => self.check_call(id, *base, *field, actuals),
            Expr::New { class } => self.check_new(id, class),
            Expr::NewArray { size, elem } => self.check_new_array(id, *size, elem),
            Expr::Postfix {
                op,
                op_span,
                lvalue,
            } => self.check_postfix(op.as_str(), *op_span, *lvalue),
        };

        self.record_type(id, ty.clone());
        ty
    }

    fn check_this(&mut self, id: NodeId) -> Type {
        match enclosing_class(self.ast, id) {
            Some(class) => self.decl_type(class),
            None => {
                let span = self.ast.span(id);
                self.add_error(SemanticError::ThisOutsideClass { span: span.into() }, span);
                Type::Error
            }
        }
    }

    fn check_arithmetic(&mut self, op: ArithOp, op_span: Span, left: NodeId, right: NodeId) -> Type {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        if lt.is_error() || rt.is_error() {
            return Type::Error;
        }
        if lt == rt && lt.is_numeric() {
            return lt;
        }
        self.add_error(
            SemanticError::IncompatibleOperands {
                left: self.display(&lt),
                op: op.as_str().to_string(),
                right: self.display(&rt),
                span: op_span.into(),
            },
            op_span,
        );
        Type::Error
    }

    fn check_unary_minus(&mut self, right: NodeId) -> Type {
        let rt = self.check_expr(right);
        if rt.is_error() {
            return Type::Error;
        }
        if rt.is_numeric() {
            return rt;
        }
        let span = self.ast.span(right);
        self.add_error(
            SemanticError::NumericOperandExpected {
                found: self.display(&rt),
                span: span.into(),
            },
            span,
        );
        Type::Error
    }

    fn check_numeric_comparison(
        &mut self,
        op: &str,
        op_span: Span,
        left: NodeId,
        right: NodeId,
    ) -> Type {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        if lt.is_error() || rt.is_error() {
            return Type::Error;
        }
        if lt == rt && lt.is_numeric() {
            return Type::Bool;
        }
        self.add_error(
            SemanticError::IncompatibleOperands {
                left: self.display(&lt),
                op: op.to_string(),
                right: self.display(&rt),
                span: op_span.into(),
            },
            op_span,
        );
        Type::Error
    }

    /// `==`/`!=` accept same-type operands, or `null` against any reference
    fn check_equality(&mut self, op: &str, op_span: Span, left: NodeId, right: NodeId) -> Type {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        if lt.is_error() || rt.is_error() {
            return Type::Error;
        }
        let null_vs_reference = (lt.is_reference() && rt == Type::Null)
            || (rt.is_reference() && lt == Type::Null);
        if lt == rt || null_vs_reference {
            return Type::Bool;
        }
        self.add_error(
            SemanticError::IncompatibleOperands {
                left: self.display(&lt),
                op: op.to_string(),
                right: self.display(&rt),
                span: op_span.into(),
            },
            op_span,
        );
        Type::Error
    }

    fn check_logical(&mut self, op: &str, op_span: Span, left: NodeId, right: NodeId) -> Type {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        if lt.is_error() || rt.is_error() {
            return Type::Error;
        }
        if lt == Type::Bool && rt == Type::Bool {
            return Type::Bool;
        }
        self.add_error(
            SemanticError::IncompatibleOperands {
                left: self.display(&lt),
                op: op.to_string(),
                right: self.display(&rt),
                span: op_span.into(),
            },
            op_span,
        );
        Type::Error
    }

    fn check_not(&mut self, op_span: Span, right: NodeId) -> Type {
        let rt = self.check_expr(right);
        if rt.is_error() {
            return Type::Error;
        }
        if rt == Type::Bool {
            return Type::Bool;
        }
        self.add_error(
            SemanticError::IncompatibleOperand {
                op: LogicOp::Not.as_str().to_string(),
                right: self.display(&rt),
                span: op_span.into(),
            },
            op_span,
        );
        Type::Error
    }

    fn check_assign(&mut self, op_span: Span, left: NodeId, right: NodeId) -> Type {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        if lt.is_error() || rt.is_error() {
            return Type::Error;
        }
        if self.assignable(left, &rt, &lt) {
            return lt;
        }
        self.add_error(
            SemanticError::IncompatibleOperands {
                left: self.display(&lt),
                op: "=".to_string(),
                right: self.display(&rt),
                span: op_span.into(),
            },
            op_span,
        );
        Type::Error
    }

    fn check_array_access(&mut self, id: NodeId, base: NodeId, subscript: NodeId) -> Type {
        let bt = self.check_expr(base);
        let st = self.check_expr(subscript);

        let elem = match bt {
            Type::Array(elem) => Some(*elem),
            Type::Error => None,
            _ => {
                let span = self.ast.span(id);
                self.add_error(
                    SemanticError::SubscriptOnNonArray { span: span.into() },
                    span,
                );
                None
            }
        };

        let mut ok = elem.is_some();
        if st != Type::Int && !st.is_error() {
            let span = self.ast.span(subscript);
            self.add_error(
                SemanticError::SubscriptNotInteger { span: span.into() },
                span,
            );
            ok = false;
        }

        match elem {
            Some(elem) if ok => elem,
            _ => Type::Error,
        }
    }

    fn check_field_access(&mut self, id: NodeId, base: Option<NodeId>, field: Ident) -> Type {
        let Some(base) = base else {
            // bare name: resolve through the enclosing scope
            return match lookup_name(self.ast, id, field.sym) {
                Some(decl) => self.decl_type(decl),
                None => {
                    self.add_error(
                        SemanticError::UndeclaredVariable {
                            name: self.name(field.sym),
                            span: field.span.into(),
                        },
                        field.span,
                    );
                    Type::Error
                }
            };
        };

        let bt = self.check_expr(base);
        if bt.is_error() {
            return Type::Error;
        }

        let Type::Named(class_sym) = &bt else {
            self.no_such_field(&bt, field);
            return Type::Error;
        };
        let Some(holder) = lookup_name(self.ast, id, *class_sym) else {
            // the base's declared type was already reported as undeclared
            return Type::Error;
        };
        if self.class_decl(holder).is_none() {
            // interfaces declare no fields
            self.no_such_field(&bt, field);
            return Type::Error;
        }

        let Some(member) = self.find_field(holder, field.sym) else {
            self.no_such_field(&bt, field);
            return Type::Error;
        };

        // fields are only accessible from inside the class or a subclass
        let accessible = enclosing_class(self.ast, id)
            .is_some_and(|current| {
                let current_ty = self.decl_type(current);
                self.assignable(id, &current_ty, &bt)
            });
        if !accessible {
            self.add_error(
                SemanticError::FieldNotAccessible {
                    class: self.display(&bt),
                    field: self.name(field.sym),
                    span: field.span.into(),
                },
                field.span,
            );
            return Type::Error;
        }

        self.decl_type(member)
    }

    fn no_such_field(&mut self, base_ty: &Type, field: Ident) {
        self.add_error(
            SemanticError::NoSuchField {
                ty: self.display(base_ty),
                field: self.name(field.sym),
                span: field.span.into(),
            },
            field.span,
        );
    }

    fn check_call(
        &mut self,
        id: NodeId,
        base: Option<NodeId>,
        field: Ident,
        actuals: &[NodeId],
    ) -> Type {
        let actual_types: Vec<Type> = actuals.iter().map(|&a| self.check_expr(a)).collect();

        let Some(base) = base else {
            // plain function call
            let target = lookup_name(self.ast, id, field.sym);
            let Some(function) = target.filter(|&t| self.fn_decl(t).is_some()) else {
                self.add_error(
                    SemanticError::UndeclaredFunction {
                        name: self.name(field.sym),
                        span: field.span.into(),
                    },
                    field.span,
                );
                return Type::Error;
            };
            self.check_call_args(function, field, actuals, &actual_types);
            return self.decl_type(function);
        };

        let bt = self.check_expr(base);
        if bt.is_error() {
            return Type::Error;
        }

        // every array type carries a pseudo-method length() returning int
        if let Type::Array(_) = bt {
            if self.name(field.sym) == "length" {
                if !actuals.is_empty() {
                    self.add_error(
                        SemanticError::WrongArgumentCount {
                            function: self.name(field.sym),
                            expected: 0,
                            given: actuals.len(),
                            span: field.span.into(),
                        },
                        field.span,
                    );
                }
                return Type::Int;
            }
            self.no_such_field(&bt, field);
            return Type::Error;
        }

        let Type::Named(holder_sym) = &bt else {
            self.no_such_field(&bt, field);
            return Type::Error;
        };
        let Some(holder) = lookup_name(self.ast, id, *holder_sym) else {
            // unresolved base type was diagnosed where it was declared
            return Type::Error;
        };
        let Some(method) = self.find_method(holder, field.sym) else {
            self.no_such_field(&bt, field);
            return Type::Error;
        };

        self.check_call_args(method, field, actuals, &actual_types);
        self.decl_type(method)
    }

    fn check_call_args(
        &mut self,
        function: NodeId,
        field: Ident,
        actuals: &[NodeId],
        actual_types: &[Type],
    ) {
        let Some(f) = self.fn_decl(function) else {
            return;
        };
        let formals = &f.formals;
        if formals.len() != actuals.len() {
            self.add_error(
                SemanticError::WrongArgumentCount {
                    function: self.name(field.sym),
                    expected: formals.len(),
                    given: actuals.len(),
                    span: field.span.into(),
                },
                field.span,
            );
            return;
        }

        for (i, (&formal, actual_ty)) in formals.iter().zip(actual_types).enumerate() {
            if actual_ty.is_error() {
                continue;
            }
            let formal_ty = self.decl_type(formal);
            if self.assignable(function, actual_ty, &formal_ty) {
                continue;
            }
            let span = self.ast.span(actuals[i]);
            self.add_error(
                SemanticError::IncompatibleArgument {
                    index: i + 1,
                    given: self.display(actual_ty),
                    expected: self.display(&formal_ty),
                    span: span.into(),
                },
                span,
            );
        }
    }

    fn check_new(&mut self, id: NodeId, class: &crate::frontend::ast::TypeRef) -> Type {
        let resolved = self.resolve_named(id, class);
        if let Some(target) = resolved {
            if self.class_decl(target).is_some() {
                return Type::from_type_ref(class);
            }
        }
        let name = match &class.base().kind {
            crate::frontend::ast::TypeRefKind::Named(sym) => self.name(*sym),
            _ => self.display(&Type::from_type_ref(class)),
        };
        self.add_error(
            SemanticError::UndeclaredClass {
                name,
                span: class.span.into(),
            },
            class.span,
        );
        Type::Error
    }

    fn check_new_array(
        &mut self,
        id: NodeId,
        size: NodeId,
        elem: &crate::frontend::ast::TypeRef,
    ) -> Type {
        let st = self.check_expr(size);
        let mut ok = true;
        if st != Type::Int && !st.is_error() {
            let span = self.ast.span(size);
            self.add_error(
                SemanticError::NewArraySizeNotInteger { span: span.into() },
                span,
            );
            ok = false;
        }
        if st.is_error() {
            ok = false;
        }
        if !self.check_type_ref(id, elem) {
            ok = false;
        }
        if ok {
            Type::Array(Box::new(Type::from_type_ref(elem)))
        } else {
            Type::Error
        }
    }

    fn check_postfix(&mut self, op: &str, op_span: Span, lvalue: NodeId) -> Type {
        let lt = self.check_expr(lvalue);
        if lt.is_error() {
            return Type::Error;
        }
        if lt == Type::Int {
            return Type::Int;
        }
        self.add_error(
            SemanticError::IncompatibleOperand {
                op: op.to_string(),
                right: self.display(&lt),
                span: op_span.into(),
            },
            op_span,
        );
        Type::Error
    }
}
