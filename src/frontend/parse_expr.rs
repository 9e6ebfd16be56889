// src/frontend/parse_expr.rs
//
// Expression parsing with Pratt-style binary precedence. Unary and postfix
// forms are handled below the precedence climb; primaries at the bottom.

use super::ast::*;
use super::parser::{ParseError, Parser, parse_int_lexeme};
use super::token::TokenType;
use crate::errors::ParserError;

impl<'src> Parser<'src> {
    /// Parse an expression with Pratt parsing
    pub(super) fn expression(&mut self, min_prec: u8) -> Result<NodeId, ParseError> {
        let mut left = self.unary()?;

        while self.current.ty.precedence() > min_prec {
            let op_token = self.current.clone();
            let prec = op_token.ty.precedence();
            self.advance();

            if op_token.ty == TokenType::Eq {
                // Assignment is right-associative; reparse from the bottom
                self.assign_target(left)?;
                let right = self.expression(0)?;
                let span = self.ast.span(left).merge(self.ast.span(right));
                left = self.ast.alloc(
                    NodeKind::Expr(Expr::Assign {
                        op_span: op_token.span,
                        left,
                        right,
                    }),
                    span,
                );
                continue;
            }

            let right = self.expression(prec)?;
            let span = self.ast.span(left).merge(self.ast.span(right));
            let kind = match op_token.ty {
                TokenType::Plus => Expr::Arithmetic {
                    op: ArithOp::Add,
                    op_span: op_token.span,
                    left: Some(left),
                    right,
                },
                TokenType::Minus => Expr::Arithmetic {
                    op: ArithOp::Sub,
                    op_span: op_token.span,
                    left: Some(left),
                    right,
                },
                TokenType::Star => Expr::Arithmetic {
                    op: ArithOp::Mul,
                    op_span: op_token.span,
                    left: Some(left),
                    right,
                },
                TokenType::Slash => Expr::Arithmetic {
                    op: ArithOp::Div,
                    op_span: op_token.span,
                    left: Some(left),
                    right,
                },
                TokenType::Percent => Expr::Arithmetic {
                    op: ArithOp::Mod,
                    op_span: op_token.span,
                    left: Some(left),
                    right,
                },
                TokenType::Lt => Expr::Relational {
                    op: RelOp::Lt,
                    op_span: op_token.span,
                    left,
                    right,
                },
                TokenType::LtEq => Expr::Relational {
                    op: RelOp::Le,
                    op_span: op_token.span,
                    left,
                    right,
                },
                TokenType::Gt => Expr::Relational {
                    op: RelOp::Gt,
                    op_span: op_token.span,
                    left,
                    right,
                },
                TokenType::GtEq => Expr::Relational {
                    op: RelOp::Ge,
                    op_span: op_token.span,
                    left,
                    right,
                },
                TokenType::EqEq => Expr::Equality {
                    op: EqOp::Eq,
                    op_span: op_token.span,
                    left,
                    right,
                },
                TokenType::BangEq => Expr::Equality {
                    op: EqOp::Ne,
                    op_span: op_token.span,
                    left,
                    right,
                },
                TokenType::AmpAmp => Expr::Logical {
                    op: LogicOp::And,
                    op_span: op_token.span,
                    left: Some(left),
                    right,
                },
                TokenType::PipePipe => Expr::Logical {
                    op: LogicOp::Or,
                    op_span: op_token.span,
                    left: Some(left),
                    right,
                },
                _ => unreachable!("token with precedence is a binary operator"),
            };
            left = self.ast.alloc(NodeKind::Expr(kind), span);
        }

        Ok(left)
    }

    /// Assignment targets must be lvalues
    fn assign_target(&self, left: NodeId) -> Result<(), ParseError> {
        match self.ast.expr(left) {
            Some(Expr::FieldAccess { .. }) | Some(Expr::ArrayAccess { .. }) => Ok(()),
            _ => {
                let span = self.ast.span(left);
                Err(ParseError::new(
                    ParserError::UnexpectedToken {
                        token: "invalid assignment target".to_string(),
                        span: span.into(),
                    },
                    span,
                ))
            }
        }
    }

    fn unary(&mut self) -> Result<NodeId, ParseError> {
        match self.current.ty {
            TokenType::Minus => {
                let op_span = self.current.span;
                self.advance();
                let right = self.unary()?;
                let span = op_span.merge(self.ast.span(right));
                Ok(self.ast.alloc(
                    NodeKind::Expr(Expr::Arithmetic {
                        op: ArithOp::Sub,
                        op_span,
                        left: None,
                        right,
                    }),
                    span,
                ))
            }
            TokenType::Bang => {
                let op_span = self.current.span;
                self.advance();
                let right = self.unary()?;
                let span = op_span.merge(self.ast.span(right));
                Ok(self.ast.alloc(
                    NodeKind::Expr(Expr::Logical {
                        op: LogicOp::Not,
                        op_span,
                        left: None,
                        right,
                    }),
                    span,
                ))
            }
            _ => self.postfix(),
        }
    }

    /// Postfix chain: field access, method call, array subscript, `++`/`--`
    fn postfix(&mut self) -> Result<NodeId, ParseError> {
        let mut expr = self.primary()?;

        loop {
            match self.current.ty {
                TokenType::Dot => {
                    self.advance();
                    let field = self.identifier()?;
                    if self.check(TokenType::LParen) {
                        let actuals = self.actuals()?;
                        let span = self.ast.span(expr).merge(self.previous.span);
                        expr = self.ast.alloc(
                            NodeKind::Expr(Expr::Call {
                                base: Some(expr),
                                field,
                                actuals,
                            }),
                            span,
                        );
                    } else {
                        let span = self.ast.span(expr).merge(field.span);
                        expr = self.ast.alloc(
                            NodeKind::Expr(Expr::FieldAccess {
                                base: Some(expr),
                                field,
                            }),
                            span,
                        );
                    }
                }
                TokenType::LBracket => {
                    self.advance();
                    let subscript = self.expression(0)?;
                    let close = self.consume(TokenType::RBracket)?;
                    let span = self.ast.span(expr).merge(close.span);
                    expr = self.ast.alloc(
                        NodeKind::Expr(Expr::ArrayAccess {
                            base: expr,
                            subscript,
                        }),
                        span,
                    );
                }
                TokenType::PlusPlus | TokenType::MinusMinus => {
                    let op = if self.current.ty == TokenType::PlusPlus {
                        PostfixOp::Inc
                    } else {
                        PostfixOp::Dec
                    };
                    let op_span = self.current.span;
                    self.advance();
                    let span = self.ast.span(expr).merge(op_span);
                    expr = self.ast.alloc(
                        NodeKind::Expr(Expr::Postfix {
                            op,
                            op_span,
                            lvalue: expr,
                        }),
                        span,
                    );
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn primary(&mut self) -> Result<NodeId, ParseError> {
        let token = self.current.clone();
        match token.ty {
            TokenType::IntLiteral => {
                self.advance();
                let value = parse_int_lexeme(&token.lexeme);
                Ok(self
                    .ast
                    .alloc(NodeKind::Expr(Expr::IntConstant(value)), token.span))
            }
            TokenType::DoubleLiteral => {
                self.advance();
                let value = token.lexeme.parse::<f64>().unwrap_or(0.0);
                Ok(self
                    .ast
                    .alloc(NodeKind::Expr(Expr::DoubleConstant(value)), token.span))
            }
            TokenType::StringLiteral => {
                self.advance();
                let value = token.lexeme.trim_matches('"').to_string();
                Ok(self
                    .ast
                    .alloc(NodeKind::Expr(Expr::StringConstant(value)), token.span))
            }
            TokenType::KwTrue | TokenType::KwFalse => {
                self.advance();
                let value = token.ty == TokenType::KwTrue;
                Ok(self
                    .ast
                    .alloc(NodeKind::Expr(Expr::BoolConstant(value)), token.span))
            }
            TokenType::KwNull => {
                self.advance();
                Ok(self
                    .ast
                    .alloc(NodeKind::Expr(Expr::NullConstant), token.span))
            }
            TokenType::KwThis => {
                self.advance();
                Ok(self.ast.alloc(NodeKind::Expr(Expr::This), token.span))
            }
            TokenType::KwReadInteger => {
                self.advance();
                self.consume(TokenType::LParen)?;
                let close = self.consume(TokenType::RParen)?;
                let span = token.span.merge(close.span);
                Ok(self.ast.alloc(NodeKind::Expr(Expr::ReadInteger), span))
            }
            TokenType::KwReadLine => {
                self.advance();
                self.consume(TokenType::LParen)?;
                let close = self.consume(TokenType::RParen)?;
                let span = token.span.merge(close.span);
                Ok(self.ast.alloc(NodeKind::Expr(Expr::ReadLine), span))
            }
            TokenType::KwNew => {
                self.advance();
                let class = self.identifier()?;
                let span = token.span.merge(class.span);
                Ok(self.ast.alloc(
                    NodeKind::Expr(Expr::New {
                        class: TypeRef {
                            kind: TypeRefKind::Named(class.sym),
                            span: class.span,
                        },
                    }),
                    span,
                ))
            }
            TokenType::KwNewArray => {
                self.advance();
                self.consume(TokenType::LParen)?;
                let size = self.expression(0)?;
                self.consume(TokenType::Comma)?;
                let elem = self.parse_type()?;
                let close = self.consume(TokenType::RParen)?;
                let span = token.span.merge(close.span);
                Ok(self
                    .ast
                    .alloc(NodeKind::Expr(Expr::NewArray { size, elem }), span))
            }
            TokenType::Identifier => {
                let field = self.identifier()?;
                if self.check(TokenType::LParen) {
                    let actuals = self.actuals()?;
                    let span = field.span.merge(self.previous.span);
                    Ok(self.ast.alloc(
                        NodeKind::Expr(Expr::Call {
                            base: None,
                            field,
                            actuals,
                        }),
                        span,
                    ))
                } else {
                    Ok(self.ast.alloc(
                        NodeKind::Expr(Expr::FieldAccess { base: None, field }),
                        field.span,
                    ))
                }
            }
            TokenType::LParen => {
                self.advance();
                let inner = self.expression(0)?;
                self.consume(TokenType::RParen)?;
                Ok(inner)
            }
            _ => Err(ParseError::new(
                ParserError::ExpectedExpression {
                    found: token.ty.as_str().to_string(),
                    span: token.span.into(),
                },
                token.span,
            )),
        }
    }

    fn actuals(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.consume(TokenType::LParen)?;
        let mut actuals = Vec::new();
        if !self.check(TokenType::RParen) {
            loop {
                actuals.push(self.expression(0)?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RParen)?;
        Ok(actuals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{Ast, Interner};

    fn parse_expr(source: &str) -> (Ast, Interner, NodeId) {
        let wrapped = format!("void f() {{ t = {}; }}", source);
        let mut parser = Parser::new(&wrapped);
        let root = parser.parse_program().expect("parse failed");
        let (ast, interner) = parser.into_parts();
        // dig out the assignment's right-hand side
        let program = ast.program(root).unwrap();
        let Some(Decl::Fn(f)) = ast.decl(program.decls[0]) else {
            panic!("expected fn");
        };
        let Some(Stmt::Block(block)) = ast.stmt(f.body.unwrap()) else {
            panic!("expected block");
        };
        let Some(Expr::Assign { right, .. }) = ast.expr(block.stmts[0]) else {
            panic!("expected assignment");
        };
        let right = *right;
        (ast, interner, right)
    }

    #[test]
    fn precedence_mul_binds_tighter_than_add() {
        let (ast, _, expr) = parse_expr("1 + 2 * 3");
        let Some(Expr::Arithmetic {
            op: ArithOp::Add,
            right,
            ..
        }) = ast.expr(expr)
        else {
            panic!("expected addition at top");
        };
        assert!(matches!(
            ast.expr(*right),
            Some(Expr::Arithmetic {
                op: ArithOp::Mul,
                ..
            })
        ));
    }

    #[test]
    fn subtraction_is_left_associative() {
        let (ast, _, expr) = parse_expr("10 - 4 - 3");
        let Some(Expr::Arithmetic {
            op: ArithOp::Sub,
            left: Some(left),
            ..
        }) = ast.expr(expr)
        else {
            panic!("expected subtraction at top");
        };
        assert!(matches!(
            ast.expr(*left),
            Some(Expr::Arithmetic {
                op: ArithOp::Sub,
                ..
            })
        ));
    }

    #[test]
    fn unary_minus_has_no_left_operand() {
        let (ast, _, expr) = parse_expr("-x");
        assert!(matches!(
            ast.expr(expr),
            Some(Expr::Arithmetic {
                op: ArithOp::Sub,
                left: None,
                ..
            })
        ));
    }

    #[test]
    fn postfix_chain_parses_method_call() {
        let (ast, interner, expr) = parse_expr("shape.area()");
        let Some(Expr::Call {
            base: Some(_),
            field,
            actuals,
        }) = ast.expr(expr)
        else {
            panic!("expected method call");
        };
        assert_eq!(interner.resolve(field.sym), "area");
        assert!(actuals.is_empty());
    }

    #[test]
    fn array_subscript_of_field() {
        let (ast, _, expr) = parse_expr("m.rows[i]");
        let Some(Expr::ArrayAccess { base, .. }) = ast.expr(expr) else {
            panic!("expected array access");
        };
        assert!(matches!(
            ast.expr(*base),
            Some(Expr::FieldAccess { base: Some(_), .. })
        ));
    }

    #[test]
    fn new_array_with_type_argument() {
        let (ast, _, expr) = parse_expr("NewArray(10, int)");
        let Some(Expr::NewArray { elem, .. }) = ast.expr(expr) else {
            panic!("expected NewArray");
        };
        assert_eq!(elem.kind, TypeRefKind::Int);
    }

    #[test]
    fn logical_or_binds_looser_than_and() {
        let (ast, _, expr) = parse_expr("a && b || c");
        assert!(matches!(
            ast.expr(expr),
            Some(Expr::Logical {
                op: LogicOp::Or,
                ..
            })
        ));
    }

    #[test]
    fn chained_assignment_is_right_associative() {
        let wrapped = "void f() { a = b = 1; }";
        let mut parser = Parser::new(wrapped);
        let root = parser.parse_program().expect("parse failed");
        let (ast, _) = parser.into_parts();
        let program = ast.program(root).unwrap();
        let Some(Decl::Fn(f)) = ast.decl(program.decls[0]) else {
            panic!("expected fn");
        };
        let Some(Stmt::Block(block)) = ast.stmt(f.body.unwrap()) else {
            panic!("expected block");
        };
        let Some(Expr::Assign { right, .. }) = ast.expr(block.stmts[0]) else {
            panic!("expected assignment");
        };
        assert!(matches!(ast.expr(*right), Some(Expr::Assign { .. })));
    }

    #[test]
    fn constant_in_parens_is_not_an_lvalue() {
        let mut parser = Parser::new("void f() { 3 = 4; }");
        assert!(parser.parse_program().is_err());
    }
}
