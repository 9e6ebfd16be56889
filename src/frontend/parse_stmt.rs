// src/frontend/parse_stmt.rs
//
// Statement parsing

use super::ast::*;
use super::parser::{ParseError, Parser, parse_int_lexeme};
use super::token::TokenType;
use crate::errors::ParserError;

impl<'src> Parser<'src> {
    /// Parse a block: `{ var-decls statements }`
    pub(super) fn block(&mut self) -> Result<NodeId, ParseError> {
        let start_span = self.current.span;
        self.consume(TokenType::LBrace)?;

        let mut decls = Vec::new();
        while self.at_variable_decl() {
            decls.push(self.variable_decl()?);
        }

        let mut stmts = Vec::new();
        while !self.check(TokenType::RBrace) && !self.check(TokenType::Eof) {
            stmts.push(self.statement()?);
        }

        let close = self.consume(TokenType::RBrace)?;
        let span = start_span.merge(close.span);
        Ok(self
            .ast
            .alloc(NodeKind::Stmt(Stmt::Block(BlockStmt { decls, stmts })), span))
    }

    /// Parse a statement; the returned node may be a bare expression.
    pub(super) fn statement(&mut self) -> Result<NodeId, ParseError> {
        match self.current.ty {
            TokenType::LBrace => self.block(),
            TokenType::KwIf => self.if_stmt(),
            TokenType::KwWhile => self.while_stmt(),
            TokenType::KwFor => self.for_stmt(),
            TokenType::KwBreak => self.break_stmt(),
            TokenType::KwReturn => self.return_stmt(),
            TokenType::KwPrint => self.print_stmt(),
            TokenType::KwSwitch => self.switch_stmt(),
            _ => self.expr_stmt(),
        }
    }

    fn if_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start_span = self.current.span;
        self.advance(); // consume 'if'
        self.consume(TokenType::LParen)?;
        let test = self.expression(0)?;
        self.consume(TokenType::RParen)?;
        let then_body = self.statement()?;

        let else_body = if self.match_token(TokenType::KwElse) {
            Some(self.statement()?)
        } else {
            None
        };

        let end = else_body.unwrap_or(then_body);
        let span = start_span.merge(self.ast.span(end));
        Ok(self.ast.alloc(
            NodeKind::Stmt(Stmt::If(IfStmt {
                test,
                then_body,
                else_body,
            })),
            span,
        ))
    }

    fn while_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start_span = self.current.span;
        self.advance(); // consume 'while'
        self.consume(TokenType::LParen)?;
        let test = self.expression(0)?;
        self.consume(TokenType::RParen)?;
        let body = self.statement()?;

        let span = start_span.merge(self.ast.span(body));
        Ok(self
            .ast
            .alloc(NodeKind::Stmt(Stmt::While(WhileStmt { test, body })), span))
    }

    fn for_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start_span = self.current.span;
        self.advance(); // consume 'for'
        self.consume(TokenType::LParen)?;

        let init = self.optional_expr(TokenType::Semicolon)?;
        self.consume(TokenType::Semicolon)?;
        let test = self.optional_expr(TokenType::Semicolon)?;
        self.consume(TokenType::Semicolon)?;
        let step = self.optional_expr(TokenType::RParen)?;
        self.consume(TokenType::RParen)?;

        let body = self.statement()?;
        let span = start_span.merge(self.ast.span(body));
        Ok(self.ast.alloc(
            NodeKind::Stmt(Stmt::For(ForStmt {
                init,
                test,
                step,
                body,
            })),
            span,
        ))
    }

    /// An expression, or an Empty placeholder when the clause is omitted
    fn optional_expr(&mut self, terminator: TokenType) -> Result<NodeId, ParseError> {
        if self.check(terminator) {
            let span = self.current.span;
            return Ok(self.ast.alloc(NodeKind::Expr(Expr::Empty), span));
        }
        self.expression(0)
    }

    fn break_stmt(&mut self) -> Result<NodeId, ParseError> {
        let span = self.current.span;
        self.advance(); // consume 'break'
        self.consume(TokenType::Semicolon)?;
        Ok(self.ast.alloc(NodeKind::Stmt(Stmt::Break), span))
    }

    fn return_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start_span = self.current.span;
        self.advance(); // consume 'return'

        let expr = self.optional_expr(TokenType::Semicolon)?;
        let semi = self.consume(TokenType::Semicolon)?;

        let span = start_span.merge(semi.span);
        Ok(self
            .ast
            .alloc(NodeKind::Stmt(Stmt::Return(ReturnStmt { expr })), span))
    }

    fn print_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start_span = self.current.span;
        self.advance(); // consume 'Print'
        self.consume(TokenType::LParen)?;

        let mut args = Vec::new();
        loop {
            args.push(self.expression(0)?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }

        self.consume(TokenType::RParen)?;
        let semi = self.consume(TokenType::Semicolon)?;

        let span = start_span.merge(semi.span);
        Ok(self
            .ast
            .alloc(NodeKind::Stmt(Stmt::Print(PrintStmt { args })), span))
    }

    fn switch_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start_span = self.current.span;
        self.advance(); // consume 'switch'
        self.consume(TokenType::LParen)?;
        let expr = self.expression(0)?;
        self.consume(TokenType::RParen)?;
        self.consume(TokenType::LBrace)?;

        let mut cases = Vec::new();
        let mut saw_default = false;
        while !self.check(TokenType::RBrace) && !self.check(TokenType::Eof) {
            match self.current.ty {
                TokenType::KwCase => {
                    if saw_default {
                        return Err(ParseError::new(
                            ParserError::UnexpectedToken {
                                token: "case".to_string(),
                                span: self.current.span.into(),
                            },
                            self.current.span,
                        ));
                    }
                    cases.push(self.case(false)?);
                }
                TokenType::KwDefault => {
                    saw_default = true;
                    cases.push(self.case(true)?);
                }
                _ => {
                    return Err(ParseError::new(
                        ParserError::ExpectedToken {
                            expected: "case".to_string(),
                            found: self.current.ty.as_str().to_string(),
                            span: self.current.span.into(),
                        },
                        self.current.span,
                    ));
                }
            }
        }
        let close = self.consume(TokenType::RBrace)?;

        let span = start_span.merge(close.span);
        Ok(self
            .ast
            .alloc(NodeKind::Stmt(Stmt::Switch(SwitchStmt { expr, cases })), span))
    }

    fn case(&mut self, is_default: bool) -> Result<NodeId, ParseError> {
        let start_span = self.current.span;
        self.advance(); // consume 'case' or 'default'

        let value = if is_default {
            None
        } else {
            let token = self.consume(TokenType::IntLiteral)?;
            let value = parse_int_lexeme(&token.lexeme);
            Some(
                self.ast
                    .alloc(NodeKind::Expr(Expr::IntConstant(value)), token.span),
            )
        };
        self.consume(TokenType::Colon)?;

        let mut stmts = Vec::new();
        while !matches!(
            self.current.ty,
            TokenType::KwCase | TokenType::KwDefault | TokenType::RBrace | TokenType::Eof
        ) {
            stmts.push(self.statement()?);
        }

        let span = start_span.merge(self.previous.span);
        Ok(self
            .ast
            .alloc(NodeKind::Stmt(Stmt::Case(CaseStmt { value, stmts })), span))
    }

    fn expr_stmt(&mut self) -> Result<NodeId, ParseError> {
        if self.check(TokenType::Semicolon) {
            let span = self.current.span;
            self.advance();
            return Ok(self.ast.alloc(NodeKind::Expr(Expr::Empty), span));
        }
        let expr = self.expression(0)?;
        self.consume(TokenType::Semicolon)?;
        Ok(expr)
    }
}
