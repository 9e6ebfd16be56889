// src/frontend/parse_decl.rs
//
// Declaration parsing: variables, functions, classes, interfaces

use super::ast::*;
use super::parser::{ParseError, Parser};
use super::token::TokenType;
use crate::errors::ParserError;

impl<'src> Parser<'src> {
    pub(super) fn declaration(&mut self) -> Result<NodeId, ParseError> {
        match self.current.ty {
            TokenType::KwClass => self.class_decl(),
            TokenType::KwInterface => self.interface_decl(),
            TokenType::KwVoid
            | TokenType::KwInt
            | TokenType::KwDouble
            | TokenType::KwBool
            | TokenType::KwString
            | TokenType::Identifier => self.variable_or_function(),
            _ => Err(ParseError::new(
                ParserError::ExpectedDeclaration {
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            )),
        }
    }

    /// Parse `Type name;` or `Type name(formals) { ... }`. Shared by the top
    /// level and class bodies.
    fn variable_or_function(&mut self) -> Result<NodeId, ParseError> {
        let ty = self.parse_return_type()?;
        let name = self.identifier()?;

        if self.check(TokenType::LParen) {
            return self.function_decl(ty, name, true);
        }

        let semi = self.consume(TokenType::Semicolon)?;
        let span = ty.span.merge(semi.span);
        Ok(self.ast.alloc(
            NodeKind::Decl(Decl::Var(VarDecl {
                name,
                declared: ty,
            })),
            span,
        ))
    }

    /// Parse the rest of a function after `Type name`. With `with_body`
    /// false, expects a prototype terminated by ';' (interface members).
    fn function_decl(
        &mut self,
        return_type: TypeRef,
        name: Ident,
        with_body: bool,
    ) -> Result<NodeId, ParseError> {
        self.consume(TokenType::LParen)?;
        let formals = self.formals()?;
        self.consume(TokenType::RParen)?;

        let (body, end_span) = if with_body {
            let body = self.block()?;
            let end = self.ast.span(body);
            (Some(body), end)
        } else {
            let semi = self.consume(TokenType::Semicolon)?;
            (None, semi.span)
        };

        let span = return_type.span.merge(end_span);
        Ok(self.ast.alloc(
            NodeKind::Decl(Decl::Fn(FnDecl {
                name,
                return_type,
                formals,
                body,
            })),
            span,
        ))
    }

    fn formals(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut formals = Vec::new();
        if !self.check(TokenType::RParen) {
            loop {
                formals.push(self.variable()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }
        Ok(formals)
    }

    /// A bare `Type name` pair (formals), no trailing ';'
    fn variable(&mut self) -> Result<NodeId, ParseError> {
        let ty = self.parse_type()?;
        let name = self.identifier()?;
        let span = ty.span.merge(name.span);
        Ok(self.ast.alloc(
            NodeKind::Decl(Decl::Var(VarDecl {
                name,
                declared: ty,
            })),
            span,
        ))
    }

    /// A `Type name ;` declaration (block locals)
    pub(super) fn variable_decl(&mut self) -> Result<NodeId, ParseError> {
        let ty = self.parse_type()?;
        let name = self.identifier()?;
        let semi = self.consume(TokenType::Semicolon)?;
        let span = ty.span.merge(semi.span);
        Ok(self.ast.alloc(
            NodeKind::Decl(Decl::Var(VarDecl {
                name,
                declared: ty,
            })),
            span,
        ))
    }

    fn class_decl(&mut self) -> Result<NodeId, ParseError> {
        let start_span = self.current.span;
        self.advance(); // consume 'class'
        let name = self.identifier()?;

        let extends = if self.match_token(TokenType::KwExtends) {
            let parent = self.identifier()?;
            Some(TypeRef {
                kind: TypeRefKind::Named(parent.sym),
                span: parent.span,
            })
        } else {
            None
        };

        let mut implements = Vec::new();
        if self.match_token(TokenType::KwImplements) {
            loop {
                let interface = self.identifier()?;
                implements.push(TypeRef {
                    kind: TypeRefKind::Named(interface.sym),
                    span: interface.span,
                });
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenType::LBrace)?;
        let mut members = Vec::new();
        while !self.check(TokenType::RBrace) && !self.check(TokenType::Eof) {
            members.push(self.variable_or_function()?);
        }
        let close = self.consume(TokenType::RBrace)?;

        let span = start_span.merge(close.span);
        Ok(self.ast.alloc(
            NodeKind::Decl(Decl::Class(ClassDecl {
                name,
                extends,
                implements,
                members,
            })),
            span,
        ))
    }

    fn interface_decl(&mut self) -> Result<NodeId, ParseError> {
        let start_span = self.current.span;
        self.advance(); // consume 'interface'
        let name = self.identifier()?;

        self.consume(TokenType::LBrace)?;
        let mut members = Vec::new();
        while !self.check(TokenType::RBrace) && !self.check(TokenType::Eof) {
            let ty = self.parse_return_type()?;
            let method = self.identifier()?;
            members.push(self.function_decl(ty, method, false)?);
        }
        let close = self.consume(TokenType::RBrace)?;

        let span = start_span.merge(close.span);
        Ok(self.ast.alloc(
            NodeKind::Decl(Decl::Interface(InterfaceDecl { name, members })),
            span,
        ))
    }
}
