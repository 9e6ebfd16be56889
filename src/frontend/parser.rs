// src/frontend/parser.rs

use crate::errors::{LexerError, ParserError};
use crate::frontend::ast::*;
use crate::frontend::{Interner, Lexer, Span, Token, TokenType};

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    pub(super) current: Token,
    pub(super) peek: Token,
    pub(super) peek2: Token,
    pub(super) previous: Token,
    pub(super) interner: Interner,
    pub(super) ast: Ast,
}

/// A parse error wrapping a miette-enabled ParserError
#[derive(Debug)]
pub struct ParseError {
    pub error: ParserError,
    pub span: Span,
}

impl ParseError {
    pub fn new(error: ParserError, span: Span) -> Self {
        Self { error, span }
    }
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        let peek = lexer.next_token();
        let peek2 = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            peek2,
            previous: Token::new(TokenType::Eof, "", Span::default()),
            interner: Interner::new(),
            ast: Ast::new(),
        }
    }

    /// Parse a whole program and return the root node id.
    pub fn parse_program(&mut self) -> Result<NodeId, ParseError> {
        let start_span = self.current.span;
        let mut decls = Vec::new();

        while !self.check(TokenType::Eof) {
            decls.push(self.declaration()?);
        }

        let span = if decls.is_empty() {
            start_span
        } else {
            start_span.merge(self.previous.span)
        };
        Ok(self.ast.alloc(NodeKind::Program(Program { decls }), span))
    }

    /// Take all lexer errors collected so far.
    pub fn take_lexer_errors(&mut self) -> Vec<LexerError> {
        self.lexer.take_errors()
    }

    /// Consume the parser, yielding the arena and interner.
    pub fn into_parts(self) -> (Ast, Interner) {
        (self.ast, self.interner)
    }

    pub(super) fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.peek.clone());
        self.peek = std::mem::replace(&mut self.peek2, self.lexer.next_token());
    }

    pub(super) fn check(&self, ty: TokenType) -> bool {
        self.current.ty == ty
    }

    pub(super) fn match_token(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            return true;
        }
        false
    }

    pub(super) fn consume(&mut self, ty: TokenType) -> Result<Token, ParseError> {
        if self.check(ty) {
            let token = self.current.clone();
            self.advance();
            return Ok(token);
        }
        Err(ParseError::new(
            ParserError::ExpectedToken {
                expected: ty.as_str().to_string(),
                found: self.current.ty.as_str().to_string(),
                span: self.current.span.into(),
            },
            self.current.span,
        ))
    }

    /// Consume an identifier token and intern it.
    pub(super) fn identifier(&mut self) -> Result<Ident, ParseError> {
        if self.current.ty != TokenType::Identifier {
            return Err(ParseError::new(
                ParserError::ExpectedIdentifier {
                    found: self.current.ty.as_str().to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            ));
        }
        let sym = self.interner.intern(&self.current.lexeme);
        let span = self.current.span;
        self.advance();
        Ok(Ident { sym, span })
    }

    /// Parse a type annotation: a primitive or named base, then `[]` suffixes.
    pub(super) fn parse_type(&mut self) -> Result<TypeRef, ParseError> {
        let kind = match self.current.ty {
            TokenType::KwInt => TypeRefKind::Int,
            TokenType::KwDouble => TypeRefKind::Double,
            TokenType::KwBool => TypeRefKind::Bool,
            TokenType::KwString => TypeRefKind::String,
            TokenType::Identifier => TypeRefKind::Named(self.interner.intern(&self.current.lexeme)),
            _ => {
                return Err(ParseError::new(
                    ParserError::ExpectedType {
                        found: self.current.ty.as_str().to_string(),
                        span: self.current.span.into(),
                    },
                    self.current.span,
                ));
            }
        };
        let mut ty = TypeRef {
            kind,
            span: self.current.span,
        };
        self.advance();

        while self.check(TokenType::LBracket) && self.peek.ty == TokenType::RBracket {
            self.advance();
            let close = self.current.span;
            self.advance();
            let span = ty.span.merge(close);
            ty = TypeRef {
                kind: TypeRefKind::Array(Box::new(ty)),
                span,
            };
        }
        Ok(ty)
    }

    /// Parse a return type: `void` or an ordinary type.
    pub(super) fn parse_return_type(&mut self) -> Result<TypeRef, ParseError> {
        if self.check(TokenType::KwVoid) {
            let ty = TypeRef {
                kind: TypeRefKind::Void,
                span: self.current.span,
            };
            self.advance();
            return Ok(ty);
        }
        self.parse_type()
    }

    /// True when the upcoming tokens start a variable declaration rather
    /// than a statement (`Foo x`, `Foo[] x`, `int ...`).
    pub(super) fn at_variable_decl(&self) -> bool {
        match self.current.ty {
            TokenType::KwInt | TokenType::KwDouble | TokenType::KwBool | TokenType::KwString => true,
            TokenType::Identifier => {
                self.peek.ty == TokenType::Identifier
                    || (self.peek.ty == TokenType::LBracket && self.peek2.ty == TokenType::RBracket)
            }
            _ => false,
        }
    }
}

/// Parse an integer lexeme (decimal or 0x hex), saturating on overflow.
pub(super) fn parse_int_lexeme(lexeme: &str) -> i32 {
    let value = if let Some(hex) = lexeme.strip_prefix("0x").or_else(|| lexeme.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).unwrap_or(i64::from(i32::MAX))
    } else {
        lexeme.parse::<i64>().unwrap_or(i64::from(i32::MAX))
    };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
