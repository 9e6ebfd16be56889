// src/frontend/lexer.rs

use crate::errors::LexerError;
use crate::frontend::{Span, Token, TokenType};

pub struct Lexer<'src> {
    source: &'src str,
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    start: usize,
    current: usize,
    line: u32,
    column: u32,
    start_column: u32,
    start_line: u32,
    // Error collection
    errors: Vec<LexerError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_column: 1,
            start_line: 1,
            errors: Vec::new(),
        }
    }

    /// Take all collected errors, leaving the internal list empty.
    pub fn take_errors(&mut self) -> Vec<LexerError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors have been collected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the source string being lexed.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.start = self.current;
        self.start_column = self.column;
        self.start_line = self.line;

        let Some(c) = self.advance() else {
            return self.make_token(TokenType::Eof);
        };

        match c {
            '(' => self.make_token(TokenType::LParen),
            ')' => self.make_token(TokenType::RParen),
            '{' => self.make_token(TokenType::LBrace),
            '}' => self.make_token(TokenType::RBrace),
            '[' => self.make_token(TokenType::LBracket),
            ']' => self.make_token(TokenType::RBracket),
            ',' => self.make_token(TokenType::Comma),
            ';' => self.make_token(TokenType::Semicolon),
            ':' => self.make_token(TokenType::Colon),
            '.' => self.make_token(TokenType::Dot),
            '*' => self.make_token(TokenType::Star),
            '/' => self.make_token(TokenType::Slash),
            '%' => self.make_token(TokenType::Percent),
            '+' => {
                if self.match_char('+') {
                    self.make_token(TokenType::PlusPlus)
                } else {
                    self.make_token(TokenType::Plus)
                }
            }
            '-' => {
                if self.match_char('-') {
                    self.make_token(TokenType::MinusMinus)
                } else {
                    self.make_token(TokenType::Minus)
                }
            }
            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenType::EqEq)
                } else {
                    self.make_token(TokenType::Eq)
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.make_token(TokenType::BangEq)
                } else {
                    self.make_token(TokenType::Bang)
                }
            }
            '<' => {
                if self.match_char('=') {
                    self.make_token(TokenType::LtEq)
                } else {
                    self.make_token(TokenType::Lt)
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.make_token(TokenType::GtEq)
                } else {
                    self.make_token(TokenType::Gt)
                }
            }
            '&' => {
                if self.match_char('&') {
                    self.make_token(TokenType::AmpAmp)
                } else {
                    self.error_unexpected_char(c)
                }
            }
            '|' => {
                if self.match_char('|') {
                    self.make_token(TokenType::PipePipe)
                } else {
                    self.error_unexpected_char(c)
                }
            }

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),

            _ => self.error_unexpected_char(c),
        }
    }

    /// Skip whitespace and both comment forms
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.advance();
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                Some('/') => {
                    if self.peek_next() == Some('/') {
                        while self.peek().is_some() && self.peek() != Some('\n') {
                            self.advance();
                        }
                    } else if self.peek_next() == Some('*') {
                        self.advance();
                        self.advance();
                        loop {
                            match self.peek() {
                                None => break,
                                Some('\n') => {
                                    self.advance();
                                    self.line += 1;
                                    self.column = 1;
                                }
                                Some('*') if self.peek_next() == Some('/') => {
                                    self.advance();
                                    self.advance();
                                    break;
                                }
                                Some(_) => {
                                    self.advance();
                                }
                            }
                        }
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// Advance to the next character and return it
    fn advance(&mut self) -> Option<char> {
        let (idx, c) = self.chars.next()?;
        self.current = idx + c.len_utf8();
        self.column += 1;
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_next(&mut self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().map(|(_, c)| c)
    }

    /// Consume the next character if it matches
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            return true;
        }
        false
    }

    fn make_token(&self, ty: TokenType) -> Token {
        let lexeme = &self.source[self.start..self.current];
        Token::new(ty, lexeme, self.token_span())
    }

    fn token_span(&self) -> Span {
        Span::new_with_end(
            self.start,
            self.current,
            self.start_line,
            self.start_column,
            self.line,
            self.column,
        )
    }

    fn error_unexpected_char(&mut self, c: char) -> Token {
        let span = self.token_span();
        self.errors.push(LexerError::UnexpectedCharacter {
            ch: c,
            span: span.into(),
        });
        Token::new(TokenType::Error, c.to_string(), span)
    }

    /// Scan a string literal. Shrew strings are single-line.
    fn string(&mut self) -> Token {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    let span = self.token_span();
                    self.errors.push(LexerError::UnterminatedString {
                        span: span.into(),
                    });
                    return Token::new(TokenType::Error, "", span);
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        self.make_token(TokenType::StringLiteral)
    }

    /// Scan an int (decimal or 0x hex) or double (digits '.' digits [E[+-]digits])
    fn number(&mut self) -> Token {
        // Hex literal
        if &self.source[self.start..self.current] == "0"
            && matches!(self.peek(), Some('x') | Some('X'))
        {
            self.advance();
            if !self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                let span = self.token_span();
                self.errors.push(LexerError::InvalidNumber { span: span.into() });
                return Token::new(TokenType::Error, "", span);
            }
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            return self.make_token(TokenType::IntLiteral);
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // A '.' makes it a double; trailing digits and exponent optional
        if self.peek() == Some('.') {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            if matches!(self.peek(), Some('e') | Some('E')) {
                let mut ahead = self.chars.clone();
                ahead.next();
                let mut exp_start = ahead.clone();
                let has_sign = matches!(exp_start.peek().map(|&(_, c)| c), Some('+') | Some('-'));
                if has_sign {
                    exp_start.next();
                }
                if exp_start.peek().is_some_and(|&(_, c)| c.is_ascii_digit()) {
                    self.advance(); // e
                    if has_sign {
                        self.advance();
                    }
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.advance();
                    }
                }
            }
            return self.make_token(TokenType::DoubleLiteral);
        }

        self.make_token(TokenType::IntLiteral)
    }

    fn identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        let text = &self.source[self.start..self.current];
        let ty = keyword_type(text).unwrap_or(TokenType::Identifier);
        self.make_token(ty)
    }
}

fn keyword_type(text: &str) -> Option<TokenType> {
    let ty = match text {
        "void" => TokenType::KwVoid,
        "int" => TokenType::KwInt,
        "double" => TokenType::KwDouble,
        "bool" => TokenType::KwBool,
        "string" => TokenType::KwString,
        "class" => TokenType::KwClass,
        "interface" => TokenType::KwInterface,
        "null" => TokenType::KwNull,
        "this" => TokenType::KwThis,
        "extends" => TokenType::KwExtends,
        "implements" => TokenType::KwImplements,
        "for" => TokenType::KwFor,
        "while" => TokenType::KwWhile,
        "if" => TokenType::KwIf,
        "else" => TokenType::KwElse,
        "return" => TokenType::KwReturn,
        "break" => TokenType::KwBreak,
        "new" => TokenType::KwNew,
        "NewArray" => TokenType::KwNewArray,
        "Print" => TokenType::KwPrint,
        "ReadInteger" => TokenType::KwReadInteger,
        "ReadLine" => TokenType::KwReadLine,
        "switch" => TokenType::KwSwitch,
        "case" => TokenType::KwCase,
        "default" => TokenType::KwDefault,
        "true" => TokenType::KwTrue,
        "false" => TokenType::KwFalse,
        _ => return None,
    };
    Some(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.ty == TokenType::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn types(source: &str) -> Vec<TokenType> {
        lex_all(source).iter().map(|t| t.ty).collect()
    }

    #[test]
    fn lex_simple_declaration() {
        assert_eq!(
            types("int x;"),
            vec![
                TokenType::KwInt,
                TokenType::Identifier,
                TokenType::Semicolon,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn lex_operators() {
        assert_eq!(
            types("a <= b && c++ != --d"),
            vec![
                TokenType::Identifier,
                TokenType::LtEq,
                TokenType::Identifier,
                TokenType::AmpAmp,
                TokenType::Identifier,
                TokenType::PlusPlus,
                TokenType::BangEq,
                TokenType::MinusMinus,
                TokenType::Identifier,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn lex_keywords_are_case_sensitive() {
        // 'Print' is a keyword, 'print' is just an identifier
        assert_eq!(types("Print")[0], TokenType::KwPrint);
        assert_eq!(types("print")[0], TokenType::Identifier);
        assert_eq!(types("NewArray")[0], TokenType::KwNewArray);
    }

    #[test]
    fn lex_numbers() {
        assert_eq!(types("42")[0], TokenType::IntLiteral);
        assert_eq!(types("0x1F")[0], TokenType::IntLiteral);
        assert_eq!(types("12.5")[0], TokenType::DoubleLiteral);
        assert_eq!(types("12.")[0], TokenType::DoubleLiteral);
        assert_eq!(types("12.5E+3")[0], TokenType::DoubleLiteral);
    }

    #[test]
    fn double_without_exponent_digits_stops_early() {
        // '12.E' is a double followed by an identifier 'E'
        assert_eq!(
            types("12.E"),
            vec![TokenType::DoubleLiteral, TokenType::Identifier, TokenType::Eof]
        );
    }

    #[test]
    fn lex_string_literal() {
        let tokens = lex_all("\"hello world\"");
        assert_eq!(tokens[0].ty, TokenType::StringLiteral);
        assert_eq!(tokens[0].lexeme, "\"hello world\"");
    }

    #[test]
    fn unterminated_string_is_error() {
        let mut lexer = Lexer::new("\"oops\nint x;");
        let token = lexer.next_token();
        assert_eq!(token.ty, TokenType::Error);
        assert!(lexer.has_errors());
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            types("// line comment\nint /* block\ncomment */ x;"),
            vec![
                TokenType::KwInt,
                TokenType::Identifier,
                TokenType::Semicolon,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens = lex_all("int\n  x;");
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.column, 3);
    }

    #[test]
    fn unexpected_character_collects_error() {
        let mut lexer = Lexer::new("int @ x;");
        let mut saw_error = false;
        loop {
            let token = lexer.next_token();
            if token.ty == TokenType::Error {
                saw_error = true;
            }
            if token.ty == TokenType::Eof {
                break;
            }
        }
        assert!(saw_error);
        assert_eq!(lexer.take_errors().len(), 1);
    }
}
