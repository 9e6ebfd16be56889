// src/frontend/token.rs

/// All token types in the Shrew language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    // Literals
    IntLiteral,
    DoubleLiteral,
    StringLiteral,
    Identifier,

    // Keywords
    KwVoid,
    KwInt,
    KwDouble,
    KwBool,
    KwString,
    KwClass,
    KwInterface,
    KwNull,
    KwThis,
    KwExtends,
    KwImplements,
    KwFor,
    KwWhile,
    KwIf,
    KwElse,
    KwReturn,
    KwBreak,
    KwNew,
    KwNewArray,
    KwPrint,
    KwReadInteger,
    KwReadLine,
    KwSwitch,
    KwCase,
    KwDefault,
    KwTrue,
    KwFalse,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    EqEq,
    BangEq,
    Bang,
    AmpAmp,
    PipePipe,
    PlusPlus,
    MinusMinus,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,

    // Special
    Eof,
    Error,
}

impl TokenType {
    /// Get string representation for error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IntLiteral => "integer",
            Self::DoubleLiteral => "double",
            Self::StringLiteral => "string",
            Self::Identifier => "identifier",
            Self::KwVoid => "void",
            Self::KwInt => "int",
            Self::KwDouble => "double",
            Self::KwBool => "bool",
            Self::KwString => "string",
            Self::KwClass => "class",
            Self::KwInterface => "interface",
            Self::KwNull => "null",
            Self::KwThis => "this",
            Self::KwExtends => "extends",
            Self::KwImplements => "implements",
            Self::KwFor => "for",
            Self::KwWhile => "while",
            Self::KwIf => "if",
            Self::KwElse => "else",
            Self::KwReturn => "return",
            Self::KwBreak => "break",
            Self::KwNew => "new",
            Self::KwNewArray => "NewArray",
            Self::KwPrint => "Print",
            Self::KwReadInteger => "ReadInteger",
            Self::KwReadLine => "ReadLine",
            Self::KwSwitch => "switch",
            Self::KwCase => "case",
            Self::KwDefault => "default",
            Self::KwTrue => "true",
            Self::KwFalse => "false",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Eq => "=",
            Self::EqEq => "==",
            Self::BangEq => "!=",
            Self::Bang => "!",
            Self::AmpAmp => "&&",
            Self::PipePipe => "||",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Eof => "end of file",
            Self::Error => "error",
        }
    }

    /// Get precedence for binary operators (Pratt parsing)
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Eq => 1, // assignment (lowest, right-associative)
            Self::PipePipe => 2,
            Self::AmpAmp => 3,
            Self::EqEq | Self::BangEq => 4,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 5,
            Self::Plus | Self::Minus => 6,
            Self::Star | Self::Slash | Self::Percent => 7,
            _ => 0,
        }
    }
}

/// Source location span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,    // Byte offset
    pub end: usize,      // Byte offset (exclusive)
    pub line: u32,       // Start line (1-indexed)
    pub column: u32,     // Start column (1-indexed)
    pub end_line: u32,   // End line (1-indexed)
    pub end_column: u32, // End column (1-indexed, exclusive)
}

impl Span {
    /// Create a new span with explicit end position
    pub fn new_with_end(
        start: usize,
        end: usize,
        line: u32,
        column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Self {
            start,
            end,
            line,
            column,
            end_line,
            end_column,
        }
    }

    /// Create a new span, computing end position for single-line tokens
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        let length = end.saturating_sub(start);
        Self {
            start,
            end,
            line,
            column,
            end_line: line,
            end_column: column + length as u32,
        }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
            line: self.line,
            column: self.column,
            end_line: other.end_line,
            end_column: other.end_column,
        }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        // miette uses (offset, length)
        (span.start, span.end - span.start).into()
    }
}

impl From<&Span> for miette::SourceSpan {
    fn from(span: &Span) -> Self {
        (span.start, span.end - span.start).into()
    }
}

/// A token with its location in source code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub ty: TokenType,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(ty: TokenType, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            ty,
            lexeme: lexeme.into(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_end_position() {
        let span = Span::new(0, 5, 1, 1);
        assert_eq!(span.end_line, 1);
        assert_eq!(span.end_column, 6);
    }

    #[test]
    fn span_merge_keeps_both_ends() {
        let a = Span::new_with_end(0, 5, 1, 1, 1, 6);
        let b = Span::new_with_end(10, 15, 2, 3, 2, 8);
        let merged = a.merge(b);
        assert_eq!(merged.start, 0);
        assert_eq!(merged.line, 1);
        assert_eq!(merged.end, 15);
        assert_eq!(merged.end_column, 8);
    }

    #[test]
    fn assignment_binds_loosest() {
        assert!(TokenType::Eq.precedence() < TokenType::PipePipe.precedence());
        assert!(TokenType::PipePipe.precedence() < TokenType::AmpAmp.precedence());
        assert!(TokenType::EqEq.precedence() < TokenType::Lt.precedence());
        assert!(TokenType::Plus.precedence() < TokenType::Star.precedence());
        assert_eq!(TokenType::Bang.precedence(), 0);
    }
}
