use crate::ast::span::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    String(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),

    // Identifiers
    Identifier(String),
    FunctionCall(String), // name directly followed by `(`

    // Operators
    Equal,          // ==
    NotEqual,       // !=
    GreaterThan,    // >
    LessThan,       // <
    GreaterOrEqual, // >=
    LessOrEqual,    // <=
    And,            // &&
    Or,             // ||
    Not,            // !

    // Delimiters
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,

    // Special
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::String(s) => write!(f, "{s:?}"),
            TokenKind::Integer(n) => write!(f, "{n}"),
            TokenKind::Decimal(n) => write!(f, "{n}"),
            TokenKind::Boolean(b) => write!(f, "{b}"),
            TokenKind::Identifier(s) => write!(f, "{s}"),
            TokenKind::FunctionCall(name) => write!(f, "{name}("),
            TokenKind::Equal => write!(f, "=="),
            TokenKind::NotEqual => write!(f, "!="),
            TokenKind::GreaterThan => write!(f, ">"),
            TokenKind::LessThan => write!(f, "<"),
            TokenKind::GreaterOrEqual => write!(f, ">="),
            TokenKind::LessOrEqual => write!(f, "<="),
            TokenKind::And => write!(f, "&&"),
            TokenKind::Or => write!(f, "||"),
            TokenKind::Not => write!(f, "!"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}
