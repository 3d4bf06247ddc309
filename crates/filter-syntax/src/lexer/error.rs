use crate::ast::span::Span;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerError {
    #[error("unterminated string literal starting at {span}")]
    UnterminatedString { span: Span },

    #[error("invalid escape sequence '{escape}' at {span}")]
    InvalidEscape { escape: String, span: Span },

    #[error("illegal character '{character}' at {span}")]
    IllegalCharacter { character: char, span: Span },

    #[error("invalid number '{lexeme}' at {span}")]
    InvalidNumber { lexeme: String, span: Span },
}

impl LexerError {
    pub fn line_col(&self) -> (usize, usize) {
        match self {
            LexerError::UnterminatedString { span }
            | LexerError::InvalidEscape { span, .. }
            | LexerError::IllegalCharacter { span, .. }
            | LexerError::InvalidNumber { span, .. } => (span.line, span.column),
        }
    }

    /// Format error with the offending source line and a caret
    pub fn format_error(&self, source: &str) -> String {
        let (line, column) = self.line_col();
        let snippet = source.lines().nth(line.saturating_sub(1)).unwrap_or("");
        format!(
            "{}\n{}\n{}^",
            self,
            snippet,
            " ".repeat(column.saturating_sub(1))
        )
    }
}
